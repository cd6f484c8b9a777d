use std::path::Path;

use anyhow::{Context, Result};
use calamine::{open_workbook_auto, Data, Reader};
use chrono::NaiveDateTime;

use crate::domain::entities::dataset::TabularData;
use crate::format::format_f64;

/// Renders a cell as text. Date cells are written with `date_format` so they
/// parse the same way as dates typed in as text.
pub fn cell_to_string(cell: &Data, date_format: &str) -> String {
    match cell {
        Data::String(v) => v.to_string(),
        Data::Float(v) => format_f64(*v),
        Data::Int(v) => v.to_string(),
        Data::Bool(v) => v.to_string(),
        Data::DateTime(v) => v
            .as_datetime()
            .map(|dt| dt.format(date_format).to_string())
            .unwrap_or_else(|| v.to_string()),
        Data::DateTimeIso(v) => iso_to_format(v, date_format).unwrap_or_else(|| v.to_string()),
        Data::DurationIso(v) => v.to_string(),
        Data::Error(v) => format!("{v:?}"),
        Data::Empty => String::new(),
    }
}

fn iso_to_format(value: &str, date_format: &str) -> Option<String> {
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"]
        .iter()
        .find_map(|pattern| NaiveDateTime::parse_from_str(value, pattern).ok())
        .map(|dt| dt.format(date_format).to_string())
}

/// Reads the first worksheet; its first non-empty row is the header.
pub fn read_first_sheet(xlsx_path: &Path, date_format: &str) -> Result<TabularData> {
    let mut workbook = open_workbook_auto(xlsx_path)
        .with_context(|| format!("failed to open workbook: {}", xlsx_path.display()))?;
    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .with_context(|| format!("workbook has no sheets: {}", xlsx_path.display()))?;
    let range = workbook
        .worksheet_range(&sheet_name)
        .with_context(|| format!("failed to read sheet: {sheet_name}"))?;

    let mut rows = range
        .rows()
        .map(|r| {
            r.iter()
                .map(|cell| cell_to_string(cell, date_format))
                .collect::<Vec<String>>()
        })
        .skip_while(|r| r.iter().all(|value| value.trim().is_empty()));

    let columns: Vec<String> = rows
        .next()
        .with_context(|| format!("sheet {sheet_name} has no header row"))?
        .into_iter()
        .map(|name| name.trim().to_string())
        .collect();

    let header_len = columns.len();
    let data = rows
        .filter(|r| r.iter().any(|value| !value.trim().is_empty()))
        .map(|mut r| {
            r.resize(header_len, String::new());
            r
        })
        .collect();

    Ok(TabularData {
        columns,
        rows: data,
    })
}
