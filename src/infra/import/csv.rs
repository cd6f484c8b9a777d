use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::{Context, Result};
use csv::{ReaderBuilder, StringRecord};

use crate::domain::entities::dataset::TabularData;

/// Semicolon when the header line has semicolons but no commas (spreadsheet
/// exports in comma-decimal locales), comma otherwise.
pub fn sniff_delimiter(csv_path: &Path) -> Result<u8> {
    let file = File::open(csv_path)
        .with_context(|| format!("failed to open csv: {}", csv_path.display()))?;
    let mut header_line = String::new();
    BufReader::new(file)
        .read_line(&mut header_line)
        .with_context(|| format!("failed to read header line from csv: {}", csv_path.display()))?;

    if header_line.contains(';') && !header_line.contains(',') {
        Ok(b';')
    } else {
        Ok(b',')
    }
}

fn header_names(headers: &StringRecord) -> Vec<String> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| {
            let name = if idx == 0 {
                name.trim_start_matches('\u{feff}')
            } else {
                name
            };
            name.trim().to_string()
        })
        .collect()
}

pub fn read_csv(csv_path: &Path) -> Result<TabularData> {
    let delimiter = sniff_delimiter(csv_path)?;
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_path(csv_path)
        .with_context(|| format!("failed to open csv: {}", csv_path.display()))?;
    let headers = reader
        .headers()
        .with_context(|| format!("failed to read headers from csv: {}", csv_path.display()))?
        .clone();

    if headers.is_empty() {
        anyhow::bail!("csv header is required")
    }

    let columns = header_names(&headers);
    let header_len = columns.len();
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.context("failed to parse csv record")?;
        if record.iter().all(|value| value.trim().is_empty()) {
            continue;
        }
        let row = (0..header_len)
            .map(|col_idx| record.get(col_idx).unwrap_or("").to_string())
            .collect();
        rows.push(row);
    }

    Ok(TabularData { columns, rows })
}
