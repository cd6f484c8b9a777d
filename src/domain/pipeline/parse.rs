use chrono::{NaiveDate, NaiveDateTime};

use crate::domain::entities::dataset::{column_index, TabularData};
use crate::domain::error::{PipelineError, PipelineResult};

/// Parses the `field` column of every row with `format`. The first value that
/// does not match aborts the whole load; its error carries the 1-based data row.
pub fn parse_timestamps(
    data: &TabularData,
    field: &str,
    format: &str,
) -> PipelineResult<Vec<NaiveDateTime>> {
    let idx = column_index(&data.columns, field)?;
    data.rows
        .iter()
        .enumerate()
        .map(|(row_idx, row)| {
            let raw = row.get(idx).map(String::as_str).unwrap_or("");
            parse_timestamp(raw, format).ok_or_else(|| PipelineError::Parse {
                field: field.to_string(),
                value: raw.to_string(),
                format: format.to_string(),
                row: row_idx + 1,
            })
        })
        .collect()
}

pub fn parse_timestamp(raw: &str, format: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw.trim(), format).ok()
}

/// `"YYYY-MM"` bucket of a timestamp.
pub fn month_key(ts: NaiveDateTime) -> String {
    ts.format("%Y-%m").to_string()
}

pub fn date_key(ts: NaiveDateTime) -> NaiveDate {
    ts.date()
}

/// Reads a currency amount. Spaces, non-breaking spaces and a trailing
/// currency sign are ignored. With both `.` and `,` present the later one is
/// the decimal separator. A lone comma followed by exactly three digits groups
/// thousands (`1,234`); any other lone comma is a decimal comma (`99,5`).
/// Repeated separators of one kind always group thousands.
pub fn parse_amount(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .trim()
        .trim_end_matches('₸')
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '\u{a0}')
        .collect();
    if cleaned.is_empty() {
        return None;
    }

    let normalized = match (cleaned.rfind('.'), cleaned.rfind(',')) {
        (Some(dot), Some(comma)) if comma > dot => cleaned.replace('.', "").replace(',', "."),
        (Some(_), Some(_)) => cleaned.replace(',', ""),
        (Some(_), None) if cleaned.matches('.').count() > 1 => cleaned.replace('.', ""),
        (None, Some(comma)) if cleaned.matches(',').count() == 1 => {
            let fraction = &cleaned[comma + 1..];
            if fraction.len() == 3 && fraction.chars().all(|c| c.is_ascii_digit()) {
                cleaned.replace(',', "")
            } else {
                cleaned.replace(',', ".")
            }
        }
        (None, Some(_)) => cleaned.replace(',', ""),
        _ => cleaned,
    };
    normalized.parse::<f64>().ok().filter(|value| value.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::schema::DEFAULT_DATE_FORMAT;

    fn data(values: &[&str]) -> TabularData {
        TabularData {
            columns: vec!["Дата статуса".to_string()],
            rows: values.iter().map(|v| vec![v.to_string()]).collect(),
        }
    }

    #[test]
    fn parse_timestamps_reads_every_row() {
        let parsed = parse_timestamps(
            &data(&["22.01.2025 10:15:00", " 01.02.2025 23:59:59 "]),
            "Дата статуса",
            DEFAULT_DATE_FORMAT,
        )
        .expect("timestamps should parse");

        assert_eq!(parsed.len(), 2);
        assert_eq!(month_key(parsed[0]), "2025-01");
        assert_eq!(
            date_key(parsed[1]),
            NaiveDate::from_ymd_opt(2025, 2, 1).expect("valid date")
        );
    }

    #[test]
    fn parse_timestamps_names_offending_value() {
        let err = parse_timestamps(
            &data(&["22.01.2025 10:15:00", "2025-01-22"]),
            "Дата статуса",
            DEFAULT_DATE_FORMAT,
        )
        .expect_err("iso date should not match");

        assert_eq!(
            err,
            PipelineError::Parse {
                field: "Дата статуса".to_string(),
                value: "2025-01-22".to_string(),
                format: DEFAULT_DATE_FORMAT.to_string(),
                row: 2,
            }
        );
    }

    #[test]
    fn parse_timestamps_rejects_missing_column() {
        let err = parse_timestamps(&data(&[]), "created", DEFAULT_DATE_FORMAT)
            .expect_err("unknown column should fail");
        assert!(matches!(err, PipelineError::DataShape(_)));
    }

    #[test]
    fn parse_amount_handles_separators() {
        assert_eq!(parse_amount("1 250"), Some(1250.0));
        assert_eq!(parse_amount("1,234.50"), Some(1234.5));
        assert_eq!(parse_amount("99,5"), Some(99.5));
        assert_eq!(parse_amount("4500 ₸"), Some(4500.0));
        assert_eq!(parse_amount("1,234"), Some(1234.0));
        assert_eq!(parse_amount("1,234,567"), Some(1234567.0));
        assert_eq!(parse_amount("1.234,50"), Some(1234.5));
        assert_eq!(parse_amount("1.234.567"), Some(1234567.0));
        assert_eq!(parse_amount("12,5"), Some(12.5));
        assert_eq!(parse_amount("0.75"), Some(0.75));
        assert_eq!(parse_amount(""), None);
        assert_eq!(parse_amount("n/a"), None);
    }
}
