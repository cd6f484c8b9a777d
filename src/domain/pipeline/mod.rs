//! Pure aggregation over an immutable snapshot.
//!
//! Every function here is total over its inputs apart from the documented
//! `PipelineError`s; nothing is cached between calls.

pub mod filter;
pub mod group;
pub mod parse;
pub mod pivot;
pub mod rank;
pub mod tables;

use crate::domain::entities::dataset::{Row, Snapshot, Value};
use crate::domain::error::{PipelineError, PipelineResult};

pub use filter::{date_bounds, distinct_values, filter_by_date_range, filter_by_membership};
pub use group::{group_count, group_mean, group_sum};
pub use parse::{date_key, month_key, parse_amount, parse_timestamp, parse_timestamps};
pub use pivot::pivot_mean;
pub use rank::{top_k_by_group, top_n_with_other};
pub use tables::{daily_stats, kpi_summary, monthly_stats, store_stats};

/// Borrowed view over some rows of a snapshot.
#[derive(Debug, Clone)]
pub struct RowSet<'a> {
    columns: &'a [String],
    rows: Vec<&'a Row>,
}

impl<'a> RowSet<'a> {
    pub fn from_snapshot(snapshot: &'a Snapshot) -> Self {
        Self {
            columns: &snapshot.columns,
            rows: snapshot.rows.iter().collect(),
        }
    }

    pub fn rows(&self) -> &[&'a Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn field(&self, name: &str) -> PipelineResult<usize> {
        crate::domain::entities::dataset::column_index(self.columns, name)
    }

    pub(crate) fn retain<F>(&self, mut keep: F) -> RowSet<'a>
    where
        F: FnMut(&Row) -> bool,
    {
        RowSet {
            columns: self.columns,
            rows: self.rows.iter().copied().filter(|row| keep(row)).collect(),
        }
    }
}

/// Grouping key of a cell; empty cells do not form a group.
pub(crate) fn group_label(value: &Value) -> Option<String> {
    match value {
        Value::Empty => None,
        Value::Text(text) if text.trim().is_empty() => None,
        other => Some(other.label()),
    }
}

/// Numeric reading of a cell. Empty cells are skipped, unreadable text aborts the pass.
pub(crate) fn numeric_value(value: &Value, field: &str) -> PipelineResult<Option<f64>> {
    match value {
        Value::Number(number) => Ok(Some(*number)),
        Value::Empty => Ok(None),
        Value::Text(text) if text.trim().is_empty() => Ok(None),
        Value::Text(text) => parse_amount(text).map(Some).ok_or_else(|| {
            PipelineError::DataShape(format!("non-numeric value {text:?} in column {field}"))
        }),
        Value::DateTime(_) => Err(PipelineError::DataShape(format!(
            "column {field} holds timestamps, not numbers"
        ))),
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use std::path::PathBuf;

    use chrono::{NaiveDate, NaiveDateTime};

    use crate::domain::entities::dataset::{DatasetKind, Row, Snapshot, Value};

    pub fn ts(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .and_then(|date| date.and_hms_opt(12, 0, 0))
            .expect("valid fixture timestamp")
    }

    /// Orders with columns `date, store, group, amount, contact`.
    pub fn orders(rows: &[(NaiveDateTime, &str, &str, f64, &str)]) -> Snapshot {
        Snapshot {
            source: PathBuf::from("orders.xlsx"),
            kind: DatasetKind::Orders,
            columns: ["date", "store", "group", "amount", "contact"]
                .iter()
                .map(|c| c.to_string())
                .collect(),
            rows: rows
                .iter()
                .map(|(when, store, group, amount, contact)| Row {
                    values: vec![
                        Value::DateTime(*when),
                        Value::Text(store.to_string()),
                        Value::Text(group.to_string()),
                        Value::Number(*amount),
                        if contact.is_empty() {
                            Value::Empty
                        } else {
                            Value::Text(contact.to_string())
                        },
                    ],
                    timestamp: *when,
                })
                .collect(),
        }
    }

    /// Cart events with columns `date, store, group, product`.
    pub fn cart(rows: &[(NaiveDateTime, &str, &str, &str)]) -> Snapshot {
        Snapshot {
            source: PathBuf::from("cart.xlsx"),
            kind: DatasetKind::Cart,
            columns: ["date", "store", "group", "product"]
                .iter()
                .map(|c| c.to_string())
                .collect(),
            rows: rows
                .iter()
                .map(|(when, store, group, product)| Row {
                    values: vec![
                        Value::DateTime(*when),
                        Value::Text(store.to_string()),
                        Value::Text(group.to_string()),
                        Value::Text(product.to_string()),
                    ],
                    timestamp: *when,
                })
                .collect(),
        }
    }
}
