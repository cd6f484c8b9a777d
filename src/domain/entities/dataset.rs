use std::fmt;
use std::path::PathBuf;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::error::PipelineError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatasetKind {
    Orders,
    Cart,
}

impl DatasetKind {
    pub fn as_str(self) -> &'static str {
        match self {
            DatasetKind::Orders => "orders",
            DatasetKind::Cart => "cart",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "orders" => Some(DatasetKind::Orders),
            "cart" => Some(DatasetKind::Cart),
            _ => None,
        }
    }
}

impl fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Header row plus string cells, as read from a spreadsheet before any typing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TabularData {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(String),
    Number(f64),
    DateTime(NaiveDateTime),
    Empty,
}

impl Value {
    /// Label used when the value is a grouping key.
    pub fn label(&self) -> String {
        match self {
            Value::Text(text) => text.clone(),
            Value::Number(number) => crate::format::format_f64(*number),
            Value::DateTime(ts) => ts.format("%Y-%m-%d %H:%M:%S").to_string(),
            Value::Empty => String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub values: Vec<Value>,
    /// Parsed status timestamp; every row of a snapshot has one.
    pub timestamp: NaiveDateTime,
}

impl Row {
    pub fn get(&self, idx: usize) -> &Value {
        self.values.get(idx).unwrap_or(&Value::Empty)
    }
}

/// Immutable, typed copy of one loaded source file.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub source: PathBuf,
    pub kind: DatasetKind,
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

impl Snapshot {
    pub fn column_index(&self, field: &str) -> Result<usize, PipelineError> {
        column_index(&self.columns, field)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

pub fn column_index(columns: &[String], field: &str) -> Result<usize, PipelineError> {
    columns
        .iter()
        .position(|column| column.trim() == field)
        .ok_or_else(|| PipelineError::DataShape(format!("missing column: {field}")))
}
