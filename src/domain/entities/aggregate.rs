use chrono::NaiveDate;

pub const OTHER_LABEL: &str = "Other";

/// Mapping from group label to a metric, kept in first-occurrence order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupedValues {
    entries: Vec<(String, f64)>,
}

impl GroupedValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(label, value)| (label.into(), value))
                .collect(),
        }
    }

    pub fn get(&self, label: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(key, _)| key == label)
            .map(|(_, value)| *value)
    }

    pub fn entries(&self) -> &[(String, f64)] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<(String, f64)> {
        self.entries
    }

    pub fn total(&self) -> f64 {
        self.entries.iter().map(|(_, value)| value).sum()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Descending by value; equal values keep their current order.
    pub fn sort_descending(&mut self) {
        self.entries
            .sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RankEntry {
    pub label: String,
    pub value: f64,
}

impl RankEntry {
    pub fn new(label: impl Into<String>, value: f64) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }

    pub fn is_other(&self) -> bool {
        self.label == OTHER_LABEL
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyStat {
    pub month: String,
    pub order_count: usize,
    pub amount_sum: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DailyStat {
    pub date: NaiveDate,
    pub amount_sum: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StoreStat {
    pub store: String,
    pub amount_sum: f64,
    pub count: usize,
    pub mean: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct KpiSummary {
    pub turnover: f64,
    pub order_count: usize,
    pub unique_customers: usize,
}

/// Two-dimensional mean table; `values[r][c]` belongs to `row_keys[r]` and `col_keys[c]`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PivotTable {
    pub row_keys: Vec<String>,
    pub col_keys: Vec<String>,
    pub values: Vec<Vec<f64>>,
}

impl PivotTable {
    pub fn value(&self, row: &str, col: &str) -> Option<f64> {
        let r = self.row_keys.iter().position(|key| key == row)?;
        let c = self.col_keys.iter().position(|key| key == col)?;
        self.values.get(r).and_then(|cells| cells.get(c)).copied()
    }
}
