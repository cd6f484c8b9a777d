use std::collections::BTreeSet;

use chrono::NaiveDate;

use crate::domain::entities::aggregate::{
    DailyStat, GroupedValues, MonthlyStat, RankEntry, StoreStat,
};
use crate::domain::entities::dataset::{Snapshot, Value};
use crate::format::{format_f64, format_number_with_commas, format_share};

/// One line of a horizontal bar chart.
#[derive(Debug, Clone, PartialEq)]
pub struct BarRow {
    pub label: String,
    pub value_text: String,
    /// Bar width relative to the largest row, in `0.0..=1.0`.
    pub fraction: f64,
}

fn scale(values: &[f64]) -> f64 {
    values.iter().copied().fold(0.0_f64, f64::max)
}

fn fraction(value: f64, max: f64) -> f64 {
    if max <= 0.0 {
        0.0
    } else {
        (value / max).clamp(0.0, 1.0)
    }
}

pub fn share_bars(entries: &[RankEntry]) -> Vec<BarRow> {
    let total: f64 = entries.iter().map(|entry| entry.value).sum();
    let max = scale(&entries.iter().map(|entry| entry.value).collect::<Vec<_>>());
    entries
        .iter()
        .map(|entry| BarRow {
            label: entry.label.clone(),
            value_text: format!(
                "{} ({})",
                format_number_with_commas(entry.value, 0),
                format_share(entry.value, total)
            ),
            fraction: fraction(entry.value, max),
        })
        .collect()
}

pub fn grouped_bars(values: &GroupedValues) -> Vec<BarRow> {
    let total = values.total();
    let max = scale(&values.entries().iter().map(|(_, v)| *v).collect::<Vec<_>>());
    values
        .entries()
        .iter()
        .map(|(label, value)| BarRow {
            label: label.clone(),
            value_text: format!(
                "{} ({})",
                format_number_with_commas(*value, 0),
                format_share(*value, total)
            ),
            fraction: fraction(*value, max),
        })
        .collect()
}

pub fn count_bars(entries: &[RankEntry]) -> Vec<BarRow> {
    let max = scale(&entries.iter().map(|entry| entry.value).collect::<Vec<_>>());
    entries
        .iter()
        .map(|entry| BarRow {
            label: entry.label.clone(),
            value_text: format_number_with_commas(entry.value, 0),
            fraction: fraction(entry.value, max),
        })
        .collect()
}

/// Turnover bars with the order count in the label.
pub fn monthly_bars(monthly: &[MonthlyStat]) -> Vec<BarRow> {
    let max = scale(&monthly.iter().map(|m| m.amount_sum).collect::<Vec<_>>());
    monthly
        .iter()
        .map(|m| BarRow {
            label: format!("{} · {} orders", m.month, m.order_count),
            value_text: format_number_with_commas(m.amount_sum, 0),
            fraction: fraction(m.amount_sum, max),
        })
        .collect()
}

pub fn daily_count_bars(daily: &[DailyStat]) -> Vec<BarRow> {
    let max = scale(&daily.iter().map(|d| d.count as f64).collect::<Vec<_>>());
    daily
        .iter()
        .map(|d| BarRow {
            label: d.date.format("%d.%m.%Y").to_string(),
            value_text: d.count.to_string(),
            fraction: fraction(d.count as f64, max),
        })
        .collect()
}

pub fn daily_amount_bars(daily: &[DailyStat]) -> Vec<BarRow> {
    let max = scale(&daily.iter().map(|d| d.amount_sum).collect::<Vec<_>>());
    daily
        .iter()
        .map(|d| BarRow {
            label: format!("{} · {}", d.date.format("%d.%m.%Y"), d.count),
            value_text: format_number_with_commas(d.amount_sum, 0),
            fraction: fraction(d.amount_sum, max),
        })
        .collect()
}

/// Store table rows: name, turnover, orders, average check.
pub fn store_rows(stores: &[StoreStat]) -> Vec<Vec<String>> {
    stores
        .iter()
        .map(|stat| {
            vec![
                stat.store.clone(),
                format_number_with_commas(stat.amount_sum, 0),
                stat.count.to_string(),
                format_number_with_commas(stat.mean, 2),
            ]
        })
        .collect()
}

pub fn date_input_value(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn parse_date_input(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

/// Date range from the two sidebar inputs; an empty or invalid input leaves
/// that end open at the snapshot bound.
pub fn date_range_from_inputs(
    from: &str,
    to: &str,
    bounds: Option<(NaiveDate, NaiveDate)>,
) -> Option<(NaiveDate, NaiveDate)> {
    let start = parse_date_input(from);
    let end = parse_date_input(to);
    match (start, end, bounds) {
        (None, None, _) => None,
        (Some(start), Some(end), _) => Some((start, end)),
        (Some(start), None, Some((_, max))) => Some((start, max)),
        (None, Some(end), Some((min, _))) => Some((min, end)),
        (Some(start), None, None) => Some((start, NaiveDate::MAX)),
        (None, Some(end), None) => Some((NaiveDate::MIN, end)),
    }
}

pub fn is_selected(selection: &Option<BTreeSet<String>>, value: &str) -> bool {
    selection
        .as_ref()
        .map(|set| set.contains(value))
        .unwrap_or(true)
}

/// New selection after ticking or unticking `value`. Collapses back to
/// `None` once every option is selected again.
pub fn toggle_selection(
    selection: &Option<BTreeSet<String>>,
    options: &[String],
    value: &str,
    checked: bool,
) -> Option<BTreeSet<String>> {
    let mut next: BTreeSet<String> = match selection {
        Some(set) => set.clone(),
        None => options.iter().cloned().collect(),
    };
    if checked {
        next.insert(value.to_string());
    } else {
        next.remove(value);
    }
    if options.iter().all(|option| next.contains(option)) {
        None
    } else {
        Some(next)
    }
}

pub fn cell_text(value: &Value) -> String {
    match value {
        Value::Number(number) => format_f64(*number),
        Value::DateTime(ts) => ts.format("%d.%m.%Y %H:%M:%S").to_string(),
        other => other.label(),
    }
}

/// First `limit` rows of a snapshot as display strings.
pub fn detail_rows(snapshot: &Snapshot, limit: usize) -> Vec<Vec<String>> {
    snapshot
        .rows
        .iter()
        .take(limit)
        .map(|row| row.values.iter().map(cell_text).collect())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn options() -> Vec<String> {
        ["A", "B", "C"].iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn share_bars_scale_to_largest_entry() {
        let bars = share_bars(&[RankEntry::new("B", 200.0), RankEntry::new("Other", 50.0)]);

        assert_eq!(bars[0].fraction, 1.0);
        assert_eq!(bars[1].fraction, 0.25);
        assert_eq!(bars[0].value_text, "200 (80.0%)");
    }

    #[test]
    fn bars_of_zero_values_have_no_width() {
        let bars = count_bars(&[RankEntry::new("A", 0.0)]);
        assert_eq!(bars[0].fraction, 0.0);
    }

    #[test]
    fn store_rows_format_sum_count_and_mean() {
        let rows = store_rows(&[StoreStat {
            store: "Store1".to_string(),
            amount_sum: 12345.0,
            count: 3,
            mean: 4115.0,
        }]);

        assert_eq!(rows, vec![vec!["Store1", "12,345", "3", "4,115.00"]]);
    }

    #[test]
    fn date_inputs_fall_back_to_bounds() {
        let bounds = Some((day(2025, 1, 1), day(2025, 3, 31)));

        assert_eq!(date_range_from_inputs("", "", bounds), None);
        assert_eq!(
            date_range_from_inputs("2025-02-01", "", bounds),
            Some((day(2025, 2, 1), day(2025, 3, 31)))
        );
        assert_eq!(
            date_range_from_inputs("", "2025-01-15", bounds),
            Some((day(2025, 1, 1), day(2025, 1, 15)))
        );
        assert_eq!(
            date_range_from_inputs("2025-02-01", "2025-01-01", bounds),
            Some((day(2025, 2, 1), day(2025, 1, 1)))
        );
    }

    #[test]
    fn toggle_selection_collapses_to_all() {
        let options = options();

        let without_b = toggle_selection(&None, &options, "B", false);
        assert_eq!(
            without_b,
            Some(["A", "C"].iter().map(|s| s.to_string()).collect())
        );
        assert!(!is_selected(&without_b, "B"));

        let restored = toggle_selection(&without_b, &options, "B", true);
        assert_eq!(restored, None);
        assert!(is_selected(&restored, "B"));
    }

    #[test]
    fn untick_everything_gives_empty_selection() {
        let options = options();
        let mut selection = None;
        for option in &options {
            selection = toggle_selection(&selection, &options, option, false);
        }
        assert_eq!(selection, Some(BTreeSet::new()));
    }
}
