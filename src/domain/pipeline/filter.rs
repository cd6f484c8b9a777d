use std::collections::{BTreeSet, HashSet};

use chrono::NaiveDate;

use super::{group_label, RowSet};
use crate::domain::error::PipelineResult;

/// Keeps rows whose status date lies in `[start, end]`. An inverted range matches nothing.
pub fn filter_by_date_range<'a>(rows: &RowSet<'a>, start: NaiveDate, end: NaiveDate) -> RowSet<'a> {
    if start > end {
        return rows.retain(|_| false);
    }
    rows.retain(|row| {
        let date = row.timestamp.date();
        start <= date && date <= end
    })
}

pub fn filter_by_membership<'a>(
    rows: &RowSet<'a>,
    field: &str,
    allowed: &BTreeSet<String>,
) -> PipelineResult<RowSet<'a>> {
    let idx = rows.field(field)?;
    if allowed.is_empty() {
        return Ok(rows.retain(|_| false));
    }
    Ok(rows.retain(|row| {
        group_label(row.get(idx))
            .map(|label| allowed.contains(&label))
            .unwrap_or(false)
    }))
}

/// Distinct non-empty values of `field` in first-occurrence order.
pub fn distinct_values(rows: &RowSet<'_>, field: &str) -> PipelineResult<Vec<String>> {
    let idx = rows.field(field)?;
    let mut seen = HashSet::new();
    let mut values = Vec::new();
    for row in rows.rows() {
        if let Some(label) = group_label(row.get(idx)) {
            if seen.insert(label.clone()) {
                values.push(label);
            }
        }
    }
    Ok(values)
}

pub fn date_bounds(rows: &RowSet<'_>) -> Option<(NaiveDate, NaiveDate)> {
    let mut dates = rows.rows().iter().map(|row| row.timestamp.date());
    let first = dates.next()?;
    Some(dates.fold((first, first), |(min, max), date| {
        (min.min(date), max.max(date))
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::pipeline::fixtures::{orders, ts};

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn date_range_is_inclusive_on_both_ends() {
        let snapshot = orders(&[
            (ts(2025, 1, 1), "A", "x", 10.0, ""),
            (ts(2025, 1, 15), "A", "x", 20.0, ""),
            (ts(2025, 1, 31), "B", "y", 30.0, ""),
            (ts(2025, 2, 1), "B", "y", 40.0, ""),
        ]);
        let rows = RowSet::from_snapshot(&snapshot);

        let january = filter_by_date_range(&rows, day(2025, 1, 1), day(2025, 1, 31));

        assert_eq!(january.len(), 3);
    }

    #[test]
    fn inverted_date_range_yields_empty_set() {
        let snapshot = orders(&[(ts(2025, 1, 10), "A", "x", 10.0, "")]);
        let rows = RowSet::from_snapshot(&snapshot);

        let filtered = filter_by_date_range(&rows, day(2025, 2, 1), day(2025, 1, 1));

        assert!(filtered.is_empty());
    }

    #[test]
    fn date_range_filter_is_idempotent_under_wider_range() {
        let snapshot = orders(&[
            (ts(2024, 12, 31), "A", "x", 1.0, ""),
            (ts(2025, 1, 5), "A", "x", 2.0, ""),
            (ts(2025, 1, 20), "B", "x", 3.0, ""),
            (ts(2025, 3, 2), "B", "x", 4.0, ""),
        ]);
        let rows = RowSet::from_snapshot(&snapshot);

        let narrow = filter_by_date_range(&rows, day(2025, 1, 1), day(2025, 1, 31));
        let same = filter_by_date_range(&narrow, day(2025, 1, 1), day(2025, 1, 31));
        let wider = filter_by_date_range(&narrow, day(2024, 1, 1), day(2025, 12, 31));

        assert_eq!(narrow.rows(), same.rows());
        assert_eq!(narrow.rows(), wider.rows());
    }

    #[test]
    fn membership_filter_keeps_allowed_values_only() {
        let snapshot = orders(&[
            (ts(2025, 1, 1), "A", "x", 10.0, ""),
            (ts(2025, 1, 2), "B", "y", 20.0, ""),
            (ts(2025, 1, 3), "C", "x", 30.0, ""),
        ]);
        let rows = RowSet::from_snapshot(&snapshot);
        let allowed: BTreeSet<String> = ["A", "C"].iter().map(|s| s.to_string()).collect();

        let filtered = filter_by_membership(&rows, "store", &allowed).expect("store column exists");

        assert_eq!(filtered.len(), 2);
        assert_eq!(
            distinct_values(&filtered, "store").expect("store column exists"),
            vec!["A".to_string(), "C".to_string()]
        );
    }

    #[test]
    fn membership_filter_with_empty_set_yields_empty_set() {
        let snapshot = orders(&[(ts(2025, 1, 1), "A", "x", 10.0, "")]);
        let rows = RowSet::from_snapshot(&snapshot);

        let filtered =
            filter_by_membership(&rows, "store", &BTreeSet::new()).expect("store column exists");

        assert!(filtered.is_empty());
    }

    #[test]
    fn date_bounds_spans_snapshot() {
        let snapshot = orders(&[
            (ts(2025, 1, 9), "A", "x", 1.0, ""),
            (ts(2024, 11, 2), "A", "x", 1.0, ""),
            (ts(2025, 1, 3), "A", "x", 1.0, ""),
        ]);
        let rows = RowSet::from_snapshot(&snapshot);

        assert_eq!(date_bounds(&rows), Some((day(2024, 11, 2), day(2025, 1, 9))));
        assert_eq!(date_bounds(&rows.retain(|_| false)), None);
    }
}
