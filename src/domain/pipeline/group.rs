use std::collections::HashMap;
use std::hash::Hash;

use super::{group_label, numeric_value, RowSet};
use crate::domain::entities::aggregate::GroupedValues;
use crate::domain::entities::dataset::Row;
use crate::domain::error::PipelineResult;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct Accumulator {
    pub sum: f64,
    /// Rows in the group.
    pub count: usize,
    /// Rows that contributed a number to `sum`.
    pub valued: usize,
}

impl Accumulator {
    pub fn mean(&self) -> Option<f64> {
        if self.valued == 0 {
            None
        } else {
            Some(self.sum / self.valued as f64)
        }
    }
}

/// Buckets rows by `key`, in first-occurrence order. Rows without a key are
/// skipped. With `value` set, its numeric cells are summed; empty cells add
/// nothing to the sum but the row still counts.
pub(crate) fn fold_by<K, F>(
    rows: &RowSet<'_>,
    mut key: F,
    value: Option<(usize, &str)>,
) -> PipelineResult<Vec<(K, Accumulator)>>
where
    K: Eq + Hash + Clone,
    F: FnMut(&Row) -> Option<K>,
{
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut groups: Vec<(K, Accumulator)> = Vec::new();

    for row in rows.rows() {
        let Some(group) = key(row) else {
            continue;
        };
        let contribution = match value {
            Some((idx, field)) => numeric_value(row.get(idx), field)?,
            None => None,
        };
        let slot = *index.entry(group.clone()).or_insert_with(|| {
            groups.push((group, Accumulator::default()));
            groups.len() - 1
        });
        let acc = &mut groups[slot].1;
        acc.count += 1;
        if let Some(number) = contribution {
            acc.sum += number;
            acc.valued += 1;
        }
    }

    Ok(groups)
}

fn fold_by_field(
    rows: &RowSet<'_>,
    group_field: &str,
    value_field: Option<&str>,
) -> PipelineResult<Vec<(String, Accumulator)>> {
    let group_idx = rows.field(group_field)?;
    let value = match value_field {
        Some(field) => Some((rows.field(field)?, field)),
        None => None,
    };
    fold_by(rows, |row| group_label(row.get(group_idx)), value)
}

pub fn group_sum(
    rows: &RowSet<'_>,
    group_field: &str,
    value_field: &str,
) -> PipelineResult<GroupedValues> {
    let groups = fold_by_field(rows, group_field, Some(value_field))?;
    Ok(GroupedValues::from_entries(
        groups.into_iter().map(|(label, acc)| (label, acc.sum)),
    ))
}

pub fn group_count(rows: &RowSet<'_>, group_field: &str) -> PipelineResult<GroupedValues> {
    let groups = fold_by_field(rows, group_field, None)?;
    Ok(GroupedValues::from_entries(
        groups
            .into_iter()
            .map(|(label, acc)| (label, acc.count as f64)),
    ))
}

pub fn group_mean(
    rows: &RowSet<'_>,
    group_field: &str,
    value_field: &str,
) -> PipelineResult<GroupedValues> {
    let groups = fold_by_field(rows, group_field, Some(value_field))?;
    Ok(GroupedValues::from_entries(
        groups
            .into_iter()
            .filter_map(|(label, acc)| acc.mean().map(|mean| (label, mean))),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::PipelineError;
    use crate::domain::pipeline::fixtures::{cart, orders, ts};

    #[test]
    fn group_sum_keeps_first_occurrence_order() {
        let snapshot = orders(&[
            (ts(2025, 1, 1), "A", "x", 100.0, ""),
            (ts(2025, 1, 2), "A", "x", 50.0, ""),
            (ts(2025, 1, 3), "B", "y", 200.0, ""),
        ]);
        let rows = RowSet::from_snapshot(&snapshot);

        let sums = group_sum(&rows, "store", "amount").expect("columns exist");

        assert_eq!(
            sums.entries(),
            &[("A".to_string(), 150.0), ("B".to_string(), 200.0)]
        );
    }

    #[test]
    fn group_totals_match_collection_totals() {
        let snapshot = orders(&[
            (ts(2025, 1, 1), "C", "x", 12.5, ""),
            (ts(2025, 1, 2), "A", "y", 7.5, ""),
            (ts(2025, 1, 3), "B", "x", 30.0, ""),
            (ts(2025, 1, 4), "C", "z", 50.0, ""),
            (ts(2025, 1, 5), "A", "x", 0.0, ""),
        ]);
        let rows = RowSet::from_snapshot(&snapshot);

        let sums = group_sum(&rows, "store", "amount").expect("columns exist");
        let counts = group_count(&rows, "group").expect("column exists");

        assert_eq!(sums.total(), 100.0);
        assert_eq!(counts.total(), 5.0);
    }

    #[test]
    fn group_count_counts_cart_events() {
        let snapshot = cart(&[
            (ts(2025, 1, 1), "S1", "X", "p1"),
            (ts(2025, 1, 1), "S1", "Y", "p2"),
            (ts(2025, 1, 2), "S2", "X", "p3"),
        ]);
        let rows = RowSet::from_snapshot(&snapshot);

        let counts = group_count(&rows, "group").expect("column exists");

        assert_eq!(counts.get("X"), Some(2.0));
        assert_eq!(counts.get("Y"), Some(1.0));
    }

    #[test]
    fn group_mean_skips_groups_without_values() {
        let mut snapshot = orders(&[
            (ts(2025, 1, 1), "A", "x", 100.0, ""),
            (ts(2025, 1, 2), "A", "x", 50.0, ""),
            (ts(2025, 1, 3), "B", "y", 0.0, ""),
        ]);
        snapshot.rows[2].values[3] = crate::domain::entities::dataset::Value::Empty;
        let rows = RowSet::from_snapshot(&snapshot);

        let means = group_mean(&rows, "store", "amount").expect("columns exist");

        assert_eq!(means.entries(), &[("A".to_string(), 75.0)]);
        assert_eq!(means.get("B"), None);
    }

    #[test]
    fn empty_row_set_yields_empty_mappings() {
        let snapshot = orders(&[]);
        let rows = RowSet::from_snapshot(&snapshot);

        assert!(group_sum(&rows, "store", "amount").expect("columns exist").is_empty());
        assert!(group_count(&rows, "store").expect("column exists").is_empty());
        assert!(group_mean(&rows, "store", "amount").expect("columns exist").is_empty());
    }

    #[test]
    fn non_numeric_value_is_a_shape_error() {
        let snapshot = orders(&[(ts(2025, 1, 1), "A", "x", 1.0, "")]);
        let rows = RowSet::from_snapshot(&snapshot);

        let err = group_sum(&rows, "amount", "store").expect_err("store is text");

        assert!(matches!(err, PipelineError::DataShape(_)));
    }

    #[test]
    fn unknown_field_is_a_shape_error() {
        let snapshot = orders(&[(ts(2025, 1, 1), "A", "x", 1.0, "")]);
        let rows = RowSet::from_snapshot(&snapshot);

        assert!(matches!(
            group_count(&rows, "region"),
            Err(PipelineError::DataShape(_))
        ));
    }
}
