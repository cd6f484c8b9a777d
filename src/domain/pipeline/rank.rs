use super::group::group_count;
use super::{group_label, RowSet};
use crate::domain::entities::aggregate::{GroupedValues, RankEntry, OTHER_LABEL};
use crate::domain::error::PipelineResult;

/// Largest `n` entries, descending, plus one `"Other"` entry holding the sum
/// of the rest when there is a rest. Ties keep first-occurrence order.
pub fn top_n_with_other(mapping: &GroupedValues, n: usize) -> Vec<RankEntry> {
    let mut sorted = mapping.clone();
    sorted.sort_descending();

    let mut entries = sorted.into_entries().into_iter();
    let mut ranked: Vec<RankEntry> = entries
        .by_ref()
        .take(n)
        .map(|(label, value)| RankEntry::new(label, value))
        .collect();

    let tail: Vec<f64> = entries.map(|(_, value)| value).collect();
    if !tail.is_empty() {
        ranked.push(RankEntry::new(OTHER_LABEL, tail.iter().sum()));
    }
    ranked
}

/// Counts `rank_field` among rows whose `filter_field` equals `filter_value`
/// and returns the `k` most frequent, descending.
pub fn top_k_by_group(
    rows: &RowSet<'_>,
    filter_field: &str,
    filter_value: &str,
    rank_field: &str,
    k: usize,
) -> PipelineResult<Vec<RankEntry>> {
    let filter_idx = rows.field(filter_field)?;
    rows.field(rank_field)?;

    let matching = rows.retain(|row| {
        group_label(row.get(filter_idx)).as_deref() == Some(filter_value)
    });
    let mut counts = group_count(&matching, rank_field)?;
    counts.sort_descending();

    Ok(counts
        .into_entries()
        .into_iter()
        .take(k)
        .map(|(label, value)| RankEntry::new(label, value))
        .collect())
}
