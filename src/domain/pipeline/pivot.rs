use super::group::fold_by;
use super::{group_label, RowSet};
use crate::domain::entities::aggregate::PivotTable;
use crate::domain::error::PipelineResult;

/// Mean of `value_field` for every (`row_field`, `col_field`) pair. Both key
/// domains are sorted ascending; pairs without records read as 0.
pub fn pivot_mean(
    rows: &RowSet<'_>,
    row_field: &str,
    col_field: &str,
    value_field: &str,
) -> PipelineResult<PivotTable> {
    let row_idx = rows.field(row_field)?;
    let col_idx = rows.field(col_field)?;
    let value_idx = rows.field(value_field)?;

    let cells = fold_by(
        rows,
        |row| Some((group_label(row.get(row_idx))?, group_label(row.get(col_idx))?)),
        Some((value_idx, value_field)),
    )?;

    let mut row_keys: Vec<String> = cells.iter().map(|((r, _), _)| r.clone()).collect();
    let mut col_keys: Vec<String> = cells.iter().map(|((_, c), _)| c.clone()).collect();
    row_keys.sort();
    row_keys.dedup();
    col_keys.sort();
    col_keys.dedup();

    let mut values = vec![vec![0.0; col_keys.len()]; row_keys.len()];
    for ((row_key, col_key), acc) in &cells {
        let Some(mean) = acc.mean() else {
            continue;
        };
        if let (Ok(r), Ok(c)) = (row_keys.binary_search(row_key), col_keys.binary_search(col_key)) {
            values[r][c] = mean;
        }
    }

    Ok(PivotTable {
        row_keys,
        col_keys,
        values,
    })
}
