use std::collections::HashSet;

use super::group::fold_by;
use super::{group_label, month_key, numeric_value, RowSet};
use crate::domain::entities::aggregate::{DailyStat, KpiSummary, MonthlyStat, StoreStat};
use crate::domain::error::PipelineResult;

/// Order count and amount sum per `"YYYY-MM"`, ascending by month.
pub fn monthly_stats(rows: &RowSet<'_>, amount_field: &str) -> PipelineResult<Vec<MonthlyStat>> {
    let amount_idx = rows.field(amount_field)?;
    let mut months = fold_by(
        rows,
        |row| Some(month_key(row.timestamp)),
        Some((amount_idx, amount_field)),
    )?;
    months.sort_by(|a, b| a.0.cmp(&b.0));

    Ok(months
        .into_iter()
        .map(|(month, acc)| MonthlyStat {
            month,
            order_count: acc.count,
            amount_sum: acc.sum,
        })
        .collect())
}

/// Record count (and amount sum when an amount column is given) per calendar date, ascending.
pub fn daily_stats(rows: &RowSet<'_>, amount_field: Option<&str>) -> PipelineResult<Vec<DailyStat>> {
    let value = match amount_field {
        Some(field) => Some((rows.field(field)?, field)),
        None => None,
    };
    let mut days = fold_by(rows, |row| Some(row.timestamp.date()), value)?;
    days.sort_by_key(|(date, _)| *date);

    Ok(days
        .into_iter()
        .map(|(date, acc)| DailyStat {
            date,
            amount_sum: acc.sum,
            count: acc.count,
        })
        .collect())
}

/// Sum, record count and mean (`sum / count`) per store, descending by sum.
/// Every store with at least one record is listed.
pub fn store_stats(
    rows: &RowSet<'_>,
    store_field: &str,
    amount_field: &str,
) -> PipelineResult<Vec<StoreStat>> {
    let store_idx = rows.field(store_field)?;
    let amount_idx = rows.field(amount_field)?;
    let stores = fold_by(
        rows,
        |row| group_label(row.get(store_idx)),
        Some((amount_idx, amount_field)),
    )?;

    let mut stats: Vec<StoreStat> = stores
        .into_iter()
        .map(|(store, acc)| StoreStat {
            store,
            amount_sum: acc.sum,
            count: acc.count,
            mean: acc.sum / acc.count as f64,
        })
        .collect();
    stats.sort_by(|a, b| {
        b.amount_sum
            .partial_cmp(&a.amount_sum)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    Ok(stats)
}

pub fn kpi_summary(
    rows: &RowSet<'_>,
    amount_field: &str,
    contact_field: Option<&str>,
) -> PipelineResult<KpiSummary> {
    let amount_idx = rows.field(amount_field)?;
    let contact_idx = contact_field.map(|field| rows.field(field)).transpose()?;

    let mut turnover = 0.0;
    let mut customers = HashSet::new();
    for row in rows.rows() {
        if let Some(amount) = numeric_value(row.get(amount_idx), amount_field)? {
            turnover += amount;
        }
        if let Some(contact) = contact_idx.and_then(|idx| group_label(row.get(idx))) {
            customers.insert(contact);
        }
    }

    Ok(KpiSummary {
        turnover,
        order_count: rows.len(),
        unique_customers: customers.len(),
    })
}
