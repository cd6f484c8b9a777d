use std::sync::Arc;

use chrono::NaiveDate;
use tracing::debug;

use crate::config::DashboardConfig;
use crate::domain::entities::aggregate::{
    DailyStat, GroupedValues, KpiSummary, MonthlyStat, PivotTable, RankEntry, StoreStat,
};
use crate::domain::entities::dataset::{DatasetKind, Snapshot};
use crate::domain::entities::filter::FilterState;
use crate::domain::entities::schema::DatasetSchema;
use crate::domain::error::{PipelineError, PipelineResult};
use crate::domain::pipeline::{
    daily_stats, date_bounds, distinct_values, filter_by_date_range, filter_by_membership,
    group_count, group_sum, kpi_summary, monthly_stats, pivot_mean, store_stats, top_k_by_group,
    top_n_with_other, RowSet,
};

#[derive(Debug, Clone, PartialEq)]
pub struct OrdersReport {
    pub kpis: KpiSummary,
    pub monthly: Vec<MonthlyStat>,
    pub store_share: Vec<RankEntry>,
    pub category_sales: GroupedValues,
    pub avg_check: PivotTable,
    pub daily: Vec<DailyStat>,
    pub stores: Vec<StoreStat>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CartReport {
    pub total_events: usize,
    pub daily_counts: Vec<DailyStat>,
    pub group_share: Vec<RankEntry>,
    pub store_counts: GroupedValues,
    pub top_products: Vec<RankEntry>,
    pub focus_group: Option<String>,
    pub focus_products: Vec<RankEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterOptions {
    pub stores: Vec<String>,
    pub groups: Vec<String>,
    pub date_bounds: Option<(NaiveDate, NaiveDate)>,
}

/// Applies the current filter to a snapshot and computes the aggregate
/// tables for the rendering layer. Nothing is kept between calls.
pub struct ReportService {
    config: Arc<DashboardConfig>,
}

impl ReportService {
    pub fn new(config: Arc<DashboardConfig>) -> Self {
        Self { config }
    }

    pub fn filter_options(&self, snapshot: &Snapshot) -> PipelineResult<FilterOptions> {
        let schema = self.config.schema(snapshot.kind);
        let rows = RowSet::from_snapshot(snapshot);
        Ok(FilterOptions {
            stores: distinct_values(&rows, &schema.store_field)?,
            groups: distinct_values(&rows, &schema.group_field)?,
            date_bounds: date_bounds(&rows),
        })
    }

    pub fn orders_report(
        &self,
        snapshot: &Snapshot,
        filter: &FilterState,
    ) -> PipelineResult<OrdersReport> {
        expect_kind(snapshot, DatasetKind::Orders)?;
        let schema = &self.config.orders;
        let amount_field = schema
            .amount_field
            .as_deref()
            .ok_or_else(|| PipelineError::DataShape("orders schema has no amount column".into()))?;

        let all = RowSet::from_snapshot(snapshot);
        let rows = apply_filter(&all, schema, filter)?;

        // Exports without a contact column still report, with no unique customers.
        let contact_field = schema
            .contact_field
            .as_deref()
            .filter(|field| snapshot.column_index(field).is_ok());

        let store_sums = group_sum(&rows, &schema.store_field, amount_field)?;
        let report = OrdersReport {
            kpis: kpi_summary(&rows, amount_field, contact_field)?,
            monthly: monthly_stats(&rows, amount_field)?,
            store_share: top_n_with_other(&store_sums, schema.top_n),
            category_sales: group_sum(&rows, &schema.group_field, amount_field)?,
            avg_check: pivot_mean(&rows, &schema.store_field, &schema.group_field, amount_field)?,
            daily: daily_stats(&rows, Some(amount_field))?,
            stores: store_stats(&rows, &schema.store_field, amount_field)?,
        };
        debug!(
            rows = rows.len(),
            total = all.len(),
            months = report.monthly.len(),
            "computed orders report"
        );
        Ok(report)
    }

    /// `focus_group` selects the group whose products are ranked separately;
    /// without one the largest group is used.
    pub fn cart_report(
        &self,
        snapshot: &Snapshot,
        filter: &FilterState,
        focus_group: Option<&str>,
    ) -> PipelineResult<CartReport> {
        expect_kind(snapshot, DatasetKind::Cart)?;
        let schema = &self.config.cart;
        let k = self.config.top_k_products;

        let all = RowSet::from_snapshot(snapshot);
        let rows = apply_filter(&all, schema, filter)?;

        let group_counts = group_count(&rows, &schema.group_field)?;
        let group_share = top_n_with_other(&group_counts, schema.top_n);

        let (top_products, focus_group, focus_products) = match schema.product_field.as_deref() {
            Some(product_field) => {
                let mut overall = group_count(&rows, product_field)?;
                overall.sort_descending();
                let top_products = overall
                    .into_entries()
                    .into_iter()
                    .take(k)
                    .map(|(label, value)| RankEntry::new(label, value))
                    .collect();

                let focus = focus_group.map(str::to_string).or_else(|| {
                    group_share
                        .iter()
                        .find(|entry| !entry.is_other())
                        .map(|entry| entry.label.clone())
                });
                let focus_products = match focus.as_deref() {
                    Some(group) => {
                        top_k_by_group(&rows, &schema.group_field, group, product_field, k)?
                    }
                    None => Vec::new(),
                };
                (top_products, focus, focus_products)
            }
            None => (Vec::new(), None, Vec::new()),
        };

        let report = CartReport {
            total_events: rows.len(),
            daily_counts: daily_stats(&rows, None)?,
            group_share,
            store_counts: group_count(&rows, &schema.store_field)?,
            top_products,
            focus_group,
            focus_products,
        };
        debug!(
            rows = rows.len(),
            total = all.len(),
            groups = report.group_share.len(),
            "computed cart report"
        );
        Ok(report)
    }
}

fn expect_kind(snapshot: &Snapshot, kind: DatasetKind) -> PipelineResult<()> {
    if snapshot.kind == kind {
        Ok(())
    } else {
        Err(PipelineError::DataShape(format!(
            "expected a {kind} snapshot, got {}",
            snapshot.kind
        )))
    }
}

fn apply_filter<'a>(
    rows: &RowSet<'a>,
    schema: &DatasetSchema,
    filter: &FilterState,
) -> PipelineResult<RowSet<'a>> {
    let mut filtered = rows.clone();
    if let Some((start, end)) = filter.date_range {
        filtered = filter_by_date_range(&filtered, start, end);
    }
    if let Some(stores) = &filter.stores {
        filtered = filter_by_membership(&filtered, &schema.store_field, stores)?;
    }
    if let Some(groups) = &filter.groups {
        filtered = filter_by_membership(&filtered, &schema.group_field, groups)?;
    }
    Ok(filtered)
}
