use std::path::PathBuf;
use std::sync::Arc;

use dioxus::prelude::*;
use rfd::{FileDialog, MessageButtons, MessageDialog, MessageDialogResult, MessageLevel};
use tracing::{error, info, warn};

use crate::config::{default_db_path, DashboardConfig};
use crate::domain::entities::dataset::DatasetKind;
use crate::domain::entities::filter::FilterState;
use crate::domain::error::PipelineResult;
use crate::format::{format_currency, format_number_with_commas};
use crate::infra::import::FileSpreadsheetSource;
use crate::infra::sqlite::repo::SqliteRepo;
use crate::platform::desktop::blocking::run_blocking;
use crate::ui::components::{BarChart, CheckList, DetailsTable, KpiTile, PivotView};
use crate::ui::state::app_state::{AppState, LoadedSource};
use crate::ui::style::{content_style, root_container_style, sidebar_style};
use crate::ui::view::{
    count_bars, daily_amount_bars, daily_count_bars, date_input_value, date_range_from_inputs,
    detail_rows, grouped_bars, monthly_bars, share_bars, store_rows,
};
use crate::usecase::services::preferences_service::PreferencesService;
use crate::usecase::services::report_service::{CartReport, OrdersReport, ReportService};
use crate::usecase::services::snapshot_service::SnapshotService;

const DETAIL_ROW_LIMIT: usize = 500;

#[derive(Clone)]
struct Services {
    snapshots: Arc<SnapshotService>,
    reports: Arc<ReportService>,
    prefs: Arc<PreferencesService>,
}

fn build_services(config: Arc<DashboardConfig>) -> anyhow::Result<Services> {
    let db_path = default_db_path()?;
    let prefs = PreferencesService::new(Arc::new(SqliteRepo { db_path }), config.recent_limit);
    if let Err(err) = prefs.init() {
        warn!(error = %err, "preferences database unavailable");
    }

    Ok(Services {
        snapshots: Arc::new(SnapshotService::new(
            Arc::new(FileSpreadsheetSource),
            config.clone(),
        )),
        reports: Arc::new(ReportService::new(config)),
        prefs: Arc::new(prefs),
    })
}

fn pick_spreadsheet(title: &str) -> Option<PathBuf> {
    FileDialog::new()
        .set_title(title)
        .add_filter("Spreadsheets", &["xlsx", "xlsm", "xls", "ods", "csv"])
        .add_filter("All files", &["*"])
        .pick_file()
}

/// Loads `path` as `kind` and swaps it into the state. A failed load clears
/// that dataset instead of keeping a stale one.
fn load_source(services: &Services, mut state: AppState, path: PathBuf, kind: DatasetKind) {
    state.busy.set(true);
    state.status.set(format!("Loading {}", path.display()));

    let result = run_blocking("load snapshot", || {
        let snapshot = services.snapshots.load(&path, kind)?;
        let options = services.reports.filter_options(&snapshot)?;
        Ok::<_, anyhow::Error>((snapshot, options))
    });

    match result {
        Ok((snapshot, options)) => {
            let mut filter = FilterState::default();
            services
                .prefs
                .restore_selection(&path, &mut filter, &options.stores, &options.groups);
            if let Err(err) = services.prefs.remember_source(&path, kind) {
                warn!(path = %path.display(), error = %err, "failed to remember source");
            }
            match services.prefs.recent_sources() {
                Ok(recent) => state.recent.set(recent),
                Err(err) => warn!(error = %err, "failed to list recent sources"),
            }

            let rows = snapshot.len();
            let loaded = LoadedSource {
                path: path.clone(),
                snapshot,
                options,
            };
            match kind {
                DatasetKind::Orders => {
                    state.orders.set(Some(loaded));
                    state.orders_filter.set(filter);
                }
                DatasetKind::Cart => {
                    state.cart.set(Some(loaded));
                    state.cart_filter.set(filter);
                    state.focus_group.set(None);
                }
            }
            info!(path = %path.display(), %kind, rows, "source ready");
            state
                .status
                .set(format!("Loaded {rows} rows from {}", path.display()));
        }
        Err(err) => {
            let detail = format!("{err:#}");
            error!(path = %path.display(), %kind, error = %detail, "load failed");
            match kind {
                DatasetKind::Orders => state.orders.set(None),
                DatasetKind::Cart => state.cart.set(None),
            }
            let message = format!("Failed to load {}: {detail}", path.display());
            MessageDialog::new()
                .set_level(MessageLevel::Error)
                .set_title("Load failed")
                .set_description(message.as_str())
                .set_buttons(MessageButtons::Ok)
                .show();
            state.status.set(message);
        }
    }

    state.busy.set(false);
}

fn save_selection(services: &Services, source: Option<&LoadedSource>, filter: &FilterState) {
    let Some(source) = source else {
        return;
    };
    if let Err(err) = services.prefs.save_selection(&source.path, filter) {
        warn!(path = %source.path.display(), error = %err, "failed to save filters");
    }
}

fn render_orders(
    loaded: &LoadedSource,
    report: PipelineResult<OrdersReport>,
    show_details: bool,
) -> Element {
    let report = match report {
        Ok(report) => report,
        Err(err) => {
            return rsx! {
                p { style: "color: #b00020;", "Orders report failed: {err}" }
            };
        }
    };
    let snapshot = &loaded.snapshot;
    let store_columns: Vec<String> = ["Store", "Turnover", "Orders", "Average check"]
        .iter()
        .map(|name| name.to_string())
        .collect();

    rsx! {
        h2 { "Orders" }
        div { style: "display: flex; gap: 12px; margin-bottom: 16px;",
            KpiTile { label: "Turnover".to_string(), value: format_currency(report.kpis.turnover) }
            KpiTile {
                label: "Orders".to_string(),
                value: format_number_with_commas(report.kpis.order_count as f64, 0),
            }
            KpiTile {
                label: "Unique customers".to_string(),
                value: format_number_with_commas(report.kpis.unique_customers as f64, 0),
            }
        }
        BarChart { title: "Turnover by month".to_string(), rows: monthly_bars(&report.monthly) }
        div { style: "display: flex; gap: 24px; flex-wrap: wrap;",
            BarChart { title: "Turnover share by store".to_string(), rows: share_bars(&report.store_share) }
            BarChart { title: "Turnover by category".to_string(), rows: grouped_bars(&report.category_sales) }
        }
        PivotView { title: "Average check by store and category".to_string(), table: report.avg_check }
        BarChart { title: "Turnover by day".to_string(), rows: daily_amount_bars(&report.daily) }
        h3 { style: "margin: 8px 0;", "Stores" }
        DetailsTable {
            columns: store_columns,
            rows: store_rows(&report.stores),
            total: report.stores.len(),
        }
        if show_details {
            DetailsTable {
                columns: snapshot.columns.clone(),
                rows: detail_rows(snapshot, DETAIL_ROW_LIMIT),
                total: snapshot.len(),
            }
        }
    }
}

fn render_cart(
    loaded: &LoadedSource,
    report: PipelineResult<CartReport>,
    show_details: bool,
    mut focus_group: Signal<Option<String>>,
) -> Element {
    let report = match report {
        Ok(report) => report,
        Err(err) => {
            return rsx! {
                p { style: "color: #b00020;", "Cart report failed: {err}" }
            };
        }
    };
    let snapshot = &loaded.snapshot;
    let groups = loaded.options.groups.clone();
    let focus = report.focus_group.clone().unwrap_or_default();
    let focus_title = format!("Top products in {focus}");

    rsx! {
        h2 { "Cart events" }
        div { style: "display: flex; gap: 12px; margin-bottom: 16px;",
            KpiTile {
                label: "Add-to-cart events".to_string(),
                value: format_number_with_commas(report.total_events as f64, 0),
            }
        }
        BarChart { title: "Events by day".to_string(), rows: daily_count_bars(&report.daily_counts) }
        div { style: "display: flex; gap: 24px; flex-wrap: wrap;",
            BarChart { title: "Events by group".to_string(), rows: share_bars(&report.group_share) }
            BarChart { title: "Events by store".to_string(), rows: grouped_bars(&report.store_counts) }
        }
        BarChart { title: "Top products".to_string(), rows: count_bars(&report.top_products) }
        div { style: "display: flex; gap: 8px; align-items: center;",
            span { "Group:" }
            select {
                value: "{focus}",
                onchange: move |evt| focus_group.set(Some(evt.value())),
                {groups.iter().map(|group| rsx!(
                    option { value: "{group}", selected: *group == focus, "{group}" }
                ))}
            }
        }
        BarChart { title: focus_title, rows: count_bars(&report.focus_products) }
        if show_details {
            DetailsTable {
                columns: snapshot.columns.clone(),
                rows: detail_rows(snapshot, DETAIL_ROW_LIMIT),
                total: snapshot.len(),
            }
        }
    }
}

#[component]
pub fn App() -> Element {
    let config = use_context::<Arc<DashboardConfig>>();
    let services = use_hook(move || build_services(config).map_err(|err| format!("{err:#}")));
    let services = match services {
        Ok(services) => services,
        Err(err) => {
            return rsx! {
                div {
                    p { "Failed to start: {err}" }
                }
            };
        }
    };

    let state = AppState::new();
    let AppState {
        orders,
        cart,
        mut orders_filter,
        mut cart_filter,
        mut date_from,
        mut date_to,
        mut focus_group,
        mut show_details,
        mut recent,
        busy,
        mut status,
    } = state;

    let services_for_init = services.clone();
    use_effect(move || match services_for_init.prefs.recent_sources() {
        Ok(sources) => recent.set(sources),
        Err(err) => {
            warn!(error = %err, "failed to list recent sources");
            status.set(format!("Preferences unavailable: {err}"));
        }
    });

    let date_bounds = {
        let bounds: Vec<_> = [orders(), cart()]
            .into_iter()
            .flatten()
            .filter_map(|loaded| loaded.options.date_bounds)
            .collect();
        let min = bounds.iter().map(|(min, _)| *min).min();
        let max = bounds.iter().map(|(_, max)| *max).max();
        min.zip(max)
    };
    let (min_placeholder, max_placeholder) = date_bounds
        .map(|(min, max)| (date_input_value(min), date_input_value(max)))
        .unwrap_or_default();

    let orders_view = orders().map(|loaded| {
        let mut filter = orders_filter();
        if let Some((start, end)) =
            date_range_from_inputs(&date_from(), &date_to(), loaded.options.date_bounds)
        {
            filter = filter.with_date_range(start, end);
        }
        let report = services.reports.orders_report(&loaded.snapshot, &filter);
        (loaded, report)
    });
    let cart_view = cart().map(|loaded| {
        let mut filter = cart_filter();
        if let Some((start, end)) =
            date_range_from_inputs(&date_from(), &date_to(), loaded.options.date_bounds)
        {
            filter = filter.with_date_range(start, end);
        }
        let report = services
            .reports
            .cart_report(&loaded.snapshot, &filter, focus_group().as_deref());
        (loaded, report)
    });

    let has_data = orders_view.is_some() || cart_view.is_some();
    let orders_section = orders_view.map(|(loaded, report)| render_orders(&loaded, report, show_details()));
    let cart_section =
        cart_view.map(|(loaded, report)| render_cart(&loaded, report, show_details(), focus_group));

    let services_for_orders = services.clone();
    let services_for_cart = services.clone();
    let services_for_recent = services.clone();
    let services_for_reload = services.clone();
    let services_for_reset = services.clone();
    let services_for_orders_stores = services.clone();
    let services_for_orders_groups = services.clone();
    let services_for_cart_stores = services.clone();
    let services_for_cart_groups = services.clone();

    rsx! {
        div { style: root_container_style(),
            div { style: sidebar_style(),
                h2 { style: "margin-top: 0;", "Sales dashboard" }

                div { style: "display: flex; flex-direction: column; gap: 6px; margin-bottom: 12px;",
                    button {
                        disabled: busy(),
                        onclick: move |_| {
                            if let Some(path) = pick_spreadsheet("Open orders export") {
                                load_source(&services_for_orders, state, path, DatasetKind::Orders);
                            }
                        },
                        "Open orders…"
                    }
                    button {
                        disabled: busy(),
                        onclick: move |_| {
                            if let Some(path) = pick_spreadsheet("Open cart export") {
                                load_source(&services_for_cart, state, path, DatasetKind::Cart);
                            }
                        },
                        "Open cart events…"
                    }
                    button {
                        disabled: busy() || (orders().is_none() && cart().is_none()),
                        onclick: move |_| {
                            for (loaded, kind) in [(orders(), DatasetKind::Orders), (cart(), DatasetKind::Cart)] {
                                if let Some(loaded) = loaded {
                                    services_for_reload.snapshots.invalidate(&loaded.path);
                                    load_source(&services_for_reload, state, loaded.path, kind);
                                }
                            }
                        },
                        "Reload files"
                    }
                }

                if !recent().is_empty() {
                    div { style: "margin-bottom: 12px;",
                        div { style: "font-weight: 600;", "Recent" }
                        {recent().into_iter().map(|source| {
                            let services = services_for_recent.clone();
                            let path = PathBuf::from(&source.path);
                            let name = path
                                .file_name()
                                .map(|name| name.to_string_lossy().into_owned())
                                .unwrap_or_else(|| source.path.clone());
                            let kind = source.kind;
                            rsx!(
                                div {
                                    style: "cursor: pointer; padding: 2px 0; color: #1f5fbf;",
                                    title: "{source.path}",
                                    onclick: move |_| {
                                        load_source(&services, state, path.clone(), kind);
                                    },
                                    "{name} ({kind})"
                                }
                            )
                        })}
                    }
                }

                div { style: "margin-bottom: 12px;",
                    div { style: "font-weight: 600;", "Date range" }
                    input {
                        r#type: "date",
                        value: "{date_from}",
                        placeholder: "{min_placeholder}",
                        oninput: move |evt| date_from.set(evt.value()),
                    }
                    input {
                        r#type: "date",
                        value: "{date_to}",
                        placeholder: "{max_placeholder}",
                        oninput: move |evt| date_to.set(evt.value()),
                    }
                    button {
                        style: "font-size: 11px; margin-top: 4px;",
                        onclick: move |_| {
                            date_from.set(String::new());
                            date_to.set(String::new());
                        },
                        "Whole period"
                    }
                }

                if let Some(loaded) = orders() {
                    CheckList {
                        title: "Stores (orders)".to_string(),
                        options: loaded.options.stores.clone(),
                        selection: orders_filter().stores,
                        on_change: move |selection| {
                            orders_filter.write().stores = selection;
                            save_selection(&services_for_orders_stores, orders().as_ref(), &orders_filter());
                        },
                    }
                    CheckList {
                        title: "Categories (orders)".to_string(),
                        options: loaded.options.groups.clone(),
                        selection: orders_filter().groups,
                        on_change: move |selection| {
                            orders_filter.write().groups = selection;
                            save_selection(&services_for_orders_groups, orders().as_ref(), &orders_filter());
                        },
                    }
                }

                if let Some(loaded) = cart() {
                    CheckList {
                        title: "Stores (cart)".to_string(),
                        options: loaded.options.stores.clone(),
                        selection: cart_filter().stores,
                        on_change: move |selection| {
                            cart_filter.write().stores = selection;
                            save_selection(&services_for_cart_stores, cart().as_ref(), &cart_filter());
                        },
                    }
                    CheckList {
                        title: "Groups (cart)".to_string(),
                        options: loaded.options.groups.clone(),
                        selection: cart_filter().groups,
                        on_change: move |selection| {
                            cart_filter.write().groups = selection;
                            save_selection(&services_for_cart_groups, cart().as_ref(), &cart_filter());
                        },
                    }
                }

                button {
                    disabled: orders_filter().is_unrestricted()
                        && cart_filter().is_unrestricted()
                        && date_from().is_empty()
                        && date_to().is_empty(),
                    onclick: move |_| {
                        let confirm = MessageDialog::new()
                            .set_level(MessageLevel::Warning)
                            .set_title("Reset filters")
                            .set_description("Forget the saved store and category selection?")
                            .set_buttons(MessageButtons::YesNo)
                            .show();
                        if confirm != MessageDialogResult::Yes {
                            return;
                        }
                        for loaded in [orders(), cart()].into_iter().flatten() {
                            if let Err(err) = services_for_reset.prefs.reset_selection(&loaded.path) {
                                warn!(path = %loaded.path.display(), error = %err, "failed to reset filters");
                            }
                        }
                        orders_filter.set(FilterState::default());
                        cart_filter.set(FilterState::default());
                        date_from.set(String::new());
                        date_to.set(String::new());
                        status.set("Filters reset".to_string());
                    },
                    "Reset filters"
                }

                label { style: "display: flex; gap: 6px; margin-top: 12px; cursor: pointer;",
                    input {
                        r#type: "checkbox",
                        checked: show_details(),
                        onclick: move |_| show_details.set(!show_details()),
                    }
                    span { "Show detailed rows" }
                }

                p { style: "color: #666; font-size: 12px; margin-top: 16px;", "{status}" }
            }

            div { style: content_style(),
                if !has_data {
                    p { style: "color: #666;", "Open an orders or cart export to begin." }
                }

                {orders_section}
                {cart_section}
            }
        }
    }
}
