use std::path::PathBuf;
use std::sync::Arc;

use dioxus::prelude::{use_signal, Signal};

use crate::domain::entities::dataset::Snapshot;
use crate::domain::entities::filter::FilterState;
use crate::usecase::ports::prefs::RecentSource;
use crate::usecase::services::report_service::FilterOptions;

/// Everything the shell needs for one loaded dataset.
#[derive(Clone)]
pub struct LoadedSource {
    pub path: PathBuf,
    pub snapshot: Arc<Snapshot>,
    pub options: FilterOptions,
}

#[derive(Clone, Copy)]
pub struct AppState {
    pub orders: Signal<Option<LoadedSource>>,
    pub cart: Signal<Option<LoadedSource>>,
    pub orders_filter: Signal<FilterState>,
    pub cart_filter: Signal<FilterState>,
    pub date_from: Signal<String>,
    pub date_to: Signal<String>,
    pub focus_group: Signal<Option<String>>,
    pub show_details: Signal<bool>,
    pub recent: Signal<Vec<RecentSource>>,
    pub busy: Signal<bool>,
    pub status: Signal<String>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            orders: use_signal(|| None::<LoadedSource>),
            cart: use_signal(|| None::<LoadedSource>),
            orders_filter: use_signal(FilterState::default),
            cart_filter: use_signal(FilterState::default),
            date_from: use_signal(String::new),
            date_to: use_signal(String::new),
            focus_group: use_signal(|| None::<String>),
            show_details: use_signal(|| false),
            recent: use_signal(Vec::<RecentSource>::new),
            busy: use_signal(|| false),
            status: use_signal(|| "Ready".to_string()),
        }
    }
}
