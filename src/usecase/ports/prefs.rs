use std::collections::BTreeSet;

use thiserror::Error;

use crate::domain::entities::dataset::DatasetKind;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PrefsError {
    #[error("{0}")]
    Message(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecentSource {
    pub path: String,
    pub kind: DatasetKind,
    pub opened_at: String,
}

/// Field whose selected values are remembered per source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SelectionField {
    Store,
    Group,
}

impl SelectionField {
    pub fn as_str(self) -> &'static str {
        match self {
            SelectionField::Store => "store",
            SelectionField::Group => "group",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoredSelection {
    pub stores: Option<BTreeSet<String>>,
    pub groups: Option<BTreeSet<String>>,
}

pub trait PreferencesRepository: Send + Sync {
    fn init(&self) -> Result<(), PrefsError>;

    fn record_recent_source(&self, path: &str, kind: DatasetKind) -> Result<(), PrefsError>;
    fn list_recent_sources(&self, limit: usize) -> Result<Vec<RecentSource>, PrefsError>;

    fn load_filter_selection(&self, path: &str) -> Result<StoredSelection, PrefsError>;
    fn save_filter_selection(
        &self,
        path: &str,
        field: SelectionField,
        values: Option<&BTreeSet<String>>,
    ) -> Result<(), PrefsError>;
    fn clear_filter_selection(&self, path: &str) -> Result<(), PrefsError>;
}
