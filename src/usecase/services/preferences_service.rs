use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::entities::dataset::DatasetKind;
use crate::domain::entities::filter::FilterState;
use crate::usecase::ports::prefs::{
    PreferencesRepository, PrefsError, RecentSource, SelectionField,
};

pub struct PreferencesService {
    repo: Arc<dyn PreferencesRepository>,
    recent_limit: usize,
}

impl PreferencesService {
    pub fn new(repo: Arc<dyn PreferencesRepository>, recent_limit: usize) -> Self {
        Self { repo, recent_limit }
    }

    pub fn init(&self) -> Result<(), PrefsError> {
        self.repo.init()
    }

    pub fn remember_source(&self, path: &Path, kind: DatasetKind) -> Result<(), PrefsError> {
        self.repo
            .record_recent_source(&path.to_string_lossy(), kind)
    }

    pub fn recent_sources(&self) -> Result<Vec<RecentSource>, PrefsError> {
        self.repo.list_recent_sources(self.recent_limit)
    }

    /// Restores the remembered store/group selection onto `filter`. Values no
    /// longer present in the source are dropped, and a selection left with none
    /// of its values falls back to "all". A failed read leaves `filter` as is.
    pub fn restore_selection(
        &self,
        path: &Path,
        filter: &mut FilterState,
        stores: &[String],
        groups: &[String],
    ) {
        let stored = match self.repo.load_filter_selection(&path.to_string_lossy()) {
            Ok(stored) => stored,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "failed to load saved filters");
                return;
            }
        };
        filter.stores = stored.stores.and_then(|saved| still_present(saved, stores));
        filter.groups = stored.groups.and_then(|saved| still_present(saved, groups));
        debug!(path = %path.display(), "restored saved filters");
    }

    pub fn save_selection(&self, path: &Path, filter: &FilterState) -> Result<(), PrefsError> {
        let key = path.to_string_lossy();
        self.repo
            .save_filter_selection(&key, SelectionField::Store, filter.stores.as_ref())?;
        self.repo
            .save_filter_selection(&key, SelectionField::Group, filter.groups.as_ref())
    }

    pub fn reset_selection(&self, path: &Path) -> Result<(), PrefsError> {
        self.repo.clear_filter_selection(&path.to_string_lossy())
    }
}

/// Remembered values that still occur in `available`. `None` when a non-empty
/// selection lost every value; an explicitly empty selection stays empty.
fn still_present(saved: BTreeSet<String>, available: &[String]) -> Option<BTreeSet<String>> {
    if saved.is_empty() {
        return Some(saved);
    }
    let kept: BTreeSet<String> = saved
        .into_iter()
        .filter(|value| available.contains(value))
        .collect();
    if kept.is_empty() {
        None
    } else {
        Some(kept)
    }
}
