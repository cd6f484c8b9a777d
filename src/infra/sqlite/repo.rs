use std::collections::BTreeSet;
use std::path::PathBuf;

use crate::domain::entities::dataset::DatasetKind;
use crate::infra::sqlite::queries::{
    clear_filter_selection, list_recent_sources, load_filter_selection, record_recent_source,
    save_filter_selection,
};
use crate::infra::sqlite::schema::init_db;
use crate::usecase::ports::prefs::{
    PreferencesRepository, PrefsError, RecentSource, SelectionField, StoredSelection,
};

pub struct SqliteRepo {
    pub db_path: PathBuf,
}

impl PreferencesRepository for SqliteRepo {
    fn init(&self) -> Result<(), PrefsError> {
        init_db(&self.db_path).map_err(|err| PrefsError::Message(format!("{err:#}")))
    }

    fn record_recent_source(&self, path: &str, kind: DatasetKind) -> Result<(), PrefsError> {
        record_recent_source(&self.db_path, path, kind)
            .map_err(|err| PrefsError::Message(format!("{err:#}")))
    }

    fn list_recent_sources(&self, limit: usize) -> Result<Vec<RecentSource>, PrefsError> {
        list_recent_sources(&self.db_path, limit)
            .map_err(|err| PrefsError::Message(format!("{err:#}")))
    }

    fn load_filter_selection(&self, path: &str) -> Result<StoredSelection, PrefsError> {
        load_filter_selection(&self.db_path, path)
            .map_err(|err| PrefsError::Message(format!("{err:#}")))
    }

    fn save_filter_selection(
        &self,
        path: &str,
        field: SelectionField,
        values: Option<&BTreeSet<String>>,
    ) -> Result<(), PrefsError> {
        save_filter_selection(&self.db_path, path, field, values)
            .map_err(|err| PrefsError::Message(format!("{err:#}")))
    }

    fn clear_filter_selection(&self, path: &str) -> Result<(), PrefsError> {
        clear_filter_selection(&self.db_path, path)
            .map_err(|err| PrefsError::Message(format!("{err:#}")))
    }
}
