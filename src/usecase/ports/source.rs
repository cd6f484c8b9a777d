use std::path::Path;
use std::time::SystemTime;

use thiserror::Error;

use crate::domain::entities::dataset::TabularData;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    #[error("unsupported file type: {0}")]
    Unsupported(String),

    #[error("{0}")]
    Read(String),
}

/// Identity of one version of a source file. A change in either field means
/// the file must be read again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceFingerprint {
    pub modified: Option<SystemTime>,
    pub len: u64,
}

pub trait SpreadsheetSource: Send + Sync {
    fn fingerprint(&self, path: &Path) -> Result<SourceFingerprint, SourceError>;

    /// Header row plus string cells. Date cells come back rendered with `date_format`.
    fn read(&self, path: &Path, date_format: &str) -> Result<TabularData, SourceError>;
}
