pub mod csv;
pub mod xlsx;

use std::path::Path;

use tracing::debug;

use crate::domain::entities::dataset::TabularData;
use crate::usecase::ports::source::{SourceError, SourceFingerprint, SpreadsheetSource};

const WORKBOOK_EXTENSIONS: [&str; 5] = ["xlsx", "xlsm", "xlsb", "xls", "ods"];

/// Reads spreadsheets from the local file system.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileSpreadsheetSource;

impl SpreadsheetSource for FileSpreadsheetSource {
    fn fingerprint(&self, path: &Path) -> Result<SourceFingerprint, SourceError> {
        let metadata = std::fs::metadata(path).map_err(|err| {
            SourceError::Read(format!("failed to stat {}: {err}", path.display()))
        })?;
        Ok(SourceFingerprint {
            modified: metadata.modified().ok(),
            len: metadata.len(),
        })
    }

    fn read(&self, path: &Path, date_format: &str) -> Result<TabularData, SourceError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        debug!(path = %path.display(), %extension, "reading source file");

        let result = if extension == "csv" {
            self::csv::read_csv(path)
        } else if WORKBOOK_EXTENSIONS.contains(&extension.as_str()) {
            self::xlsx::read_first_sheet(path, date_format)
        } else {
            return Err(SourceError::Unsupported(path.display().to_string()));
        };
        result.map_err(|err| SourceError::Read(format!("{err:#}")))
    }
}
