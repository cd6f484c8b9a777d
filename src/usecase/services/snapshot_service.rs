use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use thiserror::Error;
use tracing::{debug, info};

use crate::config::DashboardConfig;
use crate::domain::entities::dataset::{
    column_index, DatasetKind, Row, Snapshot, TabularData, Value,
};
use crate::domain::entities::schema::DatasetSchema;
use crate::domain::error::{PipelineError, PipelineResult};
use crate::domain::pipeline::{parse_amount, parse_timestamps};
use crate::usecase::ports::source::{SourceError, SourceFingerprint, SpreadsheetSource};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LoadError {
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}

type CacheKey = (PathBuf, DatasetKind);

struct CacheEntry {
    fingerprint: SourceFingerprint,
    snapshot: Arc<Snapshot>,
}

/// Loads source files into typed snapshots and keeps one snapshot per file
/// version.
pub struct SnapshotService {
    source: Arc<dyn SpreadsheetSource>,
    config: Arc<DashboardConfig>,
    cache: Mutex<HashMap<CacheKey, CacheEntry>>,
}

impl SnapshotService {
    pub fn new(source: Arc<dyn SpreadsheetSource>, config: Arc<DashboardConfig>) -> Self {
        Self {
            source,
            config,
            cache: Mutex::new(HashMap::new()),
        }
    }

    pub fn load(&self, path: &Path, kind: DatasetKind) -> Result<Arc<Snapshot>, LoadError> {
        let key = (cache_path(path), kind);
        let fingerprint = self.source.fingerprint(path)?;

        if let Some(entry) = self.cache.lock().get(&key) {
            if entry.fingerprint == fingerprint {
                debug!(path = %path.display(), %kind, "snapshot cache hit");
                return Ok(entry.snapshot.clone());
            }
        }

        let schema = self.config.schema(kind);
        let data = self.source.read(path, &schema.date_format)?;
        let snapshot = Arc::new(build_snapshot(path, kind, data, schema)?);
        info!(
            path = %path.display(),
            %kind,
            rows = snapshot.len(),
            "loaded snapshot"
        );

        self.cache.lock().insert(
            key,
            CacheEntry {
                fingerprint,
                snapshot: snapshot.clone(),
            },
        );
        Ok(snapshot)
    }

    pub fn invalidate(&self, path: &Path) {
        let target = cache_path(path);
        self.cache.lock().retain(|(cached, _), _| *cached != target);
    }

    pub fn cached_len(&self) -> usize {
        self.cache.lock().len()
    }
}

fn cache_path(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Types raw cells under `schema`: the date column becomes timestamps, the
/// amount column numbers, everything else text. Any bad timestamp or amount
/// (empty, unreadable or negative) rejects the whole file.
pub fn build_snapshot(
    source: &Path,
    kind: DatasetKind,
    data: TabularData,
    schema: &DatasetSchema,
) -> PipelineResult<Snapshot> {
    let columns: Vec<String> = data
        .columns
        .iter()
        .map(|column| column.trim().to_string())
        .collect();
    for required in schema.required_columns() {
        column_index(&columns, required)?;
    }

    let timestamps = parse_timestamps(&data, &schema.date_field, &schema.date_format)?;
    let date_idx = column_index(&columns, &schema.date_field)?;
    let amount_idx = schema
        .amount_field
        .as_deref()
        .map(|field| column_index(&columns, field))
        .transpose()?;

    let mut rows = Vec::with_capacity(data.rows.len());
    for (row_idx, (raw, timestamp)) in data.rows.into_iter().zip(timestamps).enumerate() {
        let mut values = Vec::with_capacity(columns.len());
        for col_idx in 0..columns.len() {
            let cell = raw.get(col_idx).map(String::as_str).unwrap_or("").trim();
            let value = if col_idx == date_idx {
                Value::DateTime(timestamp)
            } else if Some(col_idx) == amount_idx {
                Value::Number(read_amount(cell, &columns[col_idx], row_idx + 1)?)
            } else if cell.is_empty() {
                Value::Empty
            } else {
                Value::Text(cell.to_string())
            };
            values.push(value);
        }
        rows.push(Row { values, timestamp });
    }

    Ok(Snapshot {
        source: source.to_path_buf(),
        kind,
        columns,
        rows,
    })
}

fn read_amount(cell: &str, column: &str, data_row: usize) -> PipelineResult<f64> {
    let amount = parse_amount(cell).ok_or_else(|| {
        PipelineError::DataShape(format!(
            "data row {data_row}: amount {cell:?} in column {column} is not a number"
        ))
    })?;
    if amount < 0.0 {
        return Err(PipelineError::DataShape(format!(
            "data row {data_row}: amount {cell:?} in column {column} is negative"
        )));
    }
    Ok(amount)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    struct FakeSource {
        data: Mutex<TabularData>,
        fingerprint: Mutex<SourceFingerprint>,
        reads: AtomicUsize,
    }

    impl FakeSource {
        fn new(data: TabularData) -> Self {
            Self {
                data: Mutex::new(data),
                fingerprint: Mutex::new(SourceFingerprint {
                    modified: None,
                    len: 1,
                }),
                reads: AtomicUsize::new(0),
            }
        }
    }

    impl SpreadsheetSource for FakeSource {
        fn fingerprint(&self, _path: &Path) -> Result<SourceFingerprint, SourceError> {
            Ok(*self.fingerprint.lock())
        }

        fn read(&self, _path: &Path, _date_format: &str) -> Result<TabularData, SourceError> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            Ok(self.data.lock().clone())
        }
    }

    fn orders_data(rows: &[[&str; 5]]) -> TabularData {
        TabularData {
            columns: ["Заказ", "Дата статуса", "Сумма заказа", "Магазин", "group"]
                .iter()
                .map(|c| c.to_string())
                .collect(),
            rows: rows
                .iter()
                .map(|row| row.iter().map(|c| c.to_string()).collect())
                .collect(),
        }
    }

    #[test]
    fn build_snapshot_types_date_and_amount_columns() {
        let data = orders_data(&[["1", "22.01.2025 10:15:00", "1 500", "Mega", "shoes"]]);

        let snapshot = build_snapshot(
            Path::new("orders.xlsx"),
            DatasetKind::Orders,
            data,
            &DatasetSchema::orders(),
        )
        .expect("snapshot should build");

        assert_eq!(snapshot.len(), 1);
        let row = &snapshot.rows[0];
        assert!(matches!(row.values[1], Value::DateTime(_)));
        assert_eq!(row.values[2], Value::Number(1500.0));
        assert_eq!(row.values[3], Value::Text("Mega".to_string()));
    }

    #[test]
    fn build_snapshot_rejects_bad_timestamp() {
        let data = orders_data(&[
            ["1", "22.01.2025 10:15:00", "10", "Mega", "shoes"],
            ["2", "yesterday", "10", "Mega", "shoes"],
        ]);

        let err = build_snapshot(
            Path::new("orders.xlsx"),
            DatasetKind::Orders,
            data,
            &DatasetSchema::orders(),
        )
        .expect_err("bad timestamp should abort");

        assert!(matches!(err, PipelineError::Parse { row: 2, .. }));
    }

    #[test]
    fn build_snapshot_requires_schema_columns() {
        let mut data = orders_data(&[]);
        data.columns.pop();

        let err = build_snapshot(
            Path::new("orders.xlsx"),
            DatasetKind::Orders,
            data,
            &DatasetSchema::orders(),
        )
        .expect_err("missing group column should fail");

        assert_eq!(err, PipelineError::DataShape("missing column: group".to_string()));
    }

    #[test]
    fn build_snapshot_rejects_non_numeric_amount() {
        let data = orders_data(&[["1", "22.01.2025 10:15:00", "free", "Mega", "shoes"]]);

        let err = build_snapshot(
            Path::new("orders.xlsx"),
            DatasetKind::Orders,
            data,
            &DatasetSchema::orders(),
        )
        .expect_err("text amount should fail");

        assert!(matches!(err, PipelineError::DataShape(_)));
    }

    #[test]
    fn build_snapshot_keeps_empty_text_cells_empty() {
        let data = orders_data(&[["1", "22.01.2025 10:15:00", "10", " ", ""]]);

        let snapshot = build_snapshot(
            Path::new("orders.xlsx"),
            DatasetKind::Orders,
            data,
            &DatasetSchema::orders(),
        )
        .expect("snapshot should build");

        assert_eq!(snapshot.rows[0].values[3], Value::Empty);
        assert_eq!(snapshot.rows[0].values[4], Value::Empty);
    }

    #[test]
    fn build_snapshot_rejects_empty_amount() {
        let data = orders_data(&[
            ["1", "22.01.2025 10:15:00", "100", "A", "shoes"],
            ["2", "22.01.2025 11:00:00", " ", "B", "shoes"],
        ]);

        let err = build_snapshot(
            Path::new("orders.xlsx"),
            DatasetKind::Orders,
            data,
            &DatasetSchema::orders(),
        )
        .expect_err("empty amount should fail");

        match err {
            PipelineError::DataShape(message) => {
                assert!(message.contains("data row 2"), "unexpected message: {message}");
            }
            other => panic!("expected data shape error, got {other:?}"),
        }
    }

    #[test]
    fn build_snapshot_rejects_negative_amount() {
        let data = orders_data(&[["1", "22.01.2025 10:15:00", "-500", "Mega", "shoes"]]);

        let err = build_snapshot(
            Path::new("orders.xlsx"),
            DatasetKind::Orders,
            data,
            &DatasetSchema::orders(),
        )
        .expect_err("negative amount should fail");

        match err {
            PipelineError::DataShape(message) => {
                assert!(message.contains("negative"), "unexpected message: {message}");
            }
            other => panic!("expected data shape error, got {other:?}"),
        }
    }

    #[test]
    fn build_snapshot_reads_thousands_comma() {
        let data = orders_data(&[["1", "22.01.2025 10:15:00", "1,234", "Mega", "shoes"]]);

        let snapshot = build_snapshot(
            Path::new("orders.xlsx"),
            DatasetKind::Orders,
            data,
            &DatasetSchema::orders(),
        )
        .expect("snapshot should build");

        assert_eq!(snapshot.rows[0].values[2], Value::Number(1234.0));
    }

    #[test]
    fn load_reuses_snapshot_until_fingerprint_changes() {
        let source = Arc::new(FakeSource::new(orders_data(&[[
            "1",
            "22.01.2025 10:15:00",
            "10",
            "Mega",
            "shoes",
        ]])));
        let service = SnapshotService::new(source.clone(), Arc::new(DashboardConfig::default()));
        let path = Path::new("no-such-dir/orders.xlsx");

        let first = service.load(path, DatasetKind::Orders).expect("first load");
        let second = service.load(path, DatasetKind::Orders).expect("second load");
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(source.reads.load(Ordering::SeqCst), 1);

        source.fingerprint.lock().len = 2;
        source.data.lock().rows.push(
            ["2", "23.01.2025 09:00:00", "20", "Mega", "hats"]
                .iter()
                .map(|c| c.to_string())
                .collect(),
        );
        let third = service.load(path, DatasetKind::Orders).expect("reload");
        assert!(!Arc::ptr_eq(&first, &third));
        assert_eq!(third.len(), 2);
        assert_eq!(source.reads.load(Ordering::SeqCst), 2);
        assert_eq!(service.cached_len(), 1);

        service.invalidate(path);
        assert_eq!(service.cached_len(), 0);
    }

    #[test]
    fn failed_load_keeps_no_snapshot() {
        let source = Arc::new(FakeSource::new(orders_data(&[[
            "1",
            "not a date",
            "10",
            "Mega",
            "shoes",
        ]])));
        let service = SnapshotService::new(source, Arc::new(DashboardConfig::default()));

        let result = service.load(Path::new("orders.xlsx"), DatasetKind::Orders);

        assert!(matches!(result, Err(LoadError::Pipeline(PipelineError::Parse { .. }))));
        assert_eq!(service.cached_len(), 0);
    }
}
