use std::collections::BTreeSet;
use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::params;

use crate::domain::entities::dataset::DatasetKind;
use crate::infra::sqlite::schema::open_connection;
use crate::usecase::ports::prefs::{RecentSource, SelectionField, StoredSelection};

pub fn record_recent_source(db_path: &Path, path: &str, kind: DatasetKind) -> Result<()> {
    let conn = open_connection(db_path)?;
    conn.execute(
        "INSERT OR REPLACE INTO recent_source(path, kind, opened_at)
         VALUES (?1, ?2, datetime('now'))",
        params![path, kind.as_str()],
    )
    .with_context(|| format!("failed to record recent source: {path}"))?;
    Ok(())
}

pub fn list_recent_sources(db_path: &Path, limit: usize) -> Result<Vec<RecentSource>> {
    let conn = open_connection(db_path)?;
    let mut stmt = conn
        .prepare(
            "SELECT path, kind, opened_at
             FROM recent_source
             ORDER BY rowid DESC
             LIMIT ?1",
        )
        .context("failed to prepare recent sources query")?;

    let rows = stmt
        .query_map([limit as i64], |row| {
            let path: String = row.get(0)?;
            let kind: String = row.get(1)?;
            let opened_at: String = row.get(2)?;
            Ok((path, kind, opened_at))
        })
        .context("failed to query recent sources")?;

    let mut sources = Vec::new();
    for item in rows {
        let (path, kind, opened_at) = item.context("failed to read recent source row")?;
        let Some(kind) = DatasetKind::parse(&kind) else {
            continue;
        };
        sources.push(RecentSource {
            path,
            kind,
            opened_at,
        });
    }

    Ok(sources)
}

pub fn load_filter_selection(db_path: &Path, source_path: &str) -> Result<StoredSelection> {
    let conn = open_connection(db_path)?;

    let mut field_stmt = conn
        .prepare("SELECT field FROM filter_field WHERE source_path = ?1")
        .context("failed to prepare filter field query")?;
    let fields = field_stmt
        .query_map([source_path], |row| row.get::<_, String>(0))
        .context("failed to query filter fields")?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("failed to collect filter fields")?;

    let mut value_stmt = conn
        .prepare(
            "SELECT value FROM filter_value
             WHERE source_path = ?1 AND field = ?2
             ORDER BY value ASC",
        )
        .context("failed to prepare filter value query")?;

    let mut selection = StoredSelection::default();
    for field in fields {
        let values = value_stmt
            .query_map(params![source_path, field], |row| row.get::<_, String>(0))
            .context("failed to query filter values")?
            .collect::<rusqlite::Result<BTreeSet<_>>>()
            .context("failed to collect filter values")?;
        match field.as_str() {
            "store" => selection.stores = Some(values),
            "group" => selection.groups = Some(values),
            _ => {}
        }
    }

    Ok(selection)
}

/// `None` forgets the field (every value selected); `Some` stores the exact set, even when empty.
pub fn save_filter_selection(
    db_path: &Path,
    source_path: &str,
    field: SelectionField,
    values: Option<&BTreeSet<String>>,
) -> Result<()> {
    let mut conn = open_connection(db_path)?;
    let tx = conn
        .transaction()
        .context("failed to start filter selection transaction")?;

    tx.execute(
        "DELETE FROM filter_field WHERE source_path = ?1 AND field = ?2",
        params![source_path, field.as_str()],
    )
    .context("failed to clear existing filter selection")?;

    if let Some(values) = values {
        tx.execute(
            "INSERT INTO filter_field(source_path, field) VALUES (?1, ?2)",
            params![source_path, field.as_str()],
        )
        .context("failed to insert filter field")?;

        let mut insert_value = tx
            .prepare(
                "INSERT INTO filter_value(source_path, field, value)
                 VALUES (?1, ?2, ?3)",
            )
            .context("failed to prepare filter value insert")?;
        for value in values {
            insert_value
                .execute(params![source_path, field.as_str(), value])
                .context("failed to insert filter value")?;
        }
    }

    tx.commit()
        .context("failed to commit filter selection transaction")?;
    Ok(())
}

pub fn clear_filter_selection(db_path: &Path, source_path: &str) -> Result<()> {
    let conn = open_connection(db_path)?;
    conn.execute(
        "DELETE FROM filter_field WHERE source_path = ?1",
        [source_path],
    )
    .with_context(|| format!("failed to clear filters for {source_path}"))?;
    Ok(())
}
