use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::Connection;

pub fn open_connection(db_path: &Path) -> Result<Connection> {
    let conn = Connection::open(db_path)
        .with_context(|| format!("failed to open db: {}", db_path.display()))?;
    conn.execute("PRAGMA foreign_keys = ON", [])
        .context("failed to enable foreign key enforcement")?;
    Ok(conn)
}

pub fn init_db(db_path: &Path) -> Result<()> {
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create parent dir: {}", parent.display()))?;
    }

    let conn = open_connection(db_path)?;

    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS recent_source (
            path        TEXT PRIMARY KEY,
            kind        TEXT NOT NULL,
            opened_at   TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        );

        CREATE TABLE IF NOT EXISTS filter_field (
            source_path TEXT NOT NULL,
            field       TEXT NOT NULL,
            PRIMARY KEY (source_path, field)
        );

        CREATE TABLE IF NOT EXISTS filter_value (
            source_path TEXT NOT NULL,
            field       TEXT NOT NULL,
            value       TEXT NOT NULL,
            PRIMARY KEY (source_path, field, value),
            FOREIGN KEY (source_path, field)
                REFERENCES filter_field(source_path, field) ON DELETE CASCADE
        );
        ",
    )
    .context("failed to initialize schema")?;

    Ok(())
}
