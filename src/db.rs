use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;

use crate::config::DatabaseConfig;

/// Opens the pool described by `cfg`, creating the database file if needed.
pub async fn connect(cfg: &DatabaseConfig) -> anyhow::Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(&cfg.url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .synchronous(SqliteSynchronous::Normal)
        .foreign_keys(true)
        .busy_timeout(Duration::from_millis(cfg.busy_timeout_ms));

    let pool = SqlitePoolOptions::new()
        .max_connections(cfg.max_connections)
        .connect_with(options)
        .await?;
    Ok(pool)
}

pub async fn init_db(pool: &SqlitePool) -> anyhow::Result<()> {
    // Foreign keys are critical - fail if this doesn't work
    sqlx::query("PRAGMA foreign_keys=ON;").execute(pool).await?;

    if let Err(e) = sqlx::query("PRAGMA temp_store=MEMORY;").execute(pool).await {
        tracing::warn!("Failed to set temp_store: {}", e);
    }

    // parent_id references menus(id); the cascade mirrors the explicit subtree delete
    sqlx::query(
        r#"CREATE TABLE IF NOT EXISTS menus (
            id TEXT PRIMARY KEY,
            parent_id TEXT NULL REFERENCES menus(id) ON DELETE CASCADE,
            title TEXT NOT NULL CHECK (length(title) <= 255),
            path TEXT NULL CHECK (path IS NULL OR length(path) <= 255),
            icon TEXT NULL CHECK (icon IS NULL OR length(icon) <= 100),
            order_index INTEGER NOT NULL DEFAULT 0 CHECK (order_index >= 0),
            created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ','now')),
            updated_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ','now')),
            CHECK (parent_id IS NULL OR parent_id <> id)
        )"#,
    )
    .execute(pool)
    .await?;

    let indexes = [
        ("idx_menus_parent_order", "CREATE INDEX IF NOT EXISTS idx_menus_parent_order ON menus(parent_id, order_index)"),
        ("idx_menus_order", "CREATE INDEX IF NOT EXISTS idx_menus_order ON menus(order_index, created_at)"),
    ];

    for (name, query) in indexes {
        if let Err(e) = sqlx::query(query).execute(pool).await {
            match &e {
                sqlx::Error::Database(db_err) => {
                    let msg = db_err.message().to_lowercase();
                    if msg.contains("already exists") || msg.contains("duplicate") {
                        tracing::debug!("Index {} already exists, skipping", name);
                    } else {
                        tracing::warn!("Failed to create index {}: {}", name, e);
                    }
                }
                _ => {
                    tracing::warn!("Failed to create index {}: {}", name, e);
                }
            }
        }
    }

    Ok(())
}
