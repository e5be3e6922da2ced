use anyhow::Result;
use sqlx::SqlitePool;

use crate::config::Config;
use crate::db;

/// Create the schema in the configured database. Safe to run repeatedly.
pub async fn run_migrations(config: &Config) -> Result<()> {
    let pool = db::connect(config).await?;
    apply_schema(&pool).await?;
    pool.close().await;
    Ok(())
}

pub async fn apply_schema(pool: &SqlitePool) -> Result<()> {
    // One row per resource key; `source_path` is the normalized path the
    // key was derived from.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS descriptions (
            key TEXT PRIMARY KEY,
            source_path TEXT NOT NULL UNIQUE,
            text TEXT NOT NULL,
            text_hash TEXT NOT NULL,
            model TEXT,
            dims INTEGER,
            embedding BLOB,
            created_at INTEGER NOT NULL,
            updated_at INTEGER NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS repositories (
            name TEXT PRIMARY KEY,
            url TEXT NOT NULL,
            local_path TEXT NOT NULL,
            head_sha TEXT,
            downloaded_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_descriptions_updated_at ON descriptions(updated_at DESC)",
    )
    .execute(pool)
    .await?;

    Ok(())
}
