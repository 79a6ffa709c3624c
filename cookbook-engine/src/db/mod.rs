//! Database access for the authoritative recipe store
//!
//! SQLite file in the root folder, one `recipes` table. Ingredients are
//! stored as a JSON array column so containment can be queried with
//! `json_each`.

pub mod recipes;

use crate::error::StoreError;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use std::path::Path;

/// Initialize database connection pool
///
/// Creates the file (and parent directory) if missing and ensures tables exist.
pub async fn init_database_pool(db_path: &Path) -> Result<SqlitePool, StoreError> {
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| StoreError::Unavailable(format!("Create {}: {}", parent.display(), e)))?;
    }

    // mode=rwc: read, write, create
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    tracing::debug!("Connecting to database: {}", db_url);

    let pool = SqlitePool::connect(&db_url).await?;
    init_tables(&pool).await?;
    Ok(pool)
}

/// Private in-memory database, used by `--ephemeral` runs
///
/// A single connection keeps every query on the same in-memory database.
pub async fn init_memory_pool() -> Result<SqlitePool, StoreError> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await?;
    init_tables(&pool).await?;
    Ok(pool)
}

/// Create the recipes table and its owner/title index if they don't exist
pub async fn init_tables(pool: &SqlitePool) -> Result<(), StoreError> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS recipes (
            id TEXT PRIMARY KEY,
            catalog_id TEXT,
            title TEXT NOT NULL,
            category TEXT NOT NULL,
            area TEXT,
            ingredients TEXT NOT NULL DEFAULT '[]',
            instructions TEXT NOT NULL DEFAULT '',
            image_url TEXT,
            user_id TEXT,
            favorite INTEGER NOT NULL DEFAULT 0,
            created_at INTEGER NOT NULL,
            imported_from_catalog INTEGER NOT NULL DEFAULT 0
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_recipes_user_title ON recipes (user_id, title)")
        .execute(pool)
        .await?;

    tracing::info!("Database tables initialized (recipes)");
    Ok(())
}
