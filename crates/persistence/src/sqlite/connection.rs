//! Database connection and initialization

use spintoearn_core::{Error, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

fn db_error(e: impl std::fmt::Display) -> Error {
    Error::DatabaseError(e.to_string())
}

/// SQLite handle holding the `kv_store` table
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open (or create) the game database file, creating parent directories
    pub async fn connect(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(db_error)?;
        }
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);
        debug!("Opening game database at {}", path.display());
        Self::open(options, 5).await
    }

    /// Private in-memory database, gone when dropped
    pub async fn connect_in_memory() -> Result<Self> {
        // a single connection so every query sees the same memory database
        let options = SqliteConnectOptions::from_str("sqlite::memory:").map_err(db_error)?;
        Self::open(options, 1).await
    }

    async fn open(options: SqliteConnectOptions, max_connections: u32) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await
            .map_err(db_error)?;
        let db = Self { pool };
        db.run_migrations().await?;
        Ok(db)
    }

    /// Run database migrations
    async fn run_migrations(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS kv_store (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
            );
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(())
    }

    /// Get a reference to the connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}
