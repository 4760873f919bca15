//! Key-value blob operations on the `kv_store` table

use crate::sqlite::Database;
use crate::BlobStore;
use spintoearn_core::{Error, Result};
use sqlx::SqlitePool;

/// Read a blob by key
pub async fn get_blob(pool: &SqlitePool, key: &str) -> Result<Option<String>> {
    sqlx::query_scalar::<_, String>("SELECT value FROM kv_store WHERE key = ?")
        .bind(key)
        .fetch_optional(pool)
        .await
        .map_err(|e| Error::DatabaseError(e.to_string()))
}

/// Insert or replace a blob
pub async fn put_blob(pool: &SqlitePool, key: &str, value: &str) -> Result<()> {
    sqlx::query(
        r#"INSERT INTO kv_store (key, value, updated_at)
           VALUES (?, ?, CURRENT_TIMESTAMP)
           ON CONFLICT(key) DO UPDATE SET
             value = excluded.value,
             updated_at = excluded.updated_at"#,
    )
    .bind(key)
    .bind(value)
    .execute(pool)
    .await
    .map_err(|e| Error::DatabaseError(e.to_string()))?;

    Ok(())
}

/// Delete a blob (no-op if absent)
pub async fn remove_blob(pool: &SqlitePool, key: &str) -> Result<()> {
    sqlx::query("DELETE FROM kv_store WHERE key = ?")
        .bind(key)
        .execute(pool)
        .await
        .map_err(|e| Error::DatabaseError(e.to_string()))?;

    Ok(())
}

/// List stored keys
pub async fn list_keys(pool: &SqlitePool) -> Result<Vec<String>> {
    sqlx::query_scalar::<_, String>("SELECT key FROM kv_store ORDER BY key")
        .fetch_all(pool)
        .await
        .map_err(|e| Error::DatabaseError(e.to_string()))
}

impl BlobStore for Database {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        get_blob(self.pool(), key).await
    }

    async fn put(&self, key: &str, value: &str) -> Result<()> {
        put_blob(self.pool(), key, value).await
    }

    async fn remove(&self, key: &str) -> Result<()> {
        remove_blob(self.pool(), key).await
    }
}
