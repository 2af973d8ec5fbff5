//! Key-value blob access.

use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::{Row, SqlitePool};

use crate::errors::AppError;

/// Handle to the persisted blob table.
#[derive(Clone)]
pub struct BlobStore {
    pool: SqlitePool,
}

impl BlobStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Read a raw string blob.
    pub async fn get_raw(&self, key: &str) -> Result<Option<String>, AppError> {
        let row = sqlx::query("SELECT value FROM blobs WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|r| r.get("value")))
    }

    /// Write a raw string blob, replacing any existing value.
    pub async fn put_raw(&self, key: &str, value: &str) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO blobs (key, value) VALUES (?, ?) \
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Remove a blob. Missing keys are fine.
    pub async fn delete(&self, key: &str) -> Result<(), AppError> {
        sqlx::query("DELETE FROM blobs WHERE key = ?")
            .bind(key)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Read a JSON blob, falling back to the supplied default when the key
    /// is absent or its value does not parse. Corruption is logged, never
    /// surfaced to the caller.
    pub async fn get_json_or<T, F>(&self, key: &str, default: F) -> Result<T, AppError>
    where
        T: DeserializeOwned,
        F: FnOnce() -> T,
    {
        match self.get_raw(key).await? {
            Some(raw) => match serde_json::from_str(&raw) {
                Ok(value) => Ok(value),
                Err(err) => {
                    tracing::warn!("Corrupt blob under key {:?}: {}", key, err);
                    Ok(default())
                }
            },
            None => Ok(default()),
        }
    }

    /// Serialize a whole collection and write it under its key.
    pub async fn put_json<T: Serialize>(&self, key: &str, value: &T) -> Result<(), AppError> {
        let raw = serde_json::to_string(value)?;
        self.put_raw(key, &raw).await
    }
}
