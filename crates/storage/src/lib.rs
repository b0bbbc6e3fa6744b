use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Pool, Row, Sqlite,
};
use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};
use tracing::{debug, warn};
use uuid::Uuid;

use shared::{
    error::StoreError,
    protocol::{Document, DocumentData},
};

mod in_memory;
pub use in_memory::InMemoryRecordStore;

/// Narrow client for a document collection store. Ids are opaque strings assigned by the store.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn create_document(
        &self,
        collection: &str,
        data: DocumentData,
    ) -> Result<String, StoreError>;

    /// Every document in `collection`, ordered by document id.
    async fn fetch_all_documents(&self, collection: &str) -> Result<Vec<Document>, StoreError>;

    /// Merges `partial` into the existing document. Keys absent from `partial` are kept.
    async fn update_document(
        &self,
        collection: &str,
        id: &str,
        partial: DocumentData,
    ) -> Result<(), StoreError>;

    /// Deleting an id that does not exist succeeds.
    async fn delete_document(&self, collection: &str, id: &str) -> Result<(), StoreError>;
}

pub struct MissingRecordStore;

#[async_trait]
impl RecordStore for MissingRecordStore {
    async fn create_document(
        &self,
        collection: &str,
        _data: DocumentData,
    ) -> Result<String, StoreError> {
        Err(StoreError::unavailable(format!(
            "no backend configured for collection '{collection}'"
        )))
    }

    async fn fetch_all_documents(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
        Err(StoreError::unavailable(format!(
            "no backend configured for collection '{collection}'"
        )))
    }

    async fn update_document(
        &self,
        collection: &str,
        _id: &str,
        _partial: DocumentData,
    ) -> Result<(), StoreError> {
        Err(StoreError::unavailable(format!(
            "no backend configured for collection '{collection}'"
        )))
    }

    async fn delete_document(&self, collection: &str, _id: &str) -> Result<(), StoreError> {
        Err(StoreError::unavailable(format!(
            "no backend configured for collection '{collection}'"
        )))
    }
}

pub(crate) fn new_document_id() -> String {
    Uuid::new_v4().simple().to_string()
}

pub(crate) fn merge_document(target: &mut DocumentData, partial: DocumentData) {
    for (key, value) in partial {
        target.insert(key, value);
    }
}

/// SQLite-backed record store. Each document is a JSON object in the `documents` table.
#[derive(Clone)]
pub struct Storage {
    pool: Pool<Sqlite>,
}

impl Storage {
    pub async fn new(database_url: &str) -> Result<Self> {
        ensure_sqlite_parent_dir_exists(database_url)?;

        let connect_options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(connect_options)
            .await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self { pool })
    }

    pub async fn health_check(&self) -> Result<()> {
        let _: i64 = sqlx::query_scalar("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .context("sqlite ping failed")?;
        Ok(())
    }

    async fn insert_document(&self, collection: &str, data: &DocumentData) -> Result<String> {
        let id = new_document_id();
        let now = Utc::now();
        let body = serde_json::to_string(data).context("failed to serialize document")?;
        sqlx::query(
            "INSERT INTO documents (collection, id, data, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(collection)
        .bind(&id)
        .bind(body)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .with_context(|| format!("failed to insert document into '{collection}'"))?;
        Ok(id)
    }

    async fn list_documents(&self, collection: &str) -> Result<Vec<Document>> {
        let rows = sqlx::query("SELECT id, data FROM documents WHERE collection = ? ORDER BY id")
            .bind(collection)
            .fetch_all(&self.pool)
            .await
            .with_context(|| format!("failed to list documents in '{collection}'"))?;

        Ok(rows
            .into_iter()
            .filter_map(|r| {
                let id = r.get::<String, _>(0);
                match parse_document_data(&r.get::<String, _>(1)) {
                    Ok(data) => Some(Document { id, data }),
                    Err(err) => {
                        warn!(collection, id = %id, error = %err, "skipping corrupt document");
                        None
                    }
                }
            })
            .collect())
    }

    /// Returns `false` when no document with `id` exists.
    async fn merge_into_document(
        &self,
        collection: &str,
        id: &str,
        partial: DocumentData,
    ) -> Result<bool> {
        let mut tx = self.pool.begin().await?;
        let row = sqlx::query("SELECT data FROM documents WHERE collection = ? AND id = ?")
            .bind(collection)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        let Some(row) = row else {
            return Ok(false);
        };

        let mut data = parse_document_data(&row.get::<String, _>(0))
            .with_context(|| format!("corrupt document '{id}' in '{collection}'"))?;
        merge_document(&mut data, partial);
        let body = serde_json::to_string(&data).context("failed to serialize document")?;

        sqlx::query(
            "UPDATE documents SET data = ?, updated_at = ? WHERE collection = ? AND id = ?",
        )
        .bind(body)
        .bind(Utc::now())
        .bind(collection)
        .bind(id)
        .execute(&mut *tx)
        .await
        .with_context(|| format!("failed to update document '{id}' in '{collection}'"))?;
        tx.commit().await?;
        Ok(true)
    }

    async fn remove_document(&self, collection: &str, id: &str) -> Result<u64> {
        let result = sqlx::query("DELETE FROM documents WHERE collection = ? AND id = ?")
            .bind(collection)
            .bind(id)
            .execute(&self.pool)
            .await
            .with_context(|| format!("failed to delete document '{id}' from '{collection}'"))?;
        Ok(result.rows_affected())
    }
}

#[async_trait]
impl RecordStore for Storage {
    async fn create_document(
        &self,
        collection: &str,
        data: DocumentData,
    ) -> Result<String, StoreError> {
        let id = self
            .insert_document(collection, &data)
            .await
            .map_err(backend)?;
        debug!(collection, id = %id, "created document");
        Ok(id)
    }

    async fn fetch_all_documents(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
        self.list_documents(collection).await.map_err(backend)
    }

    async fn update_document(
        &self,
        collection: &str,
        id: &str,
        partial: DocumentData,
    ) -> Result<(), StoreError> {
        if self
            .merge_into_document(collection, id, partial)
            .await
            .map_err(backend)?
        {
            Ok(())
        } else {
            Err(StoreError::not_found(collection, id))
        }
    }

    async fn delete_document(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        let removed = self
            .remove_document(collection, id)
            .await
            .map_err(backend)?;
        debug!(collection, id, removed, "deleted document");
        Ok(())
    }
}

fn backend(err: anyhow::Error) -> StoreError {
    StoreError::backend(format!("{err:#}"))
}

fn parse_document_data(raw: &str) -> Result<DocumentData> {
    match serde_json::from_str::<Value>(raw)? {
        Value::Object(map) => Ok(map),
        other => anyhow::bail!("document data is not an object: {other}"),
    }
}

fn ensure_sqlite_parent_dir_exists(database_url: &str) -> Result<()> {
    let Some(path) = sqlite_path(database_url) else {
        return Ok(());
    };

    let Some(parent) = path.parent() else {
        return Ok(());
    };
    if parent.as_os_str().is_empty() {
        return Ok(());
    }

    fs::create_dir_all(parent).with_context(|| {
        format!(
            "failed to create parent directory '{}' for database url '{database_url}'",
            parent.display()
        )
    })?;

    Ok(())
}

fn sqlite_path(database_url: &str) -> Option<PathBuf> {
    if database_url.starts_with("sqlite::memory:") || !database_url.starts_with("sqlite:") {
        return None;
    }

    let path = database_url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:")
        .split('?')
        .next()
        .unwrap_or_default();

    if path.is_empty() {
        return None;
    }

    Some(Path::new(path).to_path_buf())
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
