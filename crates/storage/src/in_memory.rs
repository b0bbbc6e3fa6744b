use std::{
    collections::{BTreeMap, HashMap},
    sync::Arc,
};

use async_trait::async_trait;
use shared::{
    error::StoreError,
    protocol::{Document, DocumentData},
};
use tokio::sync::RwLock;

use crate::{merge_document, new_document_id, RecordStore};

type Collection = BTreeMap<String, DocumentData>;

/// Record store held entirely in process memory. Clones share the same collections.
#[derive(Clone, Default)]
pub struct InMemoryRecordStore {
    collections: Arc<RwLock<HashMap<String, Collection>>>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a document under a caller-chosen id, replacing any existing one.
    pub async fn seed(&self, collection: &str, id: impl Into<String>, data: DocumentData) {
        self.collections
            .write()
            .await
            .entry(collection.to_string())
            .or_default()
            .insert(id.into(), data);
    }

    pub async fn document(&self, collection: &str, id: &str) -> Option<DocumentData> {
        self.collections
            .read()
            .await
            .get(collection)
            .and_then(|docs| docs.get(id))
            .cloned()
    }

    pub async fn document_count(&self, collection: &str) -> usize {
        self.collections
            .read()
            .await
            .get(collection)
            .map_or(0, BTreeMap::len)
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn create_document(
        &self,
        collection: &str,
        data: DocumentData,
    ) -> Result<String, StoreError> {
        let id = new_document_id();
        self.collections
            .write()
            .await
            .entry(collection.to_string())
            .or_default()
            .insert(id.clone(), data);
        Ok(id)
    }

    async fn fetch_all_documents(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .map(|(id, data)| Document::new(id.clone(), data.clone()))
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn update_document(
        &self,
        collection: &str,
        id: &str,
        partial: DocumentData,
    ) -> Result<(), StoreError> {
        let mut collections = self.collections.write().await;
        let existing = collections
            .get_mut(collection)
            .and_then(|docs| docs.get_mut(id))
            .ok_or_else(|| StoreError::not_found(collection, id))?;
        merge_document(existing, partial);
        Ok(())
    }

    async fn delete_document(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        if let Some(docs) = self.collections.write().await.get_mut(collection) {
            docs.remove(id);
        }
        Ok(())
    }
}
