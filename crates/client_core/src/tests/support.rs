use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use shared::{
    domain::Movie,
    error::StoreError,
    protocol::{Document, DocumentData},
};
use storage::{InMemoryRecordStore, RecordStore};
use tokio::sync::Mutex;

use crate::{CatalogHost, CatalogService, MOVIES_COLLECTION};

#[derive(Debug, Clone, PartialEq)]
pub enum StoreCall {
    Create { collection: String, data: Value },
    FetchAll { collection: String },
    Update { collection: String, id: String, data: Value },
    Delete { collection: String, id: String },
}

/// In-memory store that records every call and can be told to fail.
#[derive(Clone, Default)]
pub struct RecordingStore {
    inner: InMemoryRecordStore,
    calls: Arc<Mutex<Vec<StoreCall>>>,
    fail_writes_with: Arc<Mutex<Option<StoreError>>>,
    fail_fetch_with: Arc<Mutex<Option<StoreError>>>,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn seed(&self, id: &str, movie: &Movie) {
        let Value::Object(data) = serde_json::to_value(movie.fields()).expect("encode") else {
            unreachable!();
        };
        self.seed_document(id, data).await;
    }

    pub async fn seed_document(&self, id: &str, data: DocumentData) {
        self.inner.seed(MOVIES_COLLECTION, id, data).await;
    }

    pub async fn fail_writes(&self, err: StoreError) {
        *self.fail_writes_with.lock().await = Some(err);
    }

    pub async fn fail_fetches(&self, err: StoreError) {
        *self.fail_fetch_with.lock().await = Some(err);
    }

    pub async fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().await.clone()
    }

    pub async fn write_calls(&self) -> Vec<StoreCall> {
        self.calls()
            .await
            .into_iter()
            .filter(|call| !matches!(call, StoreCall::FetchAll { .. }))
            .collect()
    }

    pub async fn fetch_count(&self) -> usize {
        self.calls()
            .await
            .iter()
            .filter(|call| matches!(call, StoreCall::FetchAll { .. }))
            .count()
    }

    pub fn service(&self) -> CatalogService {
        CatalogService::new(Arc::new(self.clone()))
    }

    async fn write_failure(&self) -> Result<(), StoreError> {
        match self.fail_writes_with.lock().await.clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl RecordStore for RecordingStore {
    async fn create_document(
        &self,
        collection: &str,
        data: DocumentData,
    ) -> Result<String, StoreError> {
        self.calls.lock().await.push(StoreCall::Create {
            collection: collection.to_string(),
            data: Value::Object(data.clone()),
        });
        self.write_failure().await?;
        self.inner.create_document(collection, data).await
    }

    async fn fetch_all_documents(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
        self.calls.lock().await.push(StoreCall::FetchAll {
            collection: collection.to_string(),
        });
        if let Some(err) = self.fail_fetch_with.lock().await.clone() {
            return Err(err);
        }
        self.inner.fetch_all_documents(collection).await
    }

    async fn update_document(
        &self,
        collection: &str,
        id: &str,
        partial: DocumentData,
    ) -> Result<(), StoreError> {
        self.calls.lock().await.push(StoreCall::Update {
            collection: collection.to_string(),
            id: id.to_string(),
            data: Value::Object(partial.clone()),
        });
        self.write_failure().await?;
        self.inner.update_document(collection, id, partial).await
    }

    async fn delete_document(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        self.calls.lock().await.push(StoreCall::Delete {
            collection: collection.to_string(),
            id: id.to_string(),
        });
        self.write_failure().await?;
        self.inner.delete_document(collection, id).await
    }
}

/// Host standing in for the catalog page. `reset` only clears the bound movie when
/// `reset_clears_movie` is set, so tests can observe what the form itself leaves behind.
pub struct RecordingHost {
    pub movie: Movie,
    pub reset_clears_movie: bool,
    pub actions: Vec<&'static str>,
}

impl RecordingHost {
    pub fn new(movie: Movie) -> Self {
        Self {
            movie,
            reset_clears_movie: true,
            actions: Vec::new(),
        }
    }

    pub fn with_noop_reset(mut self) -> Self {
        self.reset_clears_movie = false;
        self
    }
}

#[async_trait]
impl CatalogHost for RecordingHost {
    fn bound_movie(&self) -> &Movie {
        &self.movie
    }

    fn bound_movie_mut(&mut self) -> &mut Movie {
        &mut self.movie
    }

    fn reset(&mut self) {
        self.actions.push("reset");
        if self.reset_clears_movie {
            self.movie = Movie::blank();
        }
    }

    async fn load_movies(&mut self) {
        self.actions.push("load_movies");
    }
}
