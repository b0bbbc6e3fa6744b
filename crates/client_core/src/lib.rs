use std::sync::Arc;

use async_trait::async_trait;
use shared::{
    domain::{Movie, MovieFields, MovieId},
    error::StoreError,
    protocol::{encode_fields, Document},
};
use storage::{MissingRecordStore, RecordStore};
use tracing::{debug, warn};

pub mod catalog;
pub mod form;
pub mod search;
pub mod view;

pub use catalog::CatalogController;
pub use form::EditForm;
pub use search::filter_movies;
pub use view::{CatalogView, ViewEvent};

pub const MOVIES_COLLECTION: &str = "movies";

/// The part of the catalog state the edit form acts on: the bound movie plus
/// the reset/reload actions it triggers after a successful write.
#[async_trait]
pub trait CatalogHost: Send {
    fn bound_movie(&self) -> &Movie;
    fn bound_movie_mut(&mut self) -> &mut Movie;
    fn reset(&mut self);
    async fn load_movies(&mut self);
}

/// All record store access for movies goes through here. Failures are passed through untouched.
#[derive(Clone)]
pub struct CatalogService {
    store: Arc<dyn RecordStore>,
}

impl CatalogService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// A service with no backend; every call fails with `StoreError::Unavailable`.
    pub fn unavailable() -> Self {
        Self::new(Arc::new(MissingRecordStore))
    }

    pub async fn add_movie(&self, movie: &MovieFields) -> Result<MovieId, StoreError> {
        let data = encode_fields(movie)?;
        let id = self.store.create_document(MOVIES_COLLECTION, data).await?;
        debug!(movie_id = %id, title = %movie.title, "added movie");
        Ok(MovieId(id))
    }

    pub async fn update_movie(&self, id: &MovieId, fields: &MovieFields) -> Result<(), StoreError> {
        let data = encode_fields(fields)?;
        self.store
            .update_document(MOVIES_COLLECTION, id.as_str(), data)
            .await?;
        debug!(movie_id = %id, "updated movie");
        Ok(())
    }

    pub async fn delete_movie(&self, id: &MovieId) -> Result<(), StoreError> {
        self.store
            .delete_document(MOVIES_COLLECTION, id.as_str())
            .await?;
        debug!(movie_id = %id, "deleted movie");
        Ok(())
    }

    /// Reads the whole collection. Documents that fail to decode are skipped.
    pub async fn fetch_movies(&self) -> Result<Vec<Movie>, StoreError> {
        let documents = self.store.fetch_all_documents(MOVIES_COLLECTION).await?;
        Ok(documents
            .into_iter()
            .filter_map(|doc| {
                let id = doc.id.clone();
                match Document::into_movie(doc) {
                    Ok(movie) => Some(movie),
                    Err(err) => {
                        warn!(movie_id = %id, error = %err, "skipping undecodable movie document");
                        None
                    }
                }
            })
            .collect())
    }
}

#[cfg(test)]
#[path = "tests/support.rs"]
mod test_support;

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
