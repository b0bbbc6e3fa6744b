use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{
    domain::{Movie, MovieFields, MovieId},
    error::StoreError,
};

/// Field map of a stored document, without its id.
pub type DocumentData = Map<String, Value>;

/// A document as returned by a bulk read: the store-assigned id plus its data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub data: DocumentData,
}

impl Document {
    pub fn new(id: impl Into<String>, data: DocumentData) -> Self {
        Self {
            id: id.into(),
            data,
        }
    }

    /// Decodes the data into a movie, taking the identity from the document id.
    pub fn into_movie(self) -> Result<Movie, StoreError> {
        let mut movie: Movie = serde_json::from_value(Value::Object(self.data))?;
        movie.id = Some(MovieId(self.id));
        Ok(movie)
    }
}

pub fn encode_fields(fields: &MovieFields) -> Result<DocumentData, StoreError> {
    match serde_json::to_value(fields)? {
        Value::Object(map) => Ok(map),
        other => Err(StoreError::Encoding(format!(
            "expected an object for movie fields, got {other}"
        ))),
    }
}
