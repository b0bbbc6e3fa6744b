use thiserror::Error;

/// A record store operation failed. The display form is what the form surfaces to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("record store unavailable: {0}")]
    Unavailable(String),
    #[error("no document '{id}' in collection '{collection}'")]
    NotFound { collection: String, id: String },
    #[error("{0}")]
    Backend(String),
    #[error("failed to encode or decode document: {0}")]
    Encoding(String),
}

impl StoreError {
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend(message.into())
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable(message.into())
    }

    pub fn not_found(collection: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            collection: collection.into(),
            id: id.into(),
        }
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::Encoding(value.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RatingError {
    #[error("rating must be a number")]
    NotANumber,
    #[error("rating {value} is outside the allowed range {min}-{max}")]
    OutOfRange { value: f64, min: f64, max: f64 },
}
