use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::RatingError;

pub const MIN_RATING: f64 = 0.0;
pub const MAX_RATING: f64 = 5.0;

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }
    };
}

id_newtype!(MovieId);

/// A catalog entry. `id` stays `None` until the record store has assigned one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<MovieId>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Stored as `null` when the rating was never a number; that decodes to `NaN`.
    #[serde(default, deserialize_with = "rating_or_nan")]
    pub rating: f64,
}

fn rating_or_nan<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
}

impl Default for Movie {
    fn default() -> Self {
        Self::blank()
    }
}

impl Movie {
    /// The empty template the form is bound to outside of edit mode.
    pub fn blank() -> Self {
        Self {
            id: None,
            title: String::new(),
            description: String::new(),
            rating: 0.0,
        }
    }

    pub fn new(title: impl Into<String>, description: impl Into<String>, rating: f64) -> Self {
        Self {
            id: None,
            title: title.into(),
            description: description.into(),
            rating,
        }
    }

    pub fn with_id(mut self, id: impl Into<MovieId>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn fields(&self) -> MovieFields {
        MovieFields {
            title: self.title.clone(),
            description: self.description.clone(),
            rating: self.rating,
        }
    }

    pub fn rating_label(&self) -> String {
        format!("{} / {}", self.rating, MAX_RATING)
    }
}

/// The id-less payload written to the record store. All three fields always travel together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieFields {
    pub title: String,
    pub description: String,
    pub rating: f64,
}

impl MovieFields {
    pub fn validate(&self) -> Result<(), RatingError> {
        if !self.rating.is_finite() {
            return Err(RatingError::NotANumber);
        }
        if !(MIN_RATING..=MAX_RATING).contains(&self.rating) {
            return Err(RatingError::OutOfRange {
                value: self.rating,
                min: MIN_RATING,
                max: MAX_RATING,
            });
        }
        Ok(())
    }
}
