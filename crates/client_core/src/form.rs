//! Add/edit form for a single movie.

use shared::error::StoreError;
use tracing::{info, warn};

use crate::{CatalogHost, CatalogService, MOVIES_COLLECTION};

pub struct EditForm {
    service: CatalogService,
    rating: f64,
    error_message: Option<String>,
}

impl EditForm {
    pub fn new(service: CatalogService) -> Self {
        Self {
            service,
            rating: 0.0,
            error_message: None,
        }
    }

    pub fn rating(&self) -> f64 {
        self.rating
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// Mirrors the rating of a newly bound movie into the form.
    pub fn bind(&mut self, host: &dyn CatalogHost) {
        self.rating = host.bound_movie().rating;
    }

    /// Writes the parsed rating through to the bound movie. Unparseable input becomes NaN.
    pub fn update_rating(&mut self, host: &mut dyn CatalogHost, raw_value: &str) {
        let value = parse_decimal_prefix(raw_value);
        self.rating = value;
        host.bound_movie_mut().rating = value;
    }

    pub async fn add_movie(&mut self, host: &mut dyn CatalogHost) {
        self.error_message = None;

        let fields = host.bound_movie().fields();
        if let Err(err) = fields.validate() {
            self.fail("add", err.to_string());
            return;
        }

        match self.service.add_movie(&fields).await {
            Ok(id) => {
                info!(movie_id = %id, "movie added from form");
                self.finish(host).await;
            }
            Err(err) => self.fail("add", err.to_string()),
        }
    }

    pub async fn update_movie(&mut self, host: &mut dyn CatalogHost) {
        self.error_message = None;

        let movie = host.bound_movie();
        let fields = movie.fields();
        let Some(id) = movie.id.clone() else {
            self.fail(
                "update",
                StoreError::not_found(MOVIES_COLLECTION, "(unsaved)").to_string(),
            );
            return;
        };
        if let Err(err) = fields.validate() {
            self.fail("update", err.to_string());
            return;
        }

        match self.service.update_movie(&id, &fields).await {
            Ok(()) => {
                info!(movie_id = %id, "movie updated from form");
                self.finish(host).await;
            }
            Err(err) => self.fail("update", err.to_string()),
        }
    }

    pub async fn delete_movie(&mut self, host: &mut dyn CatalogHost) {
        self.error_message = None;

        let Some(id) = host.bound_movie().id.clone() else {
            self.fail(
                "delete",
                StoreError::not_found(MOVIES_COLLECTION, "(unsaved)").to_string(),
            );
            return;
        };

        match self.service.delete_movie(&id).await {
            Ok(()) => {
                info!(movie_id = %id, "movie deleted from form");
                self.finish(host).await;
            }
            Err(err) => self.fail("delete", err.to_string()),
        }
    }

    pub fn exit_form(&mut self, host: &mut dyn CatalogHost) {
        self.rating = 0.0;
        self.error_message = None;
        host.reset();
    }

    async fn finish(&mut self, host: &mut dyn CatalogHost) {
        host.reset();
        self.rating = host.bound_movie().rating;
        host.load_movies().await;
    }

    fn fail(&mut self, action: &'static str, message: String) {
        warn!(action, error = %message, "movie form submission failed");
        self.error_message = Some(message);
    }
}

/// Parses the longest leading decimal number in `raw`, the way browsers read a
/// numeric input. Returns NaN when no number is present.
pub fn parse_decimal_prefix(raw: &str) -> f64 {
    let text = raw.trim_start();
    let bytes = text.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    let sign_len = end;

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        if digits > 0 || frac_end > frac_start {
            digits += frac_end - frac_start;
            end = frac_end;
        }
    }

    if digits == 0 {
        return if text[sign_len..].starts_with("Infinity") {
            if text.starts_with('-') {
                f64::NEG_INFINITY
            } else {
                f64::INFINITY
            }
        } else {
            f64::NAN
        };
    }

    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && matches!(bytes[exp_end], b'+' | b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    text[..end].parse::<f64>().unwrap_or(f64::NAN)
}

#[cfg(test)]
#[path = "tests/form_tests.rs"]
mod tests;
