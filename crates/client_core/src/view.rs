//! View-facing events and their routing to the catalog controller and edit form.

use shared::domain::Movie;
use tracing::debug;

use crate::{catalog::CatalogController, form::EditForm, CatalogService};

#[derive(Debug, Clone, PartialEq)]
pub enum ViewEvent {
    SearchTextChanged(String),
    MovieSelected(Movie),
    TitleChanged(String),
    DescriptionChanged(String),
    RatingInputChanged(String),
    FormSubmit,
    FormReset,
    DeleteRequested,
}

impl ViewEvent {
    pub fn name(&self) -> &'static str {
        match self {
            ViewEvent::SearchTextChanged(_) => "search_text_changed",
            ViewEvent::MovieSelected(_) => "movie_selected",
            ViewEvent::TitleChanged(_) => "title_changed",
            ViewEvent::DescriptionChanged(_) => "description_changed",
            ViewEvent::RatingInputChanged(_) => "rating_input_changed",
            ViewEvent::FormSubmit => "form_submit",
            ViewEvent::FormReset => "form_reset",
            ViewEvent::DeleteRequested => "delete_requested",
        }
    }
}

/// The mounted catalog page: one controller plus the form bound to its selected movie.
pub struct CatalogView {
    catalog: CatalogController,
    form: EditForm,
}

impl CatalogView {
    pub fn new(service: CatalogService) -> Self {
        Self {
            catalog: CatalogController::new(service.clone()),
            form: EditForm::new(service),
        }
    }

    pub async fn initialize(&mut self) {
        self.catalog.initialize().await;
    }

    pub async fn dispatch(&mut self, event: ViewEvent) {
        debug!(event = event.name(), "dispatching view event");
        match event {
            ViewEvent::SearchTextChanged(text) => self.catalog.filter_movies(text),
            ViewEvent::MovieSelected(movie) => {
                self.catalog.select_movie(movie);
                self.form.bind(&self.catalog);
            }
            ViewEvent::TitleChanged(title) => self.catalog.set_title(title),
            ViewEvent::DescriptionChanged(description) => self.catalog.set_description(description),
            ViewEvent::RatingInputChanged(raw) => self.form.update_rating(&mut self.catalog, &raw),
            ViewEvent::FormSubmit => {
                if self.catalog.is_edit_mode() {
                    self.form.update_movie(&mut self.catalog).await;
                } else {
                    self.form.add_movie(&mut self.catalog).await;
                }
            }
            ViewEvent::FormReset => self.form.exit_form(&mut self.catalog),
            ViewEvent::DeleteRequested => {
                if self.catalog.is_edit_mode() {
                    self.form.delete_movie(&mut self.catalog).await;
                } else {
                    debug!("delete requested outside edit mode; ignoring");
                }
            }
        }
    }

    pub fn catalog(&self) -> &CatalogController {
        &self.catalog
    }

    pub fn form(&self) -> &EditForm {
        &self.form
    }
}

#[cfg(test)]
#[path = "tests/view_tests.rs"]
mod tests;
