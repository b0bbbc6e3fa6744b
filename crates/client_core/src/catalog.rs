//! Catalog state: the loaded movies, the active search and the edit session.

use async_trait::async_trait;
use shared::domain::Movie;
use tracing::{debug, error, info};

use crate::{search::filter_movies, CatalogHost, CatalogService};

pub struct CatalogController {
    service: CatalogService,
    movies: Vec<Movie>,
    filtered_movies: Vec<Movie>,
    search_text: String,
    selected_movie: Movie,
    is_edit_mode: bool,
    initialized: bool,
}

impl CatalogController {
    pub fn new(service: CatalogService) -> Self {
        Self {
            service,
            movies: Vec::new(),
            filtered_movies: Vec::new(),
            search_text: String::new(),
            selected_movie: Movie::blank(),
            is_edit_mode: false,
            initialized: false,
        }
    }

    /// Performs the initial load. Only the first call reaches the store.
    pub async fn initialize(&mut self) {
        if self.initialized {
            debug!("catalog already initialized");
            return;
        }
        self.initialized = true;
        self.load_movies().await;
    }

    /// Replaces the catalog with the store contents and clears the active search.
    /// A failed fetch leaves the current state in place.
    pub async fn load_movies(&mut self) {
        match self.service.fetch_movies().await {
            Ok(movies) => {
                info!(count = movies.len(), "loaded movies");
                self.search_text.clear();
                self.filtered_movies = movies.clone();
                self.movies = movies;
            }
            Err(err) => {
                error!(error = %err, "error loading movies");
            }
        }
    }

    pub fn select_movie(&mut self, movie: Movie) {
        self.is_edit_mode = true;
        self.selected_movie = movie;
    }

    pub fn reset(&mut self) {
        self.is_edit_mode = false;
        self.selected_movie = Movie::blank();
    }

    pub fn filter_movies(&mut self, text: impl Into<String>) {
        self.search_text = text.into();
        self.filtered_movies = filter_movies(&self.movies, &self.search_text);
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.selected_movie.title = title.into();
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.selected_movie.description = description.into();
    }

    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    pub fn filtered_movies(&self) -> &[Movie] {
        &self.filtered_movies
    }

    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    pub fn selected_movie(&self) -> &Movie {
        &self.selected_movie
    }

    pub fn is_edit_mode(&self) -> bool {
        self.is_edit_mode
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }
}

#[async_trait]
impl CatalogHost for CatalogController {
    fn bound_movie(&self) -> &Movie {
        &self.selected_movie
    }

    fn bound_movie_mut(&mut self) -> &mut Movie {
        &mut self.selected_movie
    }

    fn reset(&mut self) {
        CatalogController::reset(self);
    }

    async fn load_movies(&mut self) {
        CatalogController::load_movies(self).await;
    }
}

#[cfg(test)]
#[path = "tests/catalog_tests.rs"]
mod tests;
