//! Substring search over the catalog.

use shared::domain::Movie;

/// Returns the movies whose title or description contains `query`, ignoring case.
///
/// An empty query returns the list unchanged. Matching is plain substring containment
/// and the input order is kept.
pub fn filter_movies(movies: &[Movie], query: &str) -> Vec<Movie> {
    if query.is_empty() {
        return movies.to_vec();
    }

    let needle = query.to_lowercase();
    movies
        .iter()
        .filter(|movie| {
            movie.title.to_lowercase().contains(&needle)
                || movie.description.to_lowercase().contains(&needle)
        })
        .cloned()
        .collect()
}

#[cfg(test)]
#[path = "tests/search_tests.rs"]
mod tests;
