use super::*;

fn catalog() -> Vec<Movie> {
    vec![
        Movie::new("Inception", "A mind-bending thriller", 4.5).with_id("1"),
        Movie::new("Interstellar", "A journey to space", 5.0).with_id("2"),
        Movie::new("Tenet", "Time manipulation story", 4.0).with_id("3"),
    ]
}

#[test]
fn empty_query_returns_list_unchanged() {
    assert_eq!(filter_movies(&catalog(), ""), catalog());
}

#[test]
fn matching_ignores_case() {
    let upper = filter_movies(&catalog(), "INTERSTELLAR");
    let lower = filter_movies(&catalog(), "interstellar");
    assert_eq!(upper, lower);
    assert_eq!(upper.len(), 1);
    assert_eq!(upper[0].title, "Interstellar");
}

#[test]
fn partial_title_match() {
    let movies = vec![Movie::new("Tenet", "Time manipulation story", 4.0)];
    assert_eq!(filter_movies(&movies, "Ten"), movies);
}

#[test]
fn matches_description_as_well_as_title() {
    let found = filter_movies(&catalog(), "journey");
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id.as_ref().map(|id| id.as_str()), Some("2"));
}

#[test]
fn no_match_is_empty() {
    assert!(filter_movies(&catalog(), "zzz-no-such-movie").is_empty());
}

#[test]
fn result_is_an_ordered_subsequence() {
    let movies = catalog();
    for query in ["in", "A", "t", "story", "e"] {
        let found = filter_movies(&movies, query);
        let mut cursor = movies.iter();
        for movie in &found {
            assert!(
                cursor.any(|candidate| candidate == movie),
                "{query}: {movie:?} out of order or not in source"
            );
        }
    }
}

#[test]
fn query_is_not_tokenized() {
    assert!(filter_movies(&catalog(), "mind thriller").is_empty());
    assert_eq!(filter_movies(&catalog(), "mind-bending thr").len(), 1);
}
