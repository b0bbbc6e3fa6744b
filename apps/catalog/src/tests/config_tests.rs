use super::{load_settings_from, normalize_database_url, Settings};

use std::collections::HashMap;

fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| vars.get(key).cloned()
}

#[test]
fn defaults_apply_without_file_or_env() {
    assert_eq!(load_settings_from(None, env_from(&[])), Settings::default());
}

#[test]
fn file_overrides_defaults_and_env_overrides_file() {
    let file = r#"
        database_url = "sqlite://./from-file.db"
        log_filter = "debug"
    "#;

    let from_file = load_settings_from(Some(file), env_from(&[]));
    assert_eq!(from_file.database_url, "sqlite://./from-file.db");
    assert_eq!(from_file.log_filter, "debug");

    let from_env = load_settings_from(
        Some(file),
        env_from(&[
            ("DATABASE_URL", "sqlite://./plain.db"),
            ("CATALOG__DATABASE_URL", "sqlite://./prefixed.db"),
        ]),
    );
    assert_eq!(from_env.database_url, "sqlite://./prefixed.db");
    assert_eq!(from_env.log_filter, "debug");
}

#[test]
fn malformed_file_is_ignored() {
    let settings = load_settings_from(Some("database_url = ["), env_from(&[]));
    assert_eq!(settings, Settings::default());
}

#[test]
fn normalizes_plain_file_path_to_sqlite_url() {
    assert_eq!(
        normalize_database_url("./data/test.db"),
        "sqlite://./data/test.db"
    );
}

#[test]
fn keeps_memory_and_full_urls() {
    assert_eq!(normalize_database_url("sqlite::memory:"), "sqlite::memory:");
    assert_eq!(
        normalize_database_url("sqlite://./data/test.db"),
        "sqlite://./data/test.db"
    );
}

#[test]
fn normalizes_single_colon_sqlite_prefix() {
    assert_eq!(
        normalize_database_url("sqlite:data\\test.db"),
        "sqlite://data/test.db"
    );
}

#[test]
fn empty_url_falls_back_to_default() {
    assert_eq!(normalize_database_url("   "), Settings::default().database_url);
}
