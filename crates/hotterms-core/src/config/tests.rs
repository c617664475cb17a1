use std::collections::HashMap;

use tempfile::tempdir;

use super::*;

fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map = pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect::<HashMap<_, _>>();
    move |name| map.get(name).cloned()
}

#[test]
fn defaults_match_documented_values() {
    let config = AppConfig::load_with(None, lookup_from(&[])).expect("load");
    assert_eq!(config.store.data_dir, PathBuf::from("data"));
    assert_eq!(config.store.db_path(), PathBuf::from("data/hotterms.sqlite3"));
    assert_eq!(config.store.backend, BackendPreference::Auto);
    assert_eq!(config.store.max_entries, 50);
    assert_eq!(config.store.default_list_limit, 30);
    assert_eq!(config.store.max_term_chars, 100);
    assert_eq!(config.store.admin_password, "change-me");
}

#[test]
fn env_overrides_defaults() {
    let config = AppConfig::load_with(
        None,
        lookup_from(&[
            (ENV_DATA_DIR, "/var/lib/hotterms"),
            (ENV_BACKEND, "Memory"),
            (ENV_MAX_ENTRIES, "20"),
            (ENV_DEFAULT_LIST_LIMIT, "40"),
            (ENV_ADMIN_PASSWORD, "prod-secret"),
        ]),
    )
    .expect("load");
    assert_eq!(config.store.data_dir, PathBuf::from("/var/lib/hotterms"));
    assert_eq!(config.store.backend, BackendPreference::Memory);
    assert_eq!(config.store.max_entries, 20);
    assert_eq!(config.store.effective_default_limit(), 20);
    assert_eq!(config.store.admin_password, "prod-secret");
}

#[test]
fn invalid_numeric_env_values_are_validation_errors() {
    for (name, raw) in [
        (ENV_MAX_ENTRIES, "0"),
        (ENV_MAX_ENTRIES, "fifty"),
        (ENV_MAX_TERM_CHARS, "lots"),
        (ENV_DEFAULT_LIST_LIMIT, "-1"),
    ] {
        let err = AppConfig::load_with(None, lookup_from(&[(name, raw)]))
            .expect_err("must reject");
        assert_eq!(err.code(), "VALIDATION_FAILED", "{name}={raw}");
        assert!(err.to_string().contains(name));
    }
}

#[test]
fn blank_numeric_env_values_are_ignored() {
    let config = AppConfig::load_with(
        None,
        lookup_from(&[(ENV_MAX_ENTRIES, "  "), (ENV_DEFAULT_LIST_LIMIT, "0")]),
    )
    .expect("load");
    assert_eq!(config.store.max_entries, DEFAULT_MAX_ENTRIES);
    assert_eq!(config.store.default_list_limit, 0);
}

#[test]
fn invalid_backend_env_is_a_validation_error() {
    let err = AppConfig::load_with(None, lookup_from(&[(ENV_BACKEND, "redis")]))
        .expect_err("must reject");
    assert_eq!(err.code(), "VALIDATION_FAILED");
}

#[test]
fn toml_file_is_applied_before_env() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("hotterms.toml");
    std::fs::write(
        &path,
        r#"
        [store]
        data_dir = "from-file"
        backend = "sqlite"
        max_entries = 10
        admin_password = "file-secret"
        extra_blocked_patterns = ["spoiler"]
        "#,
    )
    .expect("write config");

    let config = AppConfig::load_with(
        Some(&path),
        lookup_from(&[(ENV_ADMIN_PASSWORD, "env-secret")]),
    )
    .expect("load");
    assert_eq!(config.store.data_dir, PathBuf::from("from-file"));
    assert_eq!(config.store.backend, BackendPreference::Sqlite);
    assert_eq!(config.store.max_entries, 10);
    assert_eq!(config.store.admin_password, "env-secret");
    assert_eq!(config.store.extra_blocked_patterns, vec!["spoiler".to_string()]);
}

#[test]
fn config_path_can_come_from_env() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("hotterms.toml");
    std::fs::write(&path, "[store]\nmax_entries = 7\n").expect("write config");

    let config = AppConfig::load_with(
        None,
        lookup_from(&[(ENV_CONFIG_PATH, path.to_str().expect("utf8 path"))]),
    )
    .expect("load");
    assert_eq!(config.store.max_entries, 7);
}

#[test]
fn unknown_toml_keys_and_zero_capacity_are_rejected() {
    let mut config = AppConfig::default();
    let err = config
        .apply_toml("[store]\nmax_entrys = 5\n")
        .expect_err("typo must fail");
    assert_eq!(err.code(), "CONFIG_ERROR");

    let err = config
        .apply_toml("[store]\nmax_entries = 0\n")
        .expect_err("zero must fail");
    assert_eq!(err.code(), "VALIDATION_FAILED");
}

#[test]
fn missing_config_file_is_an_io_error() {
    let temp = tempdir().expect("tempdir");
    let err = AppConfig::load_with(Some(&temp.path().join("absent.toml")), lookup_from(&[]))
        .expect_err("must fail");
    assert_eq!(err.code(), "IO_ERROR");
}
