use std::collections::HashMap;

use super::*;

fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| vars.get(key).cloned()
}

#[test]
fn normalizes_plain_file_path_to_sqlite_url() {
    assert_eq!(
        prepare_database_url("./data/test.db"),
        "sqlite://./data/test.db"
    );
    assert_eq!(
        prepare_database_url("sqlite:cache\\session.db"),
        "sqlite://cache/session.db"
    );
    assert_eq!(prepare_database_url("sqlite::memory:"), "sqlite::memory:");
    assert_eq!(prepare_database_url("  "), Settings::default().database_url);
}

#[test]
fn file_values_override_defaults() {
    let mut settings = Settings::default();
    let mut warnings = Vec::new();
    apply_file(
        &mut settings,
        r#"
api_base_url = "https://hr.example.com/apis/root/"
request_timeout_secs = 10
unrelated = true
"#,
        &mut warnings,
    );
    assert!(warnings.is_empty());
    assert_eq!(settings.api_base_url, "https://hr.example.com/apis/root/");
    assert_eq!(settings.request_timeout_secs, 10);
    assert_eq!(settings.log_level, "info");
}

#[test]
fn unreadable_file_keeps_defaults() {
    let mut settings = Settings::default();
    let mut warnings = Vec::new();
    apply_file(&mut settings, "request_timeout_secs = \"soon\"", &mut warnings);
    assert_eq!(settings, Settings::default());
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].starts_with("ignoring unreadable config file"));
}

#[test]
fn prefixed_env_wins_over_alias() {
    let mut settings = Settings::default();
    let mut warnings = Vec::new();
    apply_env(
        &mut settings,
        env(&[
            ("EMPLOYEE_API_URL", "http://alias/"),
            ("APP__API_BASE_URL", "http://prefixed/"),
            ("DATABASE_URL", "sqlite://alias.db"),
            ("APP__LOG_LEVEL", "debug"),
        ]),
        &mut warnings,
    );
    assert!(warnings.is_empty());
    assert_eq!(settings.api_base_url, "http://prefixed/");
    assert_eq!(settings.database_url, "sqlite://alias.db");
    assert_eq!(settings.log_level, "debug");
}

#[test]
fn invalid_timeout_is_ignored() {
    let mut settings = Settings::default();
    let mut warnings = Vec::new();
    apply_env(
        &mut settings,
        env(&[("APP__REQUEST_TIMEOUT_SECS", "0")]),
        &mut warnings,
    );
    assert_eq!(settings.request_timeout_secs, 30);
    assert_eq!(warnings, vec!["ignoring APP__REQUEST_TIMEOUT_SECS=0".to_string()]);
    apply_env(
        &mut settings,
        env(&[("APP__REQUEST_TIMEOUT_SECS", "45")]),
        &mut warnings,
    );
    assert_eq!(settings.request_timeout_secs, 45);
    assert_eq!(warnings.len(), 1);
}

#[test]
fn missing_config_file_is_not_an_error() {
    let (settings, _warnings) = load_settings(Path::new("definitely/not/here/employee.toml"));
    assert!(settings.request_timeout_secs > 0);
}
