use std::{fs, path::Path};

use client_core::{DEFAULT_API_BASE_URL, DEFAULT_REQUEST_TIMEOUT};
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_base_url: String,
    pub database_url: String,
    pub request_timeout_secs: u64,
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.into(),
            database_url: "sqlite://./data/employee.db".into(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT.as_secs(),
            log_level: "info".into(),
        }
    }
}

/// Keys accepted in `employee.toml`. Anything else in the file is ignored.
#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    api_base_url: Option<String>,
    database_url: Option<String>,
    request_timeout_secs: Option<u64>,
    log_level: Option<String>,
}

/// Defaults, then `config_path` if it exists, then the process environment.
///
/// Rejected values come back as warnings; logging is not set up yet.
pub fn load_settings(config_path: &Path) -> (Settings, Vec<String>) {
    let mut settings = Settings::default();
    let mut warnings = Vec::new();
    if let Ok(raw) = fs::read_to_string(config_path) {
        apply_file(&mut settings, &raw, &mut warnings);
    }
    apply_env(
        &mut settings,
        |key| std::env::var(key).ok(),
        &mut warnings,
    );
    (settings, warnings)
}

fn apply_file(settings: &mut Settings, raw: &str, warnings: &mut Vec<String>) {
    let file_cfg = match toml::from_str::<FileSettings>(raw) {
        Ok(file_cfg) => file_cfg,
        Err(err) => {
            warnings.push(format!("ignoring unreadable config file: {err}"));
            return;
        }
    };
    if let Some(v) = file_cfg.api_base_url {
        settings.api_base_url = v;
    }
    if let Some(v) = file_cfg.database_url {
        settings.database_url = v;
    }
    if let Some(v) = file_cfg.request_timeout_secs {
        settings.request_timeout_secs = v;
    }
    if let Some(v) = file_cfg.log_level {
        settings.log_level = v;
    }
}

/// `APP__*` names win over the short aliases.
fn apply_env(
    settings: &mut Settings,
    lookup: impl Fn(&str) -> Option<String>,
    warnings: &mut Vec<String>,
) {
    if let Some(v) = lookup("EMPLOYEE_API_URL") {
        settings.api_base_url = v;
    }
    if let Some(v) = lookup("APP__API_BASE_URL") {
        settings.api_base_url = v;
    }

    if let Some(v) = lookup("DATABASE_URL") {
        settings.database_url = v;
    }
    if let Some(v) = lookup("APP__DATABASE_URL") {
        settings.database_url = v;
    }

    if let Some(v) = lookup("APP__REQUEST_TIMEOUT_SECS") {
        match v.trim().parse::<u64>() {
            Ok(parsed) if parsed > 0 => settings.request_timeout_secs = parsed,
            _ => warnings.push(format!("ignoring APP__REQUEST_TIMEOUT_SECS={v}")),
        }
    }

    if let Some(v) = lookup("APP__LOG_LEVEL") {
        settings.log_level = v;
    }
}

/// Plain file paths become `sqlite://` URLs. The cache creates missing parent
/// directories when it opens the file.
pub fn prepare_database_url(raw_database_url: &str) -> String {
    let raw_database_url = raw_database_url.trim();

    if raw_database_url.is_empty() {
        return Settings::default().database_url;
    }

    if raw_database_url.starts_with("sqlite::memory:") || raw_database_url.contains("://") {
        return raw_database_url.to_string();
    }

    if let Some(path) = raw_database_url.strip_prefix("sqlite:") {
        return format!("sqlite://{}", path.replace('\\', "/"));
    }

    format!("sqlite://{}", raw_database_url.replace('\\', "/"))
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
