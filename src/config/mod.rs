mod schema;
pub mod init;

pub use schema::{ApiConfig, Config, SearchConfig, DEFAULT_BASE_URL, DEFAULT_DEBOUNCE};

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

use crate::chart::validate_charts;
use crate::scoring::validate_scoring;

/// Environment variable that replaces `api.base_url`
pub const ENV_API_URL_VAR: &str = "PROPERTIFI_API_URL";

/// Get the config directory path (~/.config/propertifi/)
pub fn get_config_dir() -> PathBuf {
    let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    home.join(".config").join("propertifi")
}

/// Get the default config file path (~/.config/propertifi/config.yaml)
pub fn get_config_path() -> PathBuf {
    get_config_dir().join("config.yaml")
}

/// Load configuration from a YAML file
///
/// A missing file at the default location yields the defaults, so the CLI
/// runs on environment variables alone. A path given explicitly must exist.
pub fn load_config(path: Option<PathBuf>) -> Result<Config> {
    let explicit = path.is_some();
    let config_path = path.unwrap_or_else(get_config_path);

    if !config_path.exists() {
        if explicit {
            anyhow::bail!("Config file not found at {}", config_path.display());
        }
        log::debug!("no config at {}, using defaults", config_path.display());
        return Ok(Config::default());
    }

    let config_content = fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read config file at {}", config_path.display()))?;

    let config: Config = serde_saphyr::from_str(&config_content)
        .with_context(|| format!("Failed to parse config: invalid YAML in {}", config_path.display()))?;

    Ok(config)
}

/// Append `/api` unless the URL already ends with it.
pub fn normalize_api_url(url: &str) -> String {
    let trimmed = url.trim().trim_end_matches('/');
    if trimmed.ends_with("/api") {
        trimmed.to_string()
    } else {
        format!("{}/api", trimmed)
    }
}

/// Apply `PROPERTIFI_API_URL` from `lookup` on top of the file config.
pub fn apply_env_overrides(config: &mut Config, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(url) = lookup(ENV_API_URL_VAR).filter(|v| !v.trim().is_empty()) {
        let api = config.api.get_or_insert_with(ApiConfig::default);
        api.base_url = Some(normalize_api_url(&url));
    }
}

/// Check every section, collecting all problems.
pub fn validate_config(config: &Config) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    let api = config.api();
    if let Err(e) = reqwest::Url::parse(&api.base_url()) {
        errors.push(format!("api.base_url: '{}' is not a valid URL ({})", api.base_url(), e));
    }
    if let Err(e) = api.timeout() {
        errors.push(e);
    }
    if let Err(e) = config.search().debounce() {
        errors.push(e);
    }
    if let Some(scoring) = &config.scoring {
        if let Err(errs) = validate_scoring(scoring) {
            errors.extend(errs);
        }
    }
    if let Some(charts) = &config.charts {
        if let Err(errs) = validate_charts(charts) {
            errors.extend(errs);
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
