use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::chart::ChartConfig;
use crate::scoring::TrustScoreConfig;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api";
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api: Option<ApiConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scoring: Option<TrustScoreConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub charts: Option<ChartConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<SearchConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ApiConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// Per-request timeout, e.g. "30s". No timeout when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<String>,
    /// Extra attempts for reads
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retries: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SearchConfig {
    /// Quiet period before a search runs, e.g. "300ms". "0s" searches on
    /// every keystroke.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debounce: Option<String>,
}

fn parse_duration(field: &str, value: &str) -> Result<Duration, String> {
    humantime::parse_duration(value.trim()).map_err(|e| format!("{}: invalid duration '{}' ({})", field, value, e))
}

impl ApiConfig {
    pub fn base_url(&self) -> String {
        self.base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
    }

    pub fn timeout(&self) -> Result<Option<Duration>, String> {
        self.timeout
            .as_deref()
            .map(|t| parse_duration("api.timeout", t))
            .transpose()
    }

    pub fn retries(&self) -> u32 {
        self.retries.unwrap_or(0)
    }
}

impl SearchConfig {
    pub fn debounce(&self) -> Result<Duration, String> {
        match self.debounce.as_deref() {
            Some(d) => parse_duration("search.debounce", d),
            None => Ok(DEFAULT_DEBOUNCE),
        }
    }
}

impl Config {
    pub fn api(&self) -> ApiConfig {
        self.api.clone().unwrap_or_default()
    }

    pub fn scoring(&self) -> TrustScoreConfig {
        self.scoring.clone().unwrap_or_default()
    }

    pub fn charts(&self) -> ChartConfig {
        self.charts.clone().unwrap_or_default()
    }

    pub fn search(&self) -> SearchConfig {
        self.search.clone().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: Config = serde_saphyr::from_str("{}").unwrap();
        assert_eq!(config.api().base_url(), DEFAULT_BASE_URL);
        assert_eq!(config.api().timeout(), Ok(None));
        assert_eq!(config.api().retries(), 0);
        assert_eq!(config.search().debounce(), Ok(DEFAULT_DEBOUNCE));
    }

    #[test]
    fn test_full_config() {
        let yaml = r#"
api:
  base_url: https://api.propertifi.co/api
  timeout: 30s
  retries: 2
scoring:
  verified_points: 5
charts:
  donut_inner_ratio: 0.5
search:
  debounce: 0s
"#;
        let config: Config = serde_saphyr::from_str(yaml).unwrap();
        let api = config.api();
        assert_eq!(api.base_url(), "https://api.propertifi.co/api");
        assert_eq!(api.timeout(), Ok(Some(Duration::from_secs(30))));
        assert_eq!(api.retries(), 2);
        assert_eq!(config.scoring().verified(), 5.0);
        assert_eq!(config.charts().donut_inner_ratio(), 0.5);
        assert_eq!(config.search().debounce(), Ok(Duration::ZERO));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result: Result<Config, _> = serde_saphyr::from_str("api:\n  base: x\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_bad_duration() {
        let api = ApiConfig {
            timeout: Some("soon".to_string()),
            ..Default::default()
        };
        assert!(api.timeout().unwrap_err().contains("api.timeout"));
    }
}
