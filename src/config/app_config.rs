use std::collections::HashMap;
use std::time::Duration;

use serde::Deserialize;

use crate::domain::Category;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub gateway: GatewayConfig,
    pub search: SearchConfig,
    pub logging: LoggingConfig,
}

/// Network gateway settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Backend base URL; missing means a startup warning and the local default
    pub base_url: Option<String>,
    pub timeout_secs: u64,
    pub token_endpoint: String,
    pub token_refresh_buffer_secs: u64,
    /// Lifetime assumed when the credential endpoint omits `expiresIn`
    pub default_token_ttl_secs: u64,
    /// Origin the client runs on; requests to other hosts are cross-origin
    pub app_origin: Option<String>,
    pub cors_fast_fail_ms: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout_secs: 30,
            token_endpoint: "/auth/token".to_string(),
            token_refresh_buffer_secs: 300,
            default_token_ttl_secs: 3600,
            app_origin: None,
            cors_fast_fail_ms: 1500,
        }
    }
}

impl GatewayConfig {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Configured base URL without trailing slash, or the local default
    pub fn resolved_base_url(&self) -> String {
        match self.base_url.as_deref().map(str::trim) {
            Some(url) if !url.is_empty() => url.trim_end_matches('/').to_string(),
            _ => DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn is_base_url_configured(&self) -> bool {
        self.base_url
            .as_deref()
            .is_some_and(|url| !url.trim().is_empty())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn refresh_buffer(&self) -> Duration {
        Duration::from_secs(self.token_refresh_buffer_secs)
    }

    pub fn default_token_ttl(&self) -> Duration {
        Duration::from_secs(self.default_token_ttl_secs)
    }

    pub fn cors_fast_fail(&self) -> Duration {
        Duration::from_millis(self.cors_fast_fail_ms)
    }
}

/// Search aggregation settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub debounce_ms: u64,
    pub min_query_len: usize,
    pub max_results: usize,
    /// Category order in merged results; categories not listed are left out
    pub precedence: Vec<Category>,
    /// Per-category caps keyed by category name
    pub category_caps: HashMap<String, usize>,
    pub radius_miles: u32,
    pub zip_code: Option<String>,
    pub result_cache_ttl_secs: u64,
    pub result_cache_capacity: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 300,
            min_query_len: 2,
            max_results: 6,
            precedence: vec![
                Category::Provider,
                Category::Specialty,
                Category::Procedure,
                Category::Medication,
            ],
            category_caps: HashMap::from([(Category::Provider.as_str().to_string(), 3)]),
            radius_miles: 25,
            zip_code: None,
            result_cache_ttl_secs: 300,
            result_cache_capacity: 256,
        }
    }
}

impl SearchConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn result_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.result_cache_ttl_secs)
    }

    pub fn cap_for(&self, category: Category) -> Option<usize> {
        self.category_caps
            .iter()
            .find(|(key, _)| key.parse::<Category>().ok() == Some(category))
            .map(|(_, cap)| *cap)
    }

    pub fn with_cap(mut self, category: Category, cap: usize) -> Self {
        self.category_caps
            .insert(category.as_str().to_string(), cap);
        self
    }

    /// Cap keys that do not name a category
    pub fn unknown_cap_keys(&self) -> Vec<&str> {
        self.category_caps
            .keys()
            .filter(|key| key.parse::<Category>().is_err())
            .map(String::as_str)
            .collect()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();

        assert_eq!(config.gateway.timeout(), Duration::from_secs(30));
        assert_eq!(config.gateway.refresh_buffer(), Duration::from_secs(300));
        assert_eq!(config.search.debounce(), Duration::from_millis(300));
        assert_eq!(config.search.max_results, 6);
        assert_eq!(config.search.cap_for(Category::Provider), Some(3));
        assert_eq!(config.search.cap_for(Category::Procedure), None);
    }

    #[test]
    fn test_base_url_resolution() {
        let missing = GatewayConfig::default();
        assert!(!missing.is_base_url_configured());
        assert_eq!(missing.resolved_base_url(), DEFAULT_BASE_URL);

        let blank = GatewayConfig::default().with_base_url("  ");
        assert!(!blank.is_base_url_configured());

        let set = GatewayConfig::default().with_base_url("https://api.example.com/");
        assert_eq!(set.resolved_base_url(), "https://api.example.com");
    }

    #[test]
    fn test_partial_config_deserializes_with_defaults() {
        let config: AppConfig = serde_json::from_value(serde_json::json!({
            "gateway": { "base_url": "https://api.example.com" },
            "search": { "precedence": ["procedure", "provider"], "category_caps": { "doctors": 2, "bogus": 1 } },
            "logging": { "format": "json" }
        }))
        .unwrap();

        assert_eq!(config.gateway.timeout_secs, 30);
        assert_eq!(
            config.search.precedence,
            vec![Category::Procedure, Category::Provider]
        );
        assert_eq!(config.search.cap_for(Category::Provider), Some(2));
        assert_eq!(config.search.unknown_cap_keys(), vec!["bogus"]);
        assert!(matches!(config.logging.format, LogFormat::Json));
    }
}
