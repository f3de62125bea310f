use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::path::PathBuf;

use crate::catalog::GoogleBooksConfig;

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub catalog: GoogleBooksConfig,
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub search: SearchConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    "0.0.0.0".parse().unwrap()
}

fn default_port() -> u16 {
    8080
}

/// Database configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("evolibrary.db")
}

/// Library backend configuration (indexer search + download submission).
///
/// When `api_base` is unset, the base URL is derived from scheme, host, and
/// the fixed backend port: the backend is assumed to run next to the web UI
/// on the same host.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BackendConfig {
    /// Explicit base URL, overriding the derivation rule.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,
    #[serde(default = "default_scheme")]
    pub scheme: String,
    #[serde(default = "default_backend_host")]
    pub host: String,
    #[serde(default = "default_backend_port")]
    pub port: u16,
    /// Request timeout in seconds (default: 30).
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            api_base: None,
            scheme: default_scheme(),
            host: default_backend_host(),
            port: default_backend_port(),
            timeout_secs: default_timeout(),
        }
    }
}

impl BackendConfig {
    /// Resolved API base URL.
    pub fn api_base(&self) -> String {
        match &self.api_base {
            Some(base) => base.trim_end_matches('/').to_string(),
            None => format!("{}://{}:{}", self.scheme, self.host, self.port),
        }
    }
}

fn default_scheme() -> String {
    "http".to_string()
}

fn default_backend_host() -> String {
    "localhost".to_string()
}

fn default_backend_port() -> u16 {
    8000
}

fn default_timeout() -> u32 {
    30
}

/// Search behavior configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchConfig {
    /// Quiet period before a typed query triggers a search, in milliseconds.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    /// Minimum query length before any request is issued.
    #[serde(default = "default_min_query_len")]
    pub min_query_len: usize,
    /// Default language restriction for catalog searches.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lang_restrict: Option<String>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            min_query_len: default_min_query_len(),
            lang_restrict: None,
        }
    }
}

fn default_debounce_ms() -> u64 {
    500
}

fn default_min_query_len() -> usize {
    3
}

/// Sanitized config for API responses (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub catalog: SanitizedCatalogConfig,
    pub backend: SanitizedBackendConfig,
    pub search: SearchConfig,
}

/// Sanitized catalog config (API key hidden)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedCatalogConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    pub api_key_configured: bool,
    pub timeout_secs: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct SanitizedBackendConfig {
    pub api_base: String,
    pub timeout_secs: u32,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            server: config.server.clone(),
            database: config.database.clone(),
            catalog: SanitizedCatalogConfig {
                endpoint: config.catalog.endpoint.clone(),
                api_key_configured: config
                    .catalog
                    .api_key
                    .as_ref()
                    .is_some_and(|k| !k.is_empty()),
                timeout_secs: config.catalog.timeout_secs,
            },
            backend: SanitizedBackendConfig {
                api_base: config.backend.api_base(),
                timeout_secs: config.backend.timeout_secs,
            },
            search: config.search.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_empty_config_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host.to_string(), "0.0.0.0");
        assert_eq!(config.database.path.to_str().unwrap(), "evolibrary.db");
        assert_eq!(config.search.debounce_ms, 500);
        assert_eq!(config.search.min_query_len, 3);
        assert_eq!(config.backend.api_base(), "http://localhost:8000");
    }

    #[test]
    fn test_deserialize_custom_values() {
        let toml = r#"
[server]
host = "127.0.0.1"
port = 9000

[database]
path = "/data/evolibrary.sqlite"

[search]
debounce_ms = 250
min_query_len = 2
lang_restrict = "en"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host.to_string(), "127.0.0.1");
        assert_eq!(
            config.database.path.to_str().unwrap(),
            "/data/evolibrary.sqlite"
        );
        assert_eq!(config.search.debounce_ms, 250);
        assert_eq!(config.search.min_query_len, 2);
        assert_eq!(config.search.lang_restrict.as_deref(), Some("en"));
    }

    #[test]
    fn test_backend_api_base_derivation() {
        let toml = r#"
[backend]
scheme = "https"
host = "media.local"
port = 8001
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.backend.api_base(), "https://media.local:8001");
    }

    #[test]
    fn test_backend_explicit_api_base_wins() {
        let toml = r#"
[backend]
api_base = "http://backend.example:1234/"
host = "ignored.local"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.backend.api_base(), "http://backend.example:1234");
    }

    #[test]
    fn test_sanitized_config_hides_api_key() {
        let toml = r#"
[catalog]
api_key = "secret-key"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        let sanitized = SanitizedConfig::from(&config);

        assert!(sanitized.catalog.api_key_configured);
        let json = serde_json::to_string(&sanitized).unwrap();
        assert!(!json.contains("secret-key"));
    }

    #[test]
    fn test_sanitized_config_without_api_key() {
        let config = Config::default();
        let sanitized = SanitizedConfig::from(&config);
        assert!(!sanitized.catalog.api_key_configured);
        assert_eq!(sanitized.backend.api_base, "http://localhost:8000");
    }
}
