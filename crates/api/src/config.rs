//! Application configuration loaded from environment variables.

use std::time::Duration;

use catalog::CatalogConfig;

/// Server configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `HOST` — bind address (default: `"0.0.0.0"`)
/// - `PORT` — listen port (default: `3003`)
/// - `RUST_LOG` — tracing filter directive (default: `"info"`)
/// - `CATALOG_URL` — catalog service base URL (default: `"http://localhost:3002"`)
/// - `CATALOG_TIMEOUT_MS` — per-lookup timeout (default: `5000`)
/// - `AUTH_URL` — auth service base URL (default: `"http://localhost:3000"`)
/// - `BACKGROUND_VALIDATION` — confirm cart articles when a cart is loaded (default: `true`)
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub catalog_url: String,
    pub catalog_timeout: Duration,
    pub auth_url: String,
    pub background_validation: bool,
}

impl Config {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: std::env::var("HOST").unwrap_or(defaults.host),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            log_level: std::env::var("RUST_LOG").unwrap_or(defaults.log_level),
            catalog_url: std::env::var("CATALOG_URL").unwrap_or(defaults.catalog_url),
            catalog_timeout: std::env::var("CATALOG_TIMEOUT_MS")
                .ok()
                .and_then(|ms| ms.parse().ok())
                .map(Duration::from_millis)
                .unwrap_or(defaults.catalog_timeout),
            auth_url: std::env::var("AUTH_URL").unwrap_or(defaults.auth_url),
            background_validation: std::env::var("BACKGROUND_VALIDATION")
                .ok()
                .map(|v| parse_flag(&v))
                .unwrap_or(defaults.background_validation),
        }
    }

    /// Returns the `"host:port"` bind address string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Returns the catalog client configuration.
    pub fn catalog_config(&self) -> CatalogConfig {
        CatalogConfig::new(self.catalog_url.clone()).with_timeout(self.catalog_timeout)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3003,
            log_level: "info".to_string(),
            catalog_url: "http://localhost:3002".to_string(),
            catalog_timeout: catalog::http::DEFAULT_TIMEOUT,
            auth_url: "http://localhost:3000".to_string(),
            background_validation: true,
        }
    }
}

fn parse_flag(value: &str) -> bool {
    !matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "false" | "0" | "off" | "no"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let config = Config::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 3003);
        assert_eq!(config.log_level, "info");
        assert_eq!(config.catalog_url, "http://localhost:3002");
        assert_eq!(config.auth_url, "http://localhost:3000");
        assert!(config.background_validation);
    }

    #[test]
    fn test_addr_formatting() {
        let config = Config {
            host: "127.0.0.1".to_string(),
            port: 8080,
            ..Config::default()
        };
        assert_eq!(config.addr(), "127.0.0.1:8080");
    }

    #[test]
    fn test_catalog_config() {
        let config = Config {
            catalog_url: "http://catalog:9000".to_string(),
            catalog_timeout: Duration::from_millis(750),
            ..Config::default()
        };
        let catalog = config.catalog_config();
        assert_eq!(catalog.base_url, "http://catalog:9000");
        assert_eq!(catalog.timeout, Duration::from_millis(750));
    }

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("true"));
        assert!(parse_flag("1"));
        assert!(!parse_flag("false"));
        assert!(!parse_flag(" OFF "));
        assert!(!parse_flag("0"));
    }
}
