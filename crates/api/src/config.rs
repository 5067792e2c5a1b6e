//! Application configuration loaded from environment variables.

use std::time::Duration;

use cart_store::DEFAULT_CART_KEY;

/// Server configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `HOST`: bind address (default: `"0.0.0.0"`)
/// - `PORT`: listen port (default: `3000`)
/// - `RUST_LOG`: tracing filter directive (default: `"info"`)
/// - `CATALOG_URL`: base URL of the product catalog (default: `"http://localhost:3333"`)
/// - `CATALOG_TIMEOUT_MS`: per-request catalog timeout (default: `5000`)
/// - `DATABASE_URL`: `postgres://` or `sqlite:` URL; unset keeps the cart in memory
/// - `CART_KEY`: storage key of the cart (default: `"@storefront:cart"`)
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub catalog_url: String,
    pub catalog_timeout: Duration,
    pub database_url: Option<String>,
    pub cart_key: String,
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
            database_url: std::env::var("DATABASE_URL")
                .ok()
                .filter(|url| !url.trim().is_empty()),
            cart_key: std::env::var("CART_KEY").unwrap_or(defaults.cart_key),
        }
    }

    /// Returns the `"host:port"` bind address string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            log_level: "info".to_string(),
            catalog_url: "http://localhost:3333".to_string(),
            catalog_timeout: Duration::from_millis(5000),
            database_url: None,
            cart_key: DEFAULT_CART_KEY.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let config = Config::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 3000);
        assert_eq!(config.log_level, "info");
        assert_eq!(config.catalog_url, "http://localhost:3333");
        assert_eq!(config.catalog_timeout, Duration::from_secs(5));
        assert!(config.database_url.is_none());
        assert_eq!(config.cart_key, "@storefront:cart");
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
    fn test_addr_default() {
        let config = Config::default();
        assert_eq!(config.addr(), "0.0.0.0:3000");
    }
}
