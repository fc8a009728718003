//! Configuration management for the storefront admin toolkit

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable prefix for configuration overrides
pub const ENV_PREFIX: &str = "STOREFRONT";

/// Legacy environment variable holding the backend base URL
pub const BASE_URL_ENV: &str = "BASE_URL";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Relay server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Remote backend configuration
    #[serde(default)]
    pub backend: BackendConfig,

    /// List view configuration
    #[serde(default)]
    pub listing: ListingConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Relay server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// CORS allowed origins
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,
}

/// Remote backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL every endpoint path is appended to
    #[serde(default)]
    pub base_url: Option<String>,

    /// Per-request timeout in seconds; unset means requests never time out
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,

    /// Path of the credential exchange endpoint
    #[serde(default = "default_login_path")]
    pub login_path: String,

    /// Path listing every order
    #[serde(default = "default_orders_path")]
    pub orders_path: String,

    /// Path listing every customer
    #[serde(default = "default_customers_path")]
    pub customers_path: String,

    /// Path listing every vendor
    #[serde(default = "default_vendors_path")]
    pub vendors_path: String,
}

/// List view configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingConfig {
    /// Rows per page
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Page markers shown around the current page
    #[serde(default = "default_max_visible_pages")]
    pub max_visible_pages: usize,

    /// Page markers shown on narrow displays
    #[serde(default = "default_compact_max_visible_pages")]
    pub compact_max_visible_pages: usize,

    /// Jump back to page 1 whenever the query changes
    #[serde(default = "default_reset_page_on_query")]
    pub reset_page_on_query: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format (json or text)
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

const fn default_port() -> u16 {
    3000
}

fn default_cors_origins() -> Vec<String> {
    vec!["*".to_string()]
}

fn default_login_path() -> String {
    "admin/login".to_string()
}

fn default_orders_path() -> String {
    "all/orders".to_string()
}

fn default_customers_path() -> String {
    "all/customers".to_string()
}

fn default_vendors_path() -> String {
    "all/vendors".to_string()
}

const fn default_page_size() -> usize {
    10
}

const fn default_max_visible_pages() -> usize {
    5
}

const fn default_compact_max_visible_pages() -> usize {
    2
}

const fn default_reset_page_on_query() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: default_cors_origins(),
        }
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            request_timeout_secs: None,
            login_path: default_login_path(),
            orders_path: default_orders_path(),
            customers_path: default_customers_path(),
            vendors_path: default_vendors_path(),
        }
    }
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            max_visible_pages: default_max_visible_pages(),
            compact_max_visible_pages: default_compact_max_visible_pages(),
            reset_page_on_query: default_reset_page_on_query(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl BackendConfig {
    /// Configured base URL without a trailing slash
    ///
    /// # Errors
    ///
    /// Returns a configuration error when no base URL is set.
    pub fn require_base_url(&self) -> crate::Result<&str> {
        self.base_url
            .as_deref()
            .map(|url| url.trim_end_matches('/'))
            .filter(|url| !url.is_empty())
            .ok_or_else(|| crate::Error::Configuration {
                message: format!("{BASE_URL_ENV} is not defined"),
            })
    }
}

impl Config {
    /// Load configuration from the optional `config` file and environment
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded or parsed.
    pub fn load() -> crate::Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration, reading `path` instead of the default `config` file
    ///
    /// # Errors
    ///
    /// Returns an error if the file is unreadable, a value has the wrong
    /// type, or the resulting configuration fails [`Config::validate`].
    pub fn load_from(path: Option<&Path>) -> crate::Result<Self> {
        let file = path.map_or_else(
            || config::File::with_name("config").required(false),
            |p| config::File::from(p).required(true),
        );

        let loaded = config::Config::builder()
            .add_source(file)
            .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()
            .map_err(|e| crate::Error::Configuration {
                message: e.to_string(),
            })?;

        let mut config: Self =
            loaded
                .try_deserialize()
                .map_err(|e| crate::Error::Configuration {
                    message: e.to_string(),
                })?;

        if config.backend.base_url.is_none() {
            config.backend.base_url = std::env::var(BASE_URL_ENV).ok();
        }

        config.validate()?;
        Ok(config)
    }

    /// Check invariants the rest of the toolkit relies on
    ///
    /// # Errors
    ///
    /// Returns a configuration error for a zero page size or a base URL
    /// that is not an http(s) URL.
    pub fn validate(&self) -> crate::Result<()> {
        if self.listing.page_size == 0 {
            return Err(crate::Error::Configuration {
                message: "listing.page_size must be at least 1".to_string(),
            });
        }

        if let Some(url) = &self.backend.base_url {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(crate::Error::Configuration {
                    message: format!("backend.base_url must be an http(s) URL, got '{url}'"),
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::uninlined_format_args)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_config_default() {
        let config = Config::default();

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.cors_origins, vec!["*"]);

        assert!(config.backend.base_url.is_none());
        assert!(config.backend.request_timeout_secs.is_none());
        assert_eq!(config.backend.login_path, "admin/login");
        assert_eq!(config.backend.orders_path, "all/orders");

        assert_eq!(config.listing.page_size, 10);
        assert_eq!(config.listing.max_visible_pages, 5);
        assert_eq!(config.listing.compact_max_visible_pages, 2);
        assert!(config.listing.reset_page_on_query);

        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, "json");
    }

    #[test]
    fn test_require_base_url_strips_trailing_slash() {
        let backend = BackendConfig {
            base_url: Some("https://shop.example.com/api/v1/".to_string()),
            ..BackendConfig::default()
        };
        assert_eq!(
            backend.require_base_url().unwrap(),
            "https://shop.example.com/api/v1"
        );
    }

    #[test]
    fn test_require_base_url_missing() {
        let backend = BackendConfig::default();
        let err = backend.require_base_url().unwrap_err();
        assert_eq!(format!("{}", err), "Configuration error: BASE_URL is not defined");

        let blank = BackendConfig {
            base_url: Some("/".to_string()),
            ..BackendConfig::default()
        };
        assert!(blank.require_base_url().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_page_size() {
        let mut config = Config::default();
        config.listing.page_size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_non_http_base_url() {
        let mut config = Config::default();
        config.backend.base_url = Some("ftp://shop.example.com".to_string());
        assert!(config.validate().is_err());

        config.backend.base_url = Some("http://localhost:8080/api/v1".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_toml_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[backend]
base_url = "https://shop.example.com/api/v1"
request_timeout_secs = 15

[listing]
page_size = 25
reset_page_on_query = false
"#
        )
        .unwrap();

        let config = Config::load_from(Some(file.path())).unwrap();
        assert_eq!(
            config.backend.base_url.as_deref(),
            Some("https://shop.example.com/api/v1")
        );
        assert_eq!(config.backend.request_timeout_secs, Some(15));
        assert_eq!(config.listing.page_size, 25);
        assert!(!config.listing.reset_page_on_query);
        // untouched sections keep their defaults
        assert_eq!(config.listing.max_visible_pages, 5);
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn test_load_from_invalid_file_fails_validation() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[listing]\npage_size = 0").unwrap();

        assert!(Config::load_from(Some(file.path())).is_err());
    }

    #[test]
    fn test_config_serialization_roundtrip_keeps_sections() {
        let config = Config::default();
        let json = serde_json::to_value(&config).unwrap();
        assert!(json.get("server").is_some());
        assert!(json.get("backend").is_some());
        assert!(json.get("listing").is_some());
        assert!(json.get("logging").is_some());
    }
}
