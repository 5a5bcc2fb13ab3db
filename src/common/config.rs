//! Configuration file handling

use serde::Deserialize;
use std::path::{Path, PathBuf};

use super::paths::config_path;
use super::Result;

/// Main configuration structure
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Target API settings
    #[serde(default)]
    pub api: ApiConfig,

    /// Timeout settings
    #[serde(default)]
    pub timeouts: Timeouts,

    /// Response schema settings
    #[serde(default)]
    pub schemas: SchemaConfig,

    /// Log output settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Target API settings
#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    /// Versioned base URL every step path is appended to
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Value sent in the `api-key` header
    #[serde(default = "default_api_key")]
    pub api_key: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: default_api_key(),
        }
    }
}

fn default_base_url() -> String {
    "https://petstore.swagger.io/v2".to_string()
}

fn default_api_key() -> String {
    "special-key".to_string()
}

/// Timeout settings
#[derive(Debug, Deserialize, Clone)]
pub struct Timeouts {
    /// Hard timeout for a single HTTP request, in seconds
    #[serde(default = "default_request")]
    pub request_secs: u64,

    /// Timeout for establishing a connection, in seconds
    #[serde(default = "default_connect")]
    pub connect_secs: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            request_secs: default_request(),
            connect_secs: default_connect(),
        }
    }
}

fn default_request() -> u64 {
    30
}
fn default_connect() -> u64 {
    10
}

/// Response schema settings
#[derive(Debug, Deserialize, Default, Clone)]
pub struct SchemaConfig {
    /// Directory searched for schema files before the bundled set
    pub dir: Option<PathBuf>,
}

/// Log output settings
#[derive(Debug, Deserialize, Default, Clone)]
pub struct LoggingConfig {
    /// Also append full-detail logs to `<data dir>/logs/petstore.log`
    #[serde(default)]
    pub file: bool,
}

impl Config {
    /// Load configuration from the default config file
    ///
    /// Returns default configuration if file doesn't exist
    pub fn load() -> Result<Self> {
        if let Some(path) = config_path() {
            if path.exists() {
                return Self::load_from(&path);
            }
        }
        Ok(Self::default())
    }

    /// Load configuration from an explicit path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| super::Error::FileRead {
            path: path.display().to_string(),
            error: e.to_string(),
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| super::Error::ConfigParse(e.to_string()))
    }

    /// Apply command line overrides on top of file values
    pub fn apply_overrides(
        &mut self,
        base_url: Option<String>,
        api_key: Option<String>,
        schema_dir: Option<PathBuf>,
    ) {
        if let Some(base_url) = base_url {
            self.api.base_url = base_url;
        }
        if let Some(api_key) = api_key {
            self.api.api_key = api_key;
        }
        if schema_dir.is_some() {
            self.schemas.dir = schema_dir;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config.api.base_url, "https://petstore.swagger.io/v2");
        assert_eq!(config.api.api_key, "special-key");
        assert_eq!(config.timeouts.request_secs, 30);
        assert_eq!(config.timeouts.connect_secs, 10);
        assert!(config.schemas.dir.is_none());
        assert!(!config.logging.file);
    }

    #[test]
    fn test_partial_sections() {
        let config = Config::from_toml_str(
            r#"
            [api]
            base_url = "http://localhost:8080/v2"

            [timeouts]
            request_secs = 5

            [schemas]
            dir = "/tmp/schemas"
            "#,
        )
        .unwrap();

        assert_eq!(config.api.base_url, "http://localhost:8080/v2");
        assert_eq!(config.api.api_key, "special-key");
        assert_eq!(config.timeouts.request_secs, 5);
        assert_eq!(config.timeouts.connect_secs, 10);
        assert_eq!(config.schemas.dir, Some(PathBuf::from("/tmp/schemas")));
    }

    #[test]
    fn test_invalid_toml_is_config_parse_error() {
        let err = Config::from_toml_str("[api\nbase_url = 1").unwrap_err();
        assert!(matches!(err, super::super::Error::ConfigParse(_)));
    }

    #[test]
    fn test_overrides_replace_only_given_values() {
        let mut config = Config::default();
        config.apply_overrides(Some("http://127.0.0.1:1234".to_string()), None, None);
        assert_eq!(config.api.base_url, "http://127.0.0.1:1234");
        assert_eq!(config.api.api_key, "special-key");
        assert!(config.schemas.dir.is_none());
    }
}
