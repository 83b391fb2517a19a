//! Configuration loading and management
//!
//! Configuration comes from an optional YAML file, then environment
//! overrides, then validation. Every field has a default, so an empty file
//! (or no file) is a valid development configuration.

use crate::core::error::ConfigError;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Environment variable holding the PostgreSQL connection url
pub const ENV_DATABASE_URL: &str = "POSTGRES_URL";
/// Environment variable overriding the listen address
pub const ENV_BIND: &str = "DASHBOARD_BIND";
/// Environment variable overriding the log format (`pretty` or `json`)
pub const ENV_LOG_FORMAT: &str = "DASHBOARD_LOG_FORMAT";

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("expected 'pretty' or 'json', got '{}'", other)),
        }
    }
}

/// Database connection settings
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Connection url; when unset the in-memory store is used
    pub url: Option<String>,

    #[validate(range(min = 1))]
    pub max_connections: u32,

    /// Refuse unencrypted connections
    pub require_ssl: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: 5,
            require_ssl: true,
        }
    }
}

/// A user accepted by the development identity provider
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DevUser {
    #[validate(email)]
    pub email: String,

    #[validate(length(min = 6))]
    pub password: String,
}

/// Complete dashboard configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct DashboardConfig {
    /// Address the HTTP server binds to
    #[validate(length(min = 1))]
    pub bind_address: String,

    #[validate(nested)]
    pub database: DatabaseConfig,

    /// Buffer size of the revalidation event bus
    #[validate(range(min = 1))]
    pub event_bus_capacity: usize,

    /// Where a successful login navigates to
    #[validate(length(min = 1))]
    pub login_redirect: String,

    pub log_format: LogFormat,

    /// Users for the development identity provider
    #[validate(nested)]
    pub dev_users: Vec<DevUser>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:3000".to_string(),
            database: DatabaseConfig::default(),
            event_bus_capacity: 256,
            login_redirect: "/dashboard".to_string(),
            log_format: LogFormat::default(),
            dev_users: Vec::new(),
        }
    }
}

impl DashboardConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_string(),
            source,
        })?;
        Self::from_yaml_str(&content)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        // An empty document deserializes to null; treat it as all defaults.
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    /// Apply overrides from a variable lookup
    pub fn apply_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_DATABASE_URL).filter(|v| !v.trim().is_empty()) {
            self.database.url = Some(url);
        }
        if let Some(bind) = lookup(ENV_BIND).filter(|v| !v.trim().is_empty()) {
            self.bind_address = bind;
        }
        if let Some(format) = lookup(ENV_LOG_FORMAT) {
            self.log_format = format.parse().map_err(|message| ConfigError::Env {
                var: ENV_LOG_FORMAT.to_string(),
                message,
            })?;
        }
        Ok(self)
    }

    /// Apply overrides from the process environment
    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        self.apply_overrides(|var| std::env::var(var).ok())
    }

    /// Check every constraint
    pub fn validated(self) -> Result<Self, ConfigError> {
        self.validate()?;
        Ok(self)
    }

    /// File (if any), then environment, then validation
    pub fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => Self::from_yaml_file(path)?,
            None => Self::default(),
        };
        config.with_env_overrides()?.validated()
    }
}
