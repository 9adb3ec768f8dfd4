//! Application configuration structures.

use std::env;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Compute writes without sending them
    #[serde(default)]
    pub dry_run: bool,

    /// Notion database access
    #[serde(default)]
    pub notion: NotionConfig,

    /// Open Library lookup settings
    #[serde(default)]
    pub lookup: LookupConfig,

    /// Log output settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::or_default(Self::load(&path), path.as_ref())
    }

    /// Fall back to defaults for a failed [`Config::load`], with a warning.
    ///
    /// Split out so callers can inspect the loaded file (e.g. for the log
    /// level) before logging is set up.
    pub fn or_default(loaded: Result<Self>, path: &Path) -> Self {
        loaded.unwrap_or_else(|e| {
            log::warn!("Config load failed from {:?}: {}. Using defaults.", path, e);
            Self::default()
        })
    }

    /// Overlay values from the environment.
    ///
    /// `NOTION_TOKEN` and `NOTION_DATABASE_ID` replace the file values when
    /// set and non-empty. `BOOKTRACK_DRY_RUN` accepts `1`/`true`/`yes`.
    pub fn apply_env(&mut self) {
        if let Some(token) = env_value("NOTION_TOKEN") {
            self.notion.token = token;
        }
        if let Some(id) = env_value("NOTION_DATABASE_ID") {
            self.notion.database_id = id;
        }
        if let Some(flag) = env_value("BOOKTRACK_DRY_RUN") {
            self.dry_run = matches!(flag.to_ascii_lowercase().as_str(), "1" | "true" | "yes");
        }
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.notion.token.trim().is_empty() {
            return Err(AppError::config(
                "notion.token is empty (set it in the config file or NOTION_TOKEN)",
            ));
        }
        if self.notion.database_id.trim().is_empty() {
            return Err(AppError::config(
                "notion.database_id is empty (set it in the config file or NOTION_DATABASE_ID)",
            ));
        }
        if self.notion.timeout_secs == 0 {
            return Err(AppError::validation("notion.timeout_secs must be > 0"));
        }
        if self.lookup.timeout_secs == 0 {
            return Err(AppError::validation("lookup.timeout_secs must be > 0"));
        }
        if self.lookup.max_concurrent == 0 {
            return Err(AppError::validation("lookup.max_concurrent must be > 0"));
        }
        if self.lookup.user_agent.trim().is_empty() {
            return Err(AppError::validation("lookup.user_agent is empty"));
        }
        Ok(())
    }
}

fn env_value(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Notion API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotionConfig {
    /// Integration token
    #[serde(default)]
    pub token: String,

    /// Book database id
    #[serde(default)]
    pub database_id: String,

    /// API root, with trailing slash
    #[serde(default = "defaults::notion_api_base")]
    pub api_base: String,

    /// Value of the `Notion-Version` header
    #[serde(default = "defaults::notion_version")]
    pub api_version: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,
}

impl Default for NotionConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            database_id: String::new(),
            api_base: defaults::notion_api_base(),
            api_version: defaults::notion_version(),
            timeout_secs: defaults::timeout(),
        }
    }
}

/// Bibliographic lookup settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LookupConfig {
    /// Open Library root, with trailing slash
    #[serde(default = "defaults::lookup_base")]
    pub base_url: String,

    /// User-Agent header for lookup requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Maximum author lookups in flight
    #[serde(default = "defaults::max_concurrent")]
    pub max_concurrent: usize,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::lookup_base(),
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            max_concurrent: defaults::max_concurrent(),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is unset
    #[serde(default = "defaults::log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::log_level(),
        }
    }
}

mod defaults {
    pub fn notion_api_base() -> String {
        "https://api.notion.com/v1/".into()
    }
    pub fn notion_version() -> String {
        "2022-06-28".into()
    }
    pub fn lookup_base() -> String {
        "https://openlibrary.org/".into()
    }
    pub fn user_agent() -> String {
        concat!("booktrack/", env!("CARGO_PKG_VERSION")).into()
    }
    pub fn timeout() -> u64 {
        30
    }
    pub fn max_concurrent() -> usize {
        4
    }
    pub fn log_level() -> String {
        "info".into()
    }
}
