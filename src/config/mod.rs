//! Configuration management for flatfeed.
//!
//! Configuration is read from `~/.config/flatfeed/config.toml` at startup.
//! If the file doesn't exist, a default configuration with comments is created.

use serde::Deserialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// Main configuration struct.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub feed: FeedConfig,
    pub push: PushConfig,
    pub site: SiteConfig,
}

/// Location of the query API and the push registration endpoints.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL every endpoint is resolved against (default: local dev API)
    pub base_url: String,

    /// Request timeout in seconds (default: 10)
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:3001/".to_string(),
            timeout_secs: 10,
        }
    }
}

impl ApiConfig {
    pub fn graphql_endpoint(&self) -> Result<Url, url::ParseError> {
        self.endpoint("graphql")
    }

    pub fn push_subscribe_endpoint(&self) -> Result<Url, url::ParseError> {
        self.endpoint("push/subscribe")
    }

    pub fn push_unsubscribe_endpoint(&self) -> Result<Url, url::ParseError> {
        self.endpoint("push/unsubscribe")
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    fn endpoint(&self, path: &str) -> Result<Url, url::ParseError> {
        // Url::join drops the last segment unless the base ends with '/'
        let base = if self.base_url.ends_with('/') {
            Url::parse(&self.base_url)?
        } else {
            Url::parse(&format!("{}/", self.base_url))?
        };
        base.join(path)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// Items requested per page (default: 9)
    pub page_size: u32,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self { page_size: 9 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PushConfig {
    /// Public VAPID key handed to the push platform on subscribe
    pub application_server_key: String,

    /// How long a transient subscription notice stays visible (default: 5)
    pub notice_ttl_secs: u64,
}

impl Default for PushConfig {
    fn default() -> Self {
        Self {
            application_server_key: String::new(),
            notice_ttl_secs: 5,
        }
    }
}

impl PushConfig {
    pub fn notice_ttl(&self) -> Duration {
        Duration::from_secs(self.notice_ttl_secs)
    }
}

/// Fallbacks for item share metadata.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub title: String,
    pub description: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "FlatDario".to_string(),
            description: "Things I liked across the web, collected by FlatDario.".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from the default path.
    ///
    /// If the config file doesn't exist, creates a default one with comments.
    /// If the config file exists but is invalid, returns an error.
    /// Missing fields in the config file will use default values.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::default_config_path()?;
        Self::load_from(&config_path)
    }

    pub fn load_from(config_path: &Path) -> Result<Self, ConfigError> {
        if !config_path.exists() {
            Self::create_default_config(config_path)?;
            return Ok(Self::default());
        }

        let content = fs::read_to_string(config_path).map_err(|e| ConfigError::Io {
            path: config_path.to_path_buf(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: config_path.to_path_buf(),
            source: e,
        })?;

        Ok(config)
    }

    /// Get the default config file path: `~/.config/flatfeed/config.toml`
    pub fn default_config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("flatfeed").join("config.toml"))
    }

    fn create_default_config(path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let mut file = fs::File::create(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        file.write_all(Self::default_config_content().as_bytes())
            .map_err(|e| ConfigError::Io {
                path: path.to_path_buf(),
                source: e,
            })?;

        Ok(())
    }

    fn default_config_content() -> &'static str {
        r##"# flatfeed configuration

[api]
# Base URL of the query API; "graphql", "push/subscribe" and
# "push/unsubscribe" are resolved against it
base_url = "http://127.0.0.1:3001/"

# Request timeout in seconds
timeout_secs = 10

[feed]
# Items requested per page
page_size = 9

[push]
# Public application server (VAPID) key
application_server_key = ""

# Seconds a subscription error notice stays visible
notice_ttl_secs = 5

[site]
# Used for share metadata when an item has no title/description
title = "FlatDario"
description = "Things I liked across the web, collected by FlatDario."
"##
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to read/write config file at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}
