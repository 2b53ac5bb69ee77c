//! Application configuration.
//!
//! Loaded from `config.toml` (see [`GymflowPaths`]); every section is optional
//! and falls back to defaults. A few environment variables override the file
//! so credentials never have to be written to disk.

use std::path::Path;
use std::time::Duration;

use gymflow_core::error::{GymError, Result};
use gymflow_core::virtualization::DeviceClass;
use serde::{Deserialize, Serialize};

use crate::paths::GymflowPaths;
use crate::storage::AtomicTomlFile;

pub const BACKEND_URL_ENV: &str = "GYMFLOW_BACKEND_URL";
pub const ANON_KEY_ENV: &str = "GYMFLOW_ANON_KEY";
pub const LOG_LEVEL_ENV: &str = "GYMFLOW_LOG_LEVEL";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Project base URL, e.g. `https://abc.backend.example.com`.
    #[serde(default)]
    pub url: String,
    /// Public (anonymous) API key sent as `apikey` on every request.
    #[serde(default)]
    pub anon_key: String,
    /// Name of the invitation function.
    #[serde(default = "default_invite_function")]
    pub invite_function: String,
}

fn default_invite_function() -> String {
    "invite-student".to_string()
}

impl BackendConfig {
    pub fn validate(&self) -> Result<()> {
        if self.url.trim().is_empty() {
            return Err(GymError::config(format!(
                "backend url is not set (config.toml [backend].url or {BACKEND_URL_ENV})"
            )));
        }
        if !(self.url.starts_with("https://") || self.url.starts_with("http://")) {
            return Err(GymError::config(format!(
                "backend url '{}' must start with http:// or https://",
                self.url
            )));
        }
        if self.anon_key.trim().is_empty() {
            return Err(GymError::config(format!(
                "anon key is not set (config.toml [backend].anon_key or {ANON_KEY_ENV})"
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheSettings {
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
    /// Optional bound on live entries; least recently used entries go first.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_entries: Option<usize>,
}

fn default_ttl_secs() -> u64 {
    300
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl_secs(),
            max_entries: None,
        }
    }
}

impl CacheSettings {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkSettings {
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

fn default_request_timeout_ms() -> u64 {
    15_000
}

impl Default for NetworkSettings {
    fn default() -> Self {
        Self {
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

impl NetworkSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListSettings {
    #[serde(default)]
    pub device_class: DeviceClass,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub network: NetworkSettings,
    #[serde(default)]
    pub list: ListSettings,
    #[serde(default)]
    pub log: LogSettings,
}

impl AppConfig {
    /// Loads the config from the default location with env overrides.
    pub fn load() -> Result<Self> {
        Self::load_from(&GymflowPaths::config_file()?)
    }

    /// Loads the config at `path` with env overrides. A missing file is not an error.
    pub fn load_from(path: &Path) -> Result<Self> {
        let file = AtomicTomlFile::<AppConfig>::new(path.to_path_buf());
        let mut config = file.load()?.unwrap_or_default();
        config.apply_overrides(|name| std::env::var(name).ok());
        tracing::debug!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    /// Applies overrides from `lookup` (normally the process environment).
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        if let Some(url) = non_empty(BACKEND_URL_ENV) {
            self.backend.url = url;
        }
        if let Some(key) = non_empty(ANON_KEY_ENV) {
            self.backend.anon_key = key;
        }
        if let Some(level) = non_empty(LOG_LEVEL_ENV) {
            self.log.level = level;
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        AtomicTomlFile::<AppConfig>::new(path.to_path_buf()).save(self)
    }
}
