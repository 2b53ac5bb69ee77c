//! Unified path management for GymFlow configuration and local state.
//!
//! ```text
//! ~/.config/gymflow/           # Config directory
//! ├── config.toml              # Application configuration
//! └── logs/                    # Daily-rolling log files
//!
//! ~/.local/share/gymflow/      # Data directory
//! └── local_state.toml         # Persisted key-value state (session, prefs)
//! ```

use std::path::PathBuf;

use gymflow_core::error::{GymError, Result};

const APP_DIR: &str = "gymflow";

/// Environment variable that relocates both directories (tests, portable installs).
pub const HOME_OVERRIDE_ENV: &str = "GYMFLOW_HOME";

pub struct GymflowPaths;

impl GymflowPaths {
    /// Returns the configuration directory.
    pub fn config_dir() -> Result<PathBuf> {
        if let Some(home) = std::env::var_os(HOME_OVERRIDE_ENV) {
            return Ok(PathBuf::from(home).join("config"));
        }
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or_else(|| GymError::config("cannot determine the config directory"))
    }

    /// Returns the data directory.
    pub fn data_dir() -> Result<PathBuf> {
        if let Some(home) = std::env::var_os(HOME_OVERRIDE_ENV) {
            return Ok(PathBuf::from(home).join("data"));
        }
        dirs::data_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or_else(|| GymError::config("cannot determine the data directory"))
    }

    pub fn config_file() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    pub fn local_state_file() -> Result<PathBuf> {
        Ok(Self::data_dir()?.join("local_state.toml"))
    }

    pub fn logs_dir() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("logs"))
    }
}
