//! Configuration for parm-transfer
//!
//! Settings are read once at startup from `config.toml` in the
//! platform-appropriate config directory under `dev.parm-transfer`:
//!
//! - **Linux**: `~/.config/dev.parm-transfer/config.toml`
//! - **macOS**: `~/Library/Application Support/dev.parm-transfer/config.toml`
//! - **Windows**: `%APPDATA%\dev.parm-transfer\config.toml`
//!
//! The file is optional and never written by the tool. Every section and
//! every key may be omitted; missing values take their defaults.
//!
//! # Example
//!
//! ```toml
//! [transfer]
//! copy_expressions = true
//! copy_keyframes = false
//! skip_locked = true
//!
//! [ui]
//! dark_mode = true
//! show_only_modified = false
//! window_width = 900.0
//! window_height = 650.0
//!
//! [logging]
//! filter = "info,parm_transfer=debug"
//! ```

use crate::error::{ParmTransferError, Result};
use crate::transfer::TransferOptions;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application identifier for the config directory
pub const APP_ID: &str = "dev.parm-transfer";

/// Config filename
pub const CONFIG_FILE: &str = "config.toml";

/// Log filter used when neither `RUST_LOG` nor the config sets one
pub const DEFAULT_LOG_FILTER: &str = "info,parm_transfer=debug";

/// Get the application config directory path
pub fn app_config_dir() -> Option<PathBuf> {
    dirs_next::config_dir().map(|p| p.join(APP_ID))
}

/// Get the path to the config file
pub fn config_path() -> Option<PathBuf> {
    app_config_dir().map(|p| p.join(CONFIG_FILE))
}

// ==================== UI Preferences ====================

/// Panel appearance and initial filter state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiPreferences {
    /// Enable dark mode
    #[serde(default = "default_true")]
    pub dark_mode: bool,

    /// Start with the "show only modified" filter enabled
    #[serde(default)]
    pub show_only_modified: bool,

    /// Initial window size in points
    #[serde(default = "default_window_width")]
    pub window_width: f32,
    #[serde(default = "default_window_height")]
    pub window_height: f32,
}

fn default_true() -> bool {
    true
}

fn default_window_width() -> f32 {
    900.0
}

fn default_window_height() -> f32 {
    650.0
}

impl Default for UiPreferences {
    fn default() -> Self {
        Self {
            dark_mode: true,
            show_only_modified: false,
            window_width: default_window_width(),
            window_height: default_window_height(),
        }
    }
}

// ==================== Logging ====================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive, overridden by `RUST_LOG`
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

fn default_log_filter() -> String {
    DEFAULT_LOG_FILTER.to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

// ==================== App Config ====================

/// Complete application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Initial state of the transfer option checkboxes
    #[serde(default)]
    pub transfer: TransferOptions,

    #[serde(default)]
    pub ui: UiPreferences,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Parse a config from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| ParmTransferError::Config(format!("Failed to parse config: {}", e)))
    }

    /// Load a config file; a missing file yields the defaults
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| ParmTransferError::Config(format!("Failed to read config: {}", e)))?;

        Self::from_toml_str(&content)
    }

    /// Load from the default location, returning defaults on any error
    pub fn load_or_default() -> Self {
        let Some(path) = config_path() else {
            tracing::warn!("Could not determine config directory, using defaults");
            return Self::default();
        };
        Self::load_from_or_default(&path)
    }

    /// Load from `path`, returning defaults on any error
    pub fn load_from_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => {
                tracing::debug!("Loaded config from {:?}", path);
                config
            }
            Err(e) => {
                tracing::warn!("Failed to load config, using defaults: {}", e);
                Self::default()
            }
        }
    }
}

// ==================== Tests ====================
