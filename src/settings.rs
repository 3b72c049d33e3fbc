//! User settings persistence.
//!
//! Settings live in `settings.json` under the platform config directory. A
//! missing or unreadable file yields the defaults.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::analysis::DEFAULT_WINDOW_SIZE;
use crate::parsers::BlockDetection;
use crate::units::UnitPreferences;

/// Errors from reading or writing the settings file
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("could not determine config directory")]
    NoConfigDir,
    #[error("failed to read settings file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid settings file {}: {source}", path.display())]
    Deserialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to create config directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("failed to write settings file {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// User settings that persist across sessions
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserSettings {
    /// Settings file version for migration support
    #[serde(default = "default_version")]
    pub version: u32,
    /// Data-block detection thresholds
    #[serde(default)]
    pub detection: BlockDetection,
    /// Differentiation window for torque derivation
    #[serde(default = "default_window_size")]
    pub window_size: usize,
    #[serde(default)]
    pub units: UnitPreferences,
}

fn default_version() -> u32 {
    1
}

fn default_window_size() -> usize {
    DEFAULT_WINDOW_SIZE
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            version: default_version(),
            detection: BlockDetection::default(),
            window_size: default_window_size(),
            units: UnitPreferences::default(),
        }
    }
}

impl UserSettings {
    /// Get the config directory path for DynoView
    pub fn get_config_dir() -> Option<PathBuf> {
        #[cfg(target_os = "macos")]
        {
            dirs::data_dir().map(|p| p.join("DynoView"))
        }
        #[cfg(target_os = "windows")]
        {
            dirs::config_dir().map(|p| p.join("DynoView"))
        }
        #[cfg(not(any(target_os = "macos", target_os = "windows")))]
        {
            dirs::config_dir().map(|p| p.join("dynoview"))
        }
    }

    /// Get the path to the settings JSON file
    pub fn get_settings_path() -> Option<PathBuf> {
        Self::get_config_dir().map(|p| p.join("settings.json"))
    }

    /// Load settings from the default location.
    ///
    /// A missing, unreadable or malformed file yields the defaults.
    pub fn load() -> Self {
        let Some(path) = Self::get_settings_path() else {
            return Self::default();
        };
        Self::load_from(&path).unwrap_or_else(|e| {
            tracing::warn!("Using default settings: {}", e);
            Self::default()
        })
    }

    /// Load settings from a specific file; a missing file yields the defaults
    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| SettingsError::Deserialize {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Save settings to the default location
    pub fn save(&self) -> Result<(), SettingsError> {
        let path = Self::get_settings_path().ok_or(SettingsError::NoConfigDir)?;
        self.save_to(&path)
    }

    /// Save settings to a specific file, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<(), SettingsError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| SettingsError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let content = serde_json::to_string_pretty(self)?;

        std::fs::write(path, content).map_err(|source| SettingsError::Write {
            path: path.to_path_buf(),
            source,
        })?;

        tracing::debug!("Saved settings to {}", path.display());
        Ok(())
    }

    /// Window size actually used for differentiation; 0 behaves like 1
    pub fn effective_window(&self) -> usize {
        self.window_size.max(1)
    }
}
