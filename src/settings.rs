use crate::config::ClockConfig;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid settings in {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub clock: ClockConfig,
    #[serde(default)]
    pub display: DisplaySettings,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DisplaySettings {
    pub palette: u8,
    pub show_fps: bool,
    pub time_step: f32,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            palette: crate::colors::MONO,
            show_fps: false,
            time_step: crate::config::DEFAULT_TIME_STEP,
        }
    }
}

impl Settings {
    /// Load the user config, falling back to defaults on any problem
    pub fn load() -> Self {
        let path = Self::config_path();
        if !path.exists() {
            log::debug!("no settings at {}, using defaults", path.display());
            return Self::default();
        }

        match Self::from_path(&path) {
            Ok(settings) => {
                log::debug!("loaded settings from {}", path.display());
                settings
            }
            Err(err) => {
                log::warn!("{err}; using defaults");
                Self::default()
            }
        }
    }

    pub fn from_path(path: &Path) -> Result<Self, SettingsError> {
        let content = fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("dendra")
            .join("config.toml")
    }
}
