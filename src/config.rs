// src/config.rs
//! Configuration management

use crate::error::{GpsError, Result};
use crate::gps::source::DEFAULT_BAUDRATE;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    Terminal,
    Json,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GpsConfig {
    pub serial_port: Option<String>,
    pub baudrate: u32,
    pub poll_interval_ms: u64,
    pub output: OutputMode,
}

impl Default for GpsConfig {
    fn default() -> Self {
        Self {
            serial_port: None,
            baudrate: DEFAULT_BAUDRATE,
            poll_interval_ms: 100,
            output: OutputMode::Terminal,
        }
    }
}

impl GpsConfig {
    /// Load configuration from the user config file, defaults if absent
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::get_config_path()?)
    }

    /// Save configuration to the user config file
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::get_config_path()?)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(config_path)
            .map_err(|e| GpsError::Config(format!("Failed to read config file: {}", e)))?;

        let config: Self = serde_json::from_str(&contents)
            .map_err(|e| GpsError::Config(format!("Failed to parse config file: {}", e)))?;

        Ok(config)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        // Create config directory if it doesn't exist
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| GpsError::Config(format!("Failed to create config directory: {}", e)))?;
        }

        let contents = serde_json::to_string_pretty(self)?;

        std::fs::write(config_path, contents)
            .map_err(|e| GpsError::Config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// Get config file path
    pub fn get_config_path() -> Result<PathBuf> {
        let home = std::env::var("HOME")
            .map_err(|_| GpsError::Config("HOME environment variable not set".to_string()))?;

        Ok(PathBuf::from(home).join(".config").join("gps-decoder").join("config.json"))
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }
}
