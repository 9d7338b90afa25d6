use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::alerts::thresholds::{AlertThresholds, ThresholdError};

/// Environment variable naming the directory that holds settings.json.
pub const CONFIG_DIR_ENV: &str = "SHOP_MONITOR_CONFIG_DIR";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read settings: {0}")]
    Io(#[from] io::Error),
    #[error("settings file is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid alert thresholds: {0}")]
    Thresholds(#[from] ThresholdError),
}

/// Application settings with alert threshold overrides.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Base URL of the monitor feed
    pub base_url: String,
    pub poll_interval_secs: u64,
    pub request_timeout_secs: u64,
    /// Alert band overrides; fields left out keep the built-in values
    pub thresholds: AlertThresholds,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8888".to_string(),
            poll_interval_secs: 300,
            request_timeout_secs: 10,
            thresholds: AlertThresholds::default(),
        }
    }
}

/// Directory from the environment, or the working directory.
pub fn config_dir_from_env() -> PathBuf {
    std::env::var_os(CONFIG_DIR_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
}

pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    pub fn new(config_dir: PathBuf) -> Self {
        Self {
            config_path: config_dir.join("settings.json"),
        }
    }

    pub fn path(&self) -> &Path {
        &self.config_path
    }

    /// Load settings, reporting why a present file could not be used.
    /// A missing file yields the defaults.
    pub fn try_load(&self) -> Result<Settings, ConfigError> {
        if !self.config_path.exists() {
            return Ok(Settings::default());
        }
        let content = fs::read_to_string(&self.config_path)?;
        let settings: Settings = serde_json::from_str(&content)?;
        settings.thresholds.validate()?;
        Ok(settings)
    }

    /// Load settings, falling back to the defaults on any problem.
    pub fn load(&self) -> Settings {
        match self.try_load() {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Ignoring {:?}: {}", self.config_path, e);
                Settings::default()
            }
        }
    }

    pub fn save(&self, settings: &Settings) -> io::Result<()> {
        // Ensure directory exists
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(settings)?;
        fs::write(&self.config_path, content)
    }
}
