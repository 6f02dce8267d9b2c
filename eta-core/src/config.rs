use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, time::Duration};

use crate::{model::NamedLocation, provider::open_meteo};

pub const DEFAULT_PREDICTION_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_HEALTH_POLL_SECS: u64 = 30;

/// Top-level configuration stored on disk. Every field is optional.
///
/// Example TOML:
/// ```toml
/// prediction_url = "http://127.0.0.1:8000"
/// health_poll_secs = 30
/// default_start = "Lahore"
/// default_destination = "Karachi"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// Base URL of the prediction service (`/health`, `/predict`).
    pub prediction_url: Option<String>,

    /// Override for the weather provider endpoint.
    pub weather_url: Option<String>,

    pub health_poll_secs: Option<u64>,

    /// Preset names used when a session starts.
    pub default_start: Option<String>,
    pub default_destination: Option<String>,
}

impl Config {
    pub fn prediction_url(&self) -> &str {
        self.prediction_url.as_deref().unwrap_or(DEFAULT_PREDICTION_URL)
    }

    pub fn weather_url(&self) -> &str {
        self.weather_url.as_deref().unwrap_or(open_meteo::DEFAULT_BASE_URL)
    }

    pub fn health_poll_interval(&self) -> Duration {
        Duration::from_secs(self.health_poll_secs.unwrap_or(DEFAULT_HEALTH_POLL_SECS).max(1))
    }

    /// Configured start location, or the first preset.
    pub fn start_location(&self) -> Result<NamedLocation> {
        Self::resolve_preset(self.default_start.as_deref(), "Lahore")
    }

    /// Configured destination, or the second preset.
    pub fn destination_location(&self) -> Result<NamedLocation> {
        Self::resolve_preset(self.default_destination.as_deref(), "Islamabad")
    }

    fn resolve_preset(name: Option<&str>, fallback: &str) -> Result<NamedLocation> {
        let name = name.unwrap_or(fallback);
        NamedLocation::preset(name).ok_or_else(|| {
            anyhow!(
                "Unknown preset location '{name}' in config.\n\
                 Hint: run `eta presets` to list the available locations."
            )
        })
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "nexusdrive", "eta-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}
