use crate::client::DEFAULT_SERVER_URL;
use crate::probe::{ProbeMode, DEFAULT_PROBE_TIMEOUT, MIN_PROBE_TIMEOUT};
use crate::resolver::{DEFAULT_PRIMARY_BASE, DEFAULT_SECONDARY_BASE};
use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Env var that wins over `server_url` from the config file
pub const SERVER_URL_ENV: &str = "GITA_SERVER_URL";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub server_url: String,
    pub primary_base: String,
    pub secondary_base: String,
    pub probe: ProbeMode,
    pub probe_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    pub fn new() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            primary_base: DEFAULT_PRIMARY_BASE.to_string(),
            secondary_base: DEFAULT_SECONDARY_BASE.to_string(),
            probe: ProbeMode::default(),
            probe_timeout_secs: DEFAULT_PROBE_TIMEOUT.as_secs(),
        }
    }

    /// Load from the user config dir, then apply env overrides
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&Self::config_path()?)?;
        if let Ok(url) = std::env::var(SERVER_URL_ENV) {
            if !url.trim().is_empty() {
                config.server_url = url;
            }
        }
        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }

        let config_content = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&config_content)
            .map_err(|e| anyhow!("Invalid config file {}: {}", path.display(), e))?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Create config directory if it doesn't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let config_content = serde_json::to_string_pretty(self)?;
        fs::write(path, config_content)?;
        Ok(())
    }

    /// Configured probe timeout, never below [`MIN_PROBE_TIMEOUT`]
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs).max(MIN_PROBE_TIMEOUT)
    }

    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("gita"))
    }

    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.json"))
    }
}
