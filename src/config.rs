use crate::error::{Result, TrackerError};
use serde::Deserialize;
use std::fs;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub store: StoreConfig,
    #[serde(default)]
    pub blobs: Option<BlobConfig>,
    pub server: ServerConfig,
    #[serde(default)]
    pub reports: ReportConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Either "memory" or "http".
    pub backend: String,
    pub base_url: Option<String>,
    /// Name of the environment variable holding the store API key.
    pub api_key_env: Option<String>,
    #[serde(default = "default_collection")]
    pub collection: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BlobConfig {
    pub base_url: String,
    pub bucket: String,
    pub api_key_env: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReportConfig {
    #[serde(default = "default_top_destinations")]
    pub top_destinations: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            top_destinations: default_top_destinations(),
        }
    }
}

fn default_collection() -> String {
    crate::constants::SHIPMENTS_COLLECTION.to_string()
}

fn default_top_destinations() -> usize {
    5
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from("config.toml")
    }

    pub fn load_from(config_path: &str) -> Result<Self> {
        let config_content = fs::read_to_string(config_path).map_err(|e| {
            TrackerError::Config(format!(
                "Failed to read config file '{}': {}",
                config_path, e
            ))
        })?;

        let config: Config = toml::from_str(&config_content)?;
        Ok(config)
    }

    /// Resolves the store API key from the configured environment variable.
    pub fn store_api_key(&self) -> Result<Option<String>> {
        match &self.store.api_key_env {
            Some(var) => Ok(Some(std::env::var(var)?)),
            None => Ok(None),
        }
    }
}
