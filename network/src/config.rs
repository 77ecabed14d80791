// SPDX-License-Identifier: MIT OR Apache-2.0

//! Client configuration, stored as TOML in the platform config directory.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Address hosts bind and guests dial
    #[serde(default = "default_host_addr")]
    pub host_addr: String,
    /// Base port; the room code is added as an offset
    #[serde(default = "default_base_port")]
    pub base_port: u16,
    /// Seconds per turn
    #[serde(default = "default_turn_duration")]
    pub turn_duration_secs: u32,
    /// Base URL used when building shareable join links
    #[serde(default = "default_join_base_url")]
    pub join_base_url: String,
}

fn default_host_addr() -> String {
    "127.0.0.1".to_string()
}

fn default_base_port() -> u16 {
    46000
}

fn default_turn_duration() -> u32 {
    xodots_core::TURN_DURATION
}

fn default_join_base_url() -> String {
    "https://xodots.example/play".to_string()
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            host_addr: default_host_addr(),
            base_port: default_base_port(),
            turn_duration_secs: default_turn_duration(),
            join_base_url: default_join_base_url(),
        }
    }
}

pub fn get_config_path() -> Result<PathBuf> {
    let proj_dirs =
        ProjectDirs::from("io", "xodots", "xodots").context("Failed to determine config directory")?;
    Ok(proj_dirs.config_dir().join("config.toml"))
}

/// Load the config, writing the defaults on first run.
pub fn load_config() -> Result<NetworkConfig> {
    let config_path = get_config_path().context("Failed to determine config path")?;
    load_config_from(&config_path)
}

pub fn load_config_from(config_path: &Path) -> Result<NetworkConfig> {
    if !config_path.exists() {
        tracing::info!(
            "Config file not found, creating default at: {}",
            config_path.display()
        );
        let default_config = NetworkConfig::default();
        save_config_to(&default_config, config_path)?;
        return Ok(default_config);
    }

    let content = fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

    toml::from_str::<NetworkConfig>(&content)
        .with_context(|| format!("Failed to parse config file: {}", config_path.display()))
}

pub fn save_config(config: &NetworkConfig) -> Result<()> {
    let config_path = get_config_path().context("Failed to determine config path")?;
    save_config_to(config, &config_path)
}

pub fn save_config_to(config: &NetworkConfig, config_path: &Path) -> Result<()> {
    if let Some(parent) = config_path.parent() {
        fs::create_dir_all(parent).context("Failed to create config directory")?;
    }

    let toml_content = toml::to_string_pretty(config).context("Failed to serialize config")?;
    fs::write(config_path, toml_content)
        .with_context(|| format!("Failed to write config file: {}", config_path.display()))?;

    tracing::info!("Saved config to: {}", config_path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn default_config() {
        let config = NetworkConfig::default();
        assert_eq!(config.base_port, 46000);
        assert_eq!(config.turn_duration_secs, 10);
        assert!(!config.host_addr.is_empty());
    }

    #[test]
    fn config_serialization() {
        let config = NetworkConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();

        let deserialized: NetworkConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(deserialized.base_port, config.base_port);
        assert_eq!(deserialized.join_base_url, config.join_base_url);
    }

    #[test]
    fn first_load_writes_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let loaded = load_config_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(loaded.base_port, NetworkConfig::default().base_port);

        // A partial file picks up serde defaults for missing fields.
        fs::write(&path, "base_port = 50000\n").unwrap();
        let partial = load_config_from(&path).unwrap();
        assert_eq!(partial.base_port, 50000);
        assert_eq!(partial.turn_duration_secs, 10);
    }
}
