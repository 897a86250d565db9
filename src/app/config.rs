use anyhow::{Context, Result};
use directories::ProjectDirs;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

use crate::constants::{DEFAULT_DEVICE_URL, DEFAULT_LOCAL_URL, HTTP_REQUEST_TIMEOUT_SECS};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Backend connection configuration
    pub api: ApiConfig,
}

/// Which address set the client dials.
///
/// The original app decided this by sniffing the runtime: a browser build
/// talked to loopback to dodge cross-origin rules, a phone on the same
/// network used the host machine's LAN address. Here it is one explicit
/// setting, resolved once when the gateway is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionTarget {
    /// Client and server share a machine; use the loopback URL
    Local,
    /// Physical device reaching the server over the LAN
    Device,
}

impl fmt::Display for ConnectionTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionTarget::Local => write!(f, "local"),
            ConnectionTarget::Device => write!(f, "device"),
        }
    }
}

/// Backend connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Address set used for requests
    pub target: ConnectionTarget,
    /// Base URL when the server runs on this machine
    pub local_url: String,
    /// Base URL when reaching the server over the LAN
    pub device_url: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            target: ConnectionTarget::Local,
            local_url: DEFAULT_LOCAL_URL.to_string(),
            device_url: DEFAULT_DEVICE_URL.to_string(),
            timeout_secs: HTTP_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl ApiConfig {
    /// Base URL for the configured target.
    pub fn base_url(&self) -> &str {
        match self.target {
            ConnectionTarget::Local => &self.local_url,
            ConnectionTarget::Device => &self.device_url,
        }
    }
}

/// Load configuration from multiple sources
///
/// Later sources override earlier ones: defaults, then the global
/// `config.toml`, then a project-local `.saferide/config.toml`, then
/// environment variables (`SAFERIDE_API__TARGET=device` and friends).
pub fn load_config() -> Result<Config> {
    // Get config directories
    let config_dir = get_config_dir()?;
    let global_config = config_dir.join("config.toml");
    let local_config = PathBuf::from(".saferide/config.toml");

    // Build figment configuration
    let mut figment = Figment::from(Serialized::defaults(Config::default()));

    // Add global config if it exists
    if global_config.exists() {
        figment = figment.merge(Toml::file(&global_config));
    }

    // Add local config if it exists
    if local_config.exists() {
        figment = figment.merge(Toml::file(&local_config));
    }

    // Add environment variables (SAFERIDE_ prefix, "__" nests sections)
    figment = figment.merge(Env::prefixed("SAFERIDE_").split("__"));

    // Extract and return config
    figment.extract().context("Failed to load configuration")
}

/// Get the configuration directory
pub fn get_config_dir() -> Result<PathBuf> {
    if let Some(proj_dirs) = ProjectDirs::from("", "", "saferide") {
        let config_dir = proj_dirs.config_dir();
        std::fs::create_dir_all(config_dir)?;
        Ok(config_dir.to_path_buf())
    } else {
        // Fallback to home directory
        let home = std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .context("Could not determine home directory")?;
        let config_dir = PathBuf::from(home).join(".config").join("saferide");
        std::fs::create_dir_all(&config_dir)?;
        Ok(config_dir)
    }
}

/// Save configuration to file
pub fn save_config(config: &Config, path: Option<PathBuf>) -> Result<()> {
    let path = if let Some(p) = path {
        p
    } else {
        get_config_dir()?.join("config.toml")
    };

    let toml_string = toml::to_string_pretty(config)?;
    std::fs::write(&path, toml_string)
        .with_context(|| format!("Failed to write config to {}", path.display()))?;

    Ok(())
}

/// Create a default configuration file if it doesn't exist
pub fn init_config() -> Result<()> {
    let config_dir = get_config_dir()?;
    let config_file = config_dir.join("config.toml");

    if !config_file.exists() {
        let default_config = Config::default();
        save_config(&default_config, Some(config_file.clone()))?;
        println!("Created default configuration at: {}", config_file.display());
    }

    // Create example local config
    let local_example = PathBuf::from(".saferide/config.toml.example");
    if !local_example.exists() {
        if let Some(parent) = local_example.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let example_config = r#"# SafeRide client configuration
# This file overrides global settings for this directory

[api]
# "local" dials the loopback URL, "device" dials the LAN URL below
target = "device"
device_url = "http://192.168.1.50:8000"
timeout_secs = 10
"#;
        std::fs::write(&local_example, example_config)?;
        println!("Created example configuration at: {}", local_example.display());
    }

    Ok(())
}
