//! Configuration loading and validation

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::info;
use xrlink_core::layout::DEFAULT_LAYOUT_PATTERN;
use xrlink_core::{InterfaceProfile, OrchestratorContext, DEFAULT_USD, EMPTY_STAGE};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub daemon: DaemonConfig,
    #[serde(default)]
    pub bridge: BridgeConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaemonConfig {
    /// Bind address for the web server
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "0.0.0.0:8090".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BridgeConfig {
    /// Interface profile: screen, vr or ar
    #[serde(default)]
    pub interface_mode: InterfaceProfile,
    /// Asset to open once the placeholder stage is up (empty = default_usd)
    #[serde(default)]
    pub usd_path: String,
    #[serde(default = "default_usd")]
    pub default_usd: String,
    /// Stage opened by a reset
    #[serde(default = "default_empty_stage")]
    pub empty_stage: String,
    /// Delay between placeholder open and target load, in milliseconds
    #[serde(default = "default_load_delay_ms")]
    pub load_delay_ms: u64,
    /// Layout file path, `{profile}` is replaced with the interface mode
    #[serde(default = "default_layout_file")]
    pub layout_file: String,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            interface_mode: InterfaceProfile::default(),
            usd_path: String::new(),
            default_usd: default_usd(),
            empty_stage: default_empty_stage(),
            load_delay_ms: default_load_delay_ms(),
            layout_file: default_layout_file(),
        }
    }
}

fn default_usd() -> String {
    DEFAULT_USD.to_string()
}

fn default_empty_stage() -> String {
    EMPTY_STAGE.to_string()
}

fn default_load_delay_ms() -> u64 {
    1000
}

fn default_layout_file() -> String {
    DEFAULT_LAYOUT_PATTERN.to_string()
}

impl Config {
    /// Build the bridge context read once at startup
    pub fn to_context(&self) -> OrchestratorContext {
        OrchestratorContext {
            profile: self.bridge.interface_mode,
            pending_target: self.bridge.usd_path.clone(),
            default_target: self.bridge.default_usd.clone(),
            empty_stage: self.bridge.empty_stage.clone(),
            load_delay: Duration::from_millis(self.bridge.load_delay_ms),
        }
    }
}

/// Load configuration from file
pub fn load_config(path: &Path) -> Result<Config> {
    if path.exists() {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    } else {
        info!(
            path = %path.display(),
            "Configuration file not found, using defaults"
        );
        Ok(Config::default())
    }
}
