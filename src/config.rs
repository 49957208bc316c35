//! Configuration management
//!
//! Read from a `config.toml` given on the command line, or from
//! `config.toml` in the working directory when present. Every section
//! and field has a default, so an empty file is a valid config.

use crate::constants::{
    DEFAULT_DEVICE_HOST, DEFAULT_WS_PATH, MAX_RECONNECT_DELAY_MS, RECONNECT_DELAY_MS,
};
use crate::error::{LinkError, Result};
use crate::transport::ReconnectPolicy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Default config file name, looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "config.toml";

// =============================================================================
// Application Configuration
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub device: DeviceConfig,
    pub reconnect: ReconnectConfig,
    pub logs: LogsConfig,
}

/// Where the controller is reachable
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    /// Hostname or IP, optionally with `:port`
    pub host: String,
    /// WebSocket endpoint path
    pub ws_path: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconnectConfig {
    pub delay_ms: u64,
    /// 1.0 keeps the delay fixed
    pub backoff_factor: f64,
    pub max_delay_ms: u64,
    /// Absent = retry forever
    pub max_attempts: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogsConfig {
    /// Same effect as `--verbose`
    pub verbose: bool,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_DEVICE_HOST.to_string(),
            ws_path: DEFAULT_WS_PATH.to_string(),
        }
    }
}

impl Default for ReconnectConfig {
    fn default() -> Self {
        Self {
            delay_ms: RECONNECT_DELAY_MS,
            backoff_factor: 1.0,
            max_delay_ms: MAX_RECONNECT_DELAY_MS,
            max_attempts: None,
        }
    }
}

impl ReconnectConfig {
    pub fn policy(&self) -> ReconnectPolicy {
        ReconnectPolicy {
            delay: Duration::from_millis(self.delay_ms),
            backoff_factor: self.backoff_factor,
            max_delay: Duration::from_millis(self.max_delay_ms.max(self.delay_ms)),
            max_attempts: self.max_attempts,
        }
    }
}

impl Config {
    /// Load and validate a config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| LinkError::ConfigRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config = Self::parse(&content, path)?;
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Load `path` if given, else `config.toml` if it exists, else defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let local = PathBuf::from(CONFIG_FILE_NAME);
                if local.exists() {
                    Self::load(&local)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    fn parse(content: &str, path: &Path) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(|e| LinkError::ConfigParse {
            path: path.to_path_buf(),
            source: e,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.device.host.trim().is_empty() {
            return Err(LinkError::ConfigValidation {
                field: "device.host",
                reason: "must not be empty".into(),
            });
        }
        if !self.device.ws_path.starts_with('/') {
            return Err(LinkError::ConfigValidation {
                field: "device.ws_path",
                reason: format!("'{}' must start with '/'", self.device.ws_path),
            });
        }
        if self.reconnect.delay_ms == 0 {
            return Err(LinkError::ConfigValidation {
                field: "reconnect.delay_ms",
                reason: "must be greater than 0".into(),
            });
        }
        let factor = self.reconnect.backoff_factor;
        if factor.is_nan() || factor < 1.0 {
            return Err(LinkError::ConfigValidation {
                field: "reconnect.backoff_factor",
                reason: format!("{} is below 1.0", factor),
            });
        }
        Ok(())
    }

    /// `ws://<host><ws_path>`
    pub fn ws_url(&self) -> String {
        format!("ws://{}{}", self.device.host.trim(), self.device.ws_path)
    }
}
