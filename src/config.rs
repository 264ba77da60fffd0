//! Exporter configuration.
//!
//! Read from `~/.config/ble-probe-exporter/config.toml` unless a path is
//! given on the command line. Every field falls back to a default, so an
//! empty file is a valid configuration.

use serde::{Deserialize, Serialize};
use std::fs;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{error, info, warn};

use crate::ble::gatttool::GattTool;
use crate::ble::handles::{
    is_valid_device_address, BATTERY_HANDLE, CLIMATE_NOTIFY_HANDLE, DEFAULT_DEVICE,
    ENABLE_NOTIFICATIONS,
};
use crate::error::{Error, Result};

/// HTTP listener settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind. `0.0.0.0` exposes the exporter on the network,
    /// `127.0.0.1` keeps it local.
    pub address: IpAddr,
    /// Port to bind.
    pub port: u16,
}

impl ServerConfig {
    /// Default port.
    pub const DEFAULT_PORT: u16 = 9191;

    /// Socket address to bind.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.address, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: Self::DEFAULT_PORT,
        }
    }
}

/// Probe and tool settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// MAC address of the probe.
    pub device: String,
    /// `gatttool` executable.
    pub tool: String,
    /// Handle written to start climate notifications.
    pub notify_handle: u16,
    /// Value written to `notify_handle`.
    pub notify_payload: String,
    /// Battery level handle.
    pub battery_handle: u16,
    /// Upper bound for each tool invocation, in seconds.
    pub timeout_secs: u64,
}

impl ProbeConfig {
    /// Tool timeout as a duration.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            device: DEFAULT_DEVICE.to_string(),
            tool: GattTool::DEFAULT_PROGRAM.to_string(),
            notify_handle: CLIMATE_NOTIFY_HANDLE,
            notify_payload: ENABLE_NOTIFICATIONS.to_string(),
            battery_handle: BATTERY_HANDLE,
            timeout_secs: GattTool::DEFAULT_TIMEOUT.as_secs(),
        }
    }
}

/// Exporter configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP listener.
    pub server: ServerConfig,
    /// Probe access.
    pub probe: ProbeConfig,
}

impl Config {
    /// Get the default config file path
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("ble-probe-exporter").join("config.toml"))
    }

    /// Parse a configuration from TOML text.
    pub fn from_toml(contents: &str) -> Result<Self> {
        toml::from_str(contents).map_err(|e| Error::Config {
            reason: e.to_string(),
        })
    }

    /// Load the configuration.
    ///
    /// An explicit `path` must exist and parse. Without one, the default
    /// path is tried and anything wrong with it falls back to defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            let contents = fs::read_to_string(path).map_err(|e| Error::Config {
                reason: format!("cannot read {}: {}", path.display(), e),
            })?;
            let config = Self::from_toml(&contents)?;
            info!("Loaded config from {:?}", path);
            return Ok(config);
        }

        let Some(path) = Self::path() else {
            warn!("Could not determine config directory, using defaults");
            return Ok(Self::default());
        };

        if !path.exists() {
            info!("No config file found at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        match fs::read_to_string(&path) {
            Ok(contents) => match Self::from_toml(&contents) {
                Ok(config) => {
                    info!("Loaded config from {:?}", path);
                    Ok(config)
                }
                Err(e) => {
                    error!("Failed to parse config file: {}", e);
                    Ok(Self::default())
                }
            },
            Err(e) => {
                error!("Failed to read config file: {}", e);
                Ok(Self::default())
            }
        }
    }

    /// Check values that serde cannot.
    pub fn validate(&self) -> Result<()> {
        if !is_valid_device_address(&self.probe.device) {
            return Err(Error::Config {
                reason: format!("invalid device address {:?}", self.probe.device),
            });
        }
        if self.probe.timeout_secs == 0 {
            return Err(Error::Config {
                reason: "timeout_secs must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}
