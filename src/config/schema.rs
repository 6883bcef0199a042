//! Configuration schema definitions.
//!
//! Structure of the configuration file, with defaults that work without
//! any file present.

use super::error::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Serial connection configuration
    pub serial: SerialConfig,
    /// Port discovery configuration
    pub discovery: DiscoveryConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

impl Config {
    /// Check cross-field constraints that serde cannot express.
    pub fn validate(&self) -> ConfigResult<()> {
        if !matches!(self.serial.relay_count, 2 | 4 | 8) {
            return Err(ConfigError::validation(
                "serial.relay_count",
                "must be 2, 4 or 8",
            ));
        }
        if self.discovery.start_index >= self.discovery.end_index {
            return Err(ConfigError::validation(
                "discovery.start_index",
                "must be below discovery.end_index",
            ));
        }
        Ok(())
    }
}

/// Serial connection section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SerialConfig {
    /// Port to use when the CLI is not given one explicitly
    pub port: Option<String>,
    /// Relay-count guess used until the handshake identifies the board
    pub relay_count: u8,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            port: None,
            relay_count: 2,
        }
    }
}

/// Port discovery section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    /// First candidate index to probe
    pub start_index: usize,
    /// One past the last candidate index to probe
    pub end_index: usize,
    /// Baud rate for the open-probe
    pub probe_baud: u32,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            start_index: crate::discovery::SCAN_RANGE.start,
            end_index: crate::discovery::SCAN_RANGE.end,
            probe_baud: crate::discovery::SCAN_BAUD,
        }
    }
}

impl DiscoveryConfig {
    /// The configured candidate range.
    pub fn range(&self) -> std::ops::Range<usize> {
        self.start_index..self.end_index
    }
}

/// Logging section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: "trace", "debug", "info", "warn", "error"
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}
