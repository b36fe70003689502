//! Monitor configuration structures.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::monitor::Device;
use crate::probe::DEFAULT_PROBE_TIMEOUT;

use super::validation::ConfigError;

/// Default polling interval in seconds.
pub const DEFAULT_INTERVAL_SECS: u64 = 30;

fn default_probe_timeout() -> Duration {
    DEFAULT_PROBE_TIMEOUT
}

/// Top-level monitor configuration.
///
/// Reloaded at the start of every cycle; the runner treats each load as a
/// wholesale replacement, so device-list edits take effect on the next
/// cycle without a restart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Devices to probe, in probe order.
    pub devices: Vec<Device>,

    /// Polling interval in seconds (default: 30).
    #[serde(default)]
    pub interval_seconds: Option<i64>,

    /// Bound on each external ping process (default: 3s).
    #[serde(default = "default_probe_timeout", with = "humantime_serde")]
    pub probe_timeout: Duration,
}

impl MonitorConfig {
    /// Create a configuration with default interval and timeout.
    pub fn new(devices: Vec<Device>) -> Self {
        Self {
            devices,
            interval_seconds: None,
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
        }
    }

    /// Set the polling interval.
    pub fn with_interval_seconds(mut self, secs: i64) -> Self {
        self.interval_seconds = Some(secs);
        self
    }

    /// Load configuration from a YAML file.
    ///
    /// # Errors
    /// Returns `ConfigError::Io` when the file is missing or unreadable,
    /// `ConfigError::Parse` for malformed YAML or a missing `devices`,
    /// `name`, or `ip` field, and `ConfigError::Validation` for empty
    /// fields.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for device in &self.devices {
            if device.name.is_empty() {
                return Err(ConfigError::Validation(format!(
                    "device '{}': name cannot be empty",
                    device.address
                )));
            }
            if device.address.is_empty() {
                return Err(ConfigError::Validation(format!(
                    "device '{}': ip cannot be empty",
                    device.name
                )));
            }
        }
        Ok(())
    }

    /// Effective polling interval.
    ///
    /// An absent or non-positive `interval_seconds` falls back to the
    /// 30 second default at the load boundary; it is never fatal.
    pub fn effective_interval(&self) -> Duration {
        match self.interval_seconds {
            Some(secs) if secs > 0 => Duration::from_secs(secs as u64),
            Some(secs) => {
                tracing::warn!(
                    interval_seconds = secs,
                    default_secs = DEFAULT_INTERVAL_SECS,
                    "Invalid ping interval, using default"
                );
                Duration::from_secs(DEFAULT_INTERVAL_SECS)
            }
            None => Duration::from_secs(DEFAULT_INTERVAL_SECS),
        }
    }
}
