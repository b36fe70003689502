//! Configuration module for the pharos monitor.
//!
//! Provides YAML-based configuration loading and validation for:
//! - The device list (probe order is configuration order)
//! - Polling interval and per-probe timeout

mod monitor;
mod validation;

pub use monitor::{DEFAULT_INTERVAL_SECS, MonitorConfig};
pub use validation::ConfigError;
