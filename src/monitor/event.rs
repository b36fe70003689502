//! Result and event modeling for the monitor's output stream.
//!
//! This module defines the data structures flowing from the cycle runner to
//! the event sink:
//!
//! - [`Device`]: a named endpoint from configuration
//! - [`ProbeResult`]: one device's verdict within a cycle
//! - [`MonitorEvent`]: the closed set of events a cycle can emit
//! - [`EventSeverity`]: delivery priority of an event

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// A named network endpoint to probe.
///
/// Identity is the address; the name is a display label. The configuration
/// document spells the address field `ip`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Device {
    /// Display label.
    pub name: String,
    /// Probe target, hostname or IP address.
    #[serde(rename = "ip")]
    pub address: String,
}

impl Device {
    /// Create a new device entry.
    pub fn new(name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
        }
    }
}

impl PartialEq for Device {
    fn eq(&self, other: &Self) -> bool {
        self.address == other.address
    }
}

impl Eq for Device {}

impl std::hash::Hash for Device {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.address.hash(state);
    }
}

/// Outcome of probing one device, produced fresh each cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeResult {
    /// The probed device.
    pub device: Device,
    /// Whether the device answered the echo request.
    pub reachable: bool,
    /// Captured ping output, when the process ran at all.
    pub raw_output: Option<String>,
    /// When the probe completed (UTC).
    pub ts: DateTime<Utc>,
}

impl ProbeResult {
    /// Create a result stamped with the current time.
    pub fn new(device: Device, reachable: bool, raw_output: Option<String>) -> Self {
        Self {
            device,
            reachable,
            raw_output,
            ts: Utc::now(),
        }
    }

    /// The verdict as the log stream renders it.
    pub fn verdict(&self) -> &'static str {
        if self.reachable { "OK" } else { "NOK" }
    }
}

/// Event severity classification.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumString, Display, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum EventSeverity {
    /// Verbose diagnostic information.
    Debug,
    /// Normal operational information.
    Info,
    /// Potential issue that may require attention.
    Warn,
    /// Error condition requiring investigation.
    Error,
}

/// One entry in the monitor's event stream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum MonitorEvent {
    /// A cycle began; announces how many devices it will probe.
    CycleStarted {
        /// Number of devices in this cycle.
        device_count: usize,
    },
    /// One device was probed.
    DeviceProbed(ProbeResult),
    /// A cycle finished; renders as a separator line.
    CycleCompleted,
    /// The monitor is stopping on an operator-initiated signal.
    ShuttingDown,
}

impl MonitorEvent {
    /// Severity at which the event is delivered.
    pub fn severity(&self) -> EventSeverity {
        match self {
            Self::CycleStarted { .. } | Self::ShuttingDown => EventSeverity::Info,
            Self::DeviceProbed(_) | Self::CycleCompleted => EventSeverity::Debug,
        }
    }
}

impl std::fmt::Display for MonitorEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CycleStarted { device_count } => {
                write!(f, "Starting ping cycle... {}", device_count)
            }
            Self::DeviceProbed(result) => write!(
                f,
                "{:30} | {:15} | {:>3}",
                result.device.name,
                result.device.address,
                result.verdict()
            ),
            Self::CycleCompleted => f.write_str("-------------------"),
            Self::ShuttingDown => f.write_str("Monitoring service stopped"),
        }
    }
}
