//! Pharos - Host Reachability Monitor
//!
//! This crate provides the core functionality for the pharos monitor: given
//! a configured list of named endpoints, it probes each for ICMP
//! reachability on a fixed cadence and emits one structured result event per
//! device per cycle. It can be used as a library, or run standalone with the
//! `pharos` executable.
//!
//! # Architecture
//!
//! - **probe**: platform-aware single-packet ping invocation and the pure
//!   output classifiers behind the verdict
//! - **monitor**: the cycle runner, result/event modeling, and the event
//!   sink seam
//! - **config**: YAML configuration loading and validation
//!
//! # Example
//!
//! ```rust,no_run
//! use pharos::{Monitor, MonitorConfig, PingProber, TracingSink};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), pharos::ConfigError> {
//!     let monitor = Monitor::new(PingProber::default(), TracingSink);
//!     monitor
//!         .run(|| MonitorConfig::load("configs/config.yaml"), std::future::pending())
//!         .await
//! }
//! ```

pub mod config;
pub mod monitor;
pub mod probe;

pub use config::{ConfigError, MonitorConfig};
pub use monitor::{Device, EventSeverity, EventSink, Monitor, MonitorEvent, ProbeResult, TracingSink};
pub use probe::{PingProber, PlatformFamily, ProbeOutcome, Prober};
