//! Reachability probing.
//!
//! Provides the platform-aware single-packet ping invocation and the pure
//! output classifiers behind it.

mod ping;
mod platform;

pub use ping::{DEFAULT_PROBE_TIMEOUT, PingProber, ProbeOutcome, Prober};
pub use platform::PlatformFamily;
