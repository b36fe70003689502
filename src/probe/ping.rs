//! ICMP reachability probe via the system ping utility.
//!
//! One external single-packet ping process per probe call, bounded by a
//! timeout so an unresponsive host cannot stall the cycle.

use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tokio::time::timeout;

use crate::probe::platform::PlatformFamily;

/// Default probe timeout (3 seconds).
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(3);

/// Verdict of a single reachability probe.
#[derive(Debug, Clone)]
pub struct ProbeOutcome {
    /// Whether the target answered the echo request.
    pub reachable: bool,
    /// Captured ping output, when the process ran at all.
    pub raw_output: Option<String>,
}

impl ProbeOutcome {
    /// Unreachable with no captured output (launch failure or timeout).
    pub fn unreachable() -> Self {
        Self {
            reachable: false,
            raw_output: None,
        }
    }
}

/// A single reachability check against one address.
///
/// Implementations never fail outward: every error path collapses to an
/// unreachable verdict.
#[async_trait::async_trait]
pub trait Prober: Send + Sync + 'static {
    /// Probe one address and classify the result.
    async fn probe(&self, address: &str) -> ProbeOutcome;
}

/// Probes by launching one single-packet system ping per call.
///
/// Stateless across calls; the address is used verbatim as a process
/// argument (the device list is operator-controlled configuration).
#[derive(Debug, Clone)]
pub struct PingProber {
    platform: PlatformFamily,
    timeout: Duration,
}

impl PingProber {
    /// Create a prober for the current platform.
    pub fn new(timeout: Duration) -> Self {
        Self::with_platform(PlatformFamily::current(), timeout)
    }

    /// Create a prober for a specific platform family.
    pub fn with_platform(platform: PlatformFamily, timeout: Duration) -> Self {
        Self { platform, timeout }
    }
}

impl Default for PingProber {
    fn default() -> Self {
        Self::new(DEFAULT_PROBE_TIMEOUT)
    }
}

#[async_trait::async_trait]
impl Prober for PingProber {
    async fn probe(&self, address: &str) -> ProbeOutcome {
        let invocation = Command::new("ping")
            .arg(self.platform.packet_count_flag())
            .arg("1")
            .arg(address)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output();

        let output = match timeout(self.timeout, invocation).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                tracing::debug!(
                    platform = %self.platform,
                    target = %address,
                    error = %e,
                    "Ping process failed to launch"
                );
                return ProbeOutcome::unreachable();
            }
            Err(_) => {
                tracing::debug!(
                    platform = %self.platform,
                    target = %address,
                    timeout_ms = self.timeout.as_millis() as u64,
                    "Ping timed out"
                );
                return ProbeOutcome::unreachable();
            }
        };

        // ping reports resolution failures and ICMP errors on stderr.
        let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
        if !output.stderr.is_empty() {
            text.push_str(&String::from_utf8_lossy(&output.stderr));
        }

        let reachable = self.platform.classify(&text);
        if !reachable {
            tracing::debug!(
                platform = %self.platform,
                target = %address,
                output = %text.trim(),
                "Ping classified unreachable"
            );
        }

        ProbeOutcome {
            reachable,
            raw_output: Some(text),
        }
    }
}
