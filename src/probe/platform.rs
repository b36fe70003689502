//! Platform family detection and ping output classification.

use strum_macros::{AsRefStr, Display};

/// Coarse OS category used to select ping flags and output-parsing rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum PlatformFamily {
    /// Linux, macOS and the BSDs: `ping -c 1`, "received" summary line.
    Linux,
    /// Windows: `ping -n 1`, "Received = N" summary with explicit
    /// "Destination host unreachable" replies.
    WindowsLike,
}

impl PlatformFamily {
    /// Family of the host this binary was compiled for.
    pub const fn current() -> Self {
        if cfg!(windows) {
            Self::WindowsLike
        } else {
            Self::Linux
        }
    }

    /// Packet-count flag understood by the platform's ping utility.
    pub const fn packet_count_flag(&self) -> &'static str {
        match self {
            Self::Linux => "-c",
            Self::WindowsLike => "-n",
        }
    }

    /// Classify captured ping output into a reachability verdict.
    ///
    /// Pure: the verdict depends only on the family and the output text.
    /// Empty or garbled output classifies unreachable.
    pub fn classify(&self, output: &str) -> bool {
        let output = output.to_lowercase();
        match self {
            Self::Linux => classify_unix(&output),
            Self::WindowsLike => classify_windows(&output),
        }
    }
}

/// iputils prints "1 received"; BSD and macOS print "1 packets received".
fn classify_unix(output: &str) -> bool {
    output.contains("1 received") || output.contains("1 packets received")
}

/// Windows prints "Received = 1" even when the reply is a router's
/// "Destination host unreachable", so that substring vetoes the match.
fn classify_windows(output: &str) -> bool {
    output.contains("received = 1") && !output.contains("unreachable")
}
