//! Event sink seam between the cycle runner and the log stream.

use crate::monitor::event::MonitorEvent;

/// Abstract "emit structured event" capability.
///
/// The runner is written against this seam: production wires it to the
/// tracing stream, tests collect events for ordering assertions. Log
/// destinations and rotation are the subscriber's concern, not the
/// monitor's.
pub trait EventSink: Send + Sync + 'static {
    /// Deliver one event.
    fn emit(&self, event: &MonitorEvent);
}

/// Production sink writing events to the `tracing` subscriber.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&self, event: &MonitorEvent) {
        match event {
            MonitorEvent::CycleStarted { device_count } => {
                tracing::info!(device_count = *device_count, "{event}");
            }
            MonitorEvent::DeviceProbed(result) => {
                tracing::debug!(
                    device = %result.device.name,
                    address = %result.device.address,
                    reachable = result.reachable,
                    "{event}"
                );
            }
            MonitorEvent::CycleCompleted => tracing::debug!("{event}"),
            MonitorEvent::ShuttingDown => tracing::info!("{event}"),
        }
    }
}
