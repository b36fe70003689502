//! The polling loop: immediate first cycle, then fixed-cadence repeats.

use std::future::Future;
use std::pin::Pin;

use tokio::time::{self, MissedTickBehavior};

use crate::config::{ConfigError, MonitorConfig};
use crate::monitor::event::{MonitorEvent, ProbeResult};
use crate::monitor::sink::EventSink;
use crate::probe::Prober;

/// The scheduler/cycle runner.
///
/// Owns nothing between cycles except the prober and the sink: the
/// configuration is re-acquired from the provider at the start of every
/// cycle, so device-list edits take effect without a restart.
pub struct Monitor<P, S> {
    prober: P,
    sink: S,
}

impl<P, S> std::fmt::Debug for Monitor<P, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Monitor").finish_non_exhaustive()
    }
}

impl<P: Prober, S: EventSink> Monitor<P, S> {
    /// Create a monitor over the given prober and event sink.
    pub fn new(prober: P, sink: S) -> Self {
        Self { prober, sink }
    }

    /// Run cycles until the shutdown future resolves.
    ///
    /// The first cycle runs immediately; subsequent cycles fire on a fixed
    /// cadence measured from scheduling, with missed ticks skipped rather
    /// than queued (at most one cycle at a time). The provider is invoked
    /// once per cycle; a load failure at any cycle boundary is fatal and
    /// propagates out. Interval changes reschedule the cadence from the
    /// cycle that observes them.
    pub async fn run<F>(
        &self,
        mut provider: impl FnMut() -> Result<MonitorConfig, ConfigError>,
        shutdown: F,
    ) -> Result<(), ConfigError>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        let mut config = provider()?;
        let mut cadence = config.effective_interval();
        tracing::info!(
            device_count = config.devices.len(),
            interval_secs = cadence.as_secs(),
            "Monitor scheduled"
        );

        let mut ticker = time::interval(cadence);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut first_cycle = true;

        loop {
            tokio::select! {
                biased;
                () = &mut shutdown => break,
                _ = ticker.tick() => {}
            }

            if first_cycle {
                // The ticker's first tick completes immediately, so
                // operators get instant feedback on startup.
                first_cycle = false;
            } else {
                config = provider()?;
                let interval = config.effective_interval();
                if interval != cadence {
                    tracing::info!(
                        old_secs = cadence.as_secs(),
                        new_secs = interval.as_secs(),
                        "Ping interval changed, rescheduling"
                    );
                    cadence = interval;
                    ticker = time::interval_at(time::Instant::now() + cadence, cadence);
                    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
                }
            }

            if !self.cycle(&config, shutdown.as_mut()).await {
                break;
            }
        }

        self.sink.emit(&MonitorEvent::ShuttingDown);
        Ok(())
    }

    /// Probe every configured device in order.
    ///
    /// A single device's failure never aborts the remainder of the cycle.
    /// Returns `false` when the shutdown future resolved mid-cycle; the
    /// in-flight probe is abandoned and its process killed.
    async fn cycle<F>(&self, config: &MonitorConfig, mut shutdown: Pin<&mut F>) -> bool
    where
        F: Future<Output = ()>,
    {
        self.sink.emit(&MonitorEvent::CycleStarted {
            device_count: config.devices.len(),
        });

        for device in &config.devices {
            let outcome = tokio::select! {
                biased;
                () = &mut shutdown => return false,
                outcome = self.prober.probe(&device.address) => outcome,
            };

            let result = ProbeResult::new(device.clone(), outcome.reachable, outcome.raw_output);
            self.sink.emit(&MonitorEvent::DeviceProbed(result));
        }

        self.sink.emit(&MonitorEvent::CycleCompleted);
        true
    }
}
