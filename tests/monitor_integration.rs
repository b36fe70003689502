//! Integration tests for the pharos cycle runner.
//!
//! Drives `Monitor::run` end-to-end with a stub prober and a collecting
//! sink, under paused time for deterministic cadence assertions.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use pharos::{
    ConfigError, Device, EventSink, Monitor, MonitorConfig, MonitorEvent, ProbeOutcome, Prober,
};
use tokio::sync::oneshot;
use tokio::time::Instant;

// =============================================================================
// Test Helpers
// =============================================================================

/// Prober stub answering from a fixed address table.
///
/// Addresses absent from the table probe unreachable. Every call is
/// recorded with its (paused-clock) instant.
#[derive(Clone, Default)]
struct StubProber {
    verdicts: HashMap<String, bool>,
    calls: Arc<Mutex<Vec<(String, Instant)>>>,
}

impl StubProber {
    fn new<const N: usize>(verdicts: [(&str, bool); N]) -> Self {
        Self {
            verdicts: verdicts
                .into_iter()
                .map(|(addr, up)| (addr.to_string(), up))
                .collect(),
            calls: Arc::default(),
        }
    }

    fn probed_addresses(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(addr, _)| addr.clone())
            .collect()
    }

    fn probe_instants(&self) -> Vec<Instant> {
        self.calls.lock().unwrap().iter().map(|(_, at)| *at).collect()
    }
}

#[async_trait::async_trait]
impl Prober for StubProber {
    async fn probe(&self, address: &str) -> ProbeOutcome {
        self.calls
            .lock()
            .unwrap()
            .push((address.to_string(), Instant::now()));
        ProbeOutcome {
            reachable: self.verdicts.get(address).copied().unwrap_or(false),
            raw_output: None,
        }
    }
}

/// Sink collecting events for ordering assertions.
#[derive(Clone, Default)]
struct CollectingSink(Arc<Mutex<Vec<MonitorEvent>>>);

impl CollectingSink {
    fn events(&self) -> Vec<MonitorEvent> {
        self.0.lock().unwrap().clone()
    }

    fn shutdown_count(&self) -> usize {
        self.events()
            .iter()
            .filter(|e| matches!(e, MonitorEvent::ShuttingDown))
            .count()
    }
}

impl EventSink for CollectingSink {
    fn emit(&self, event: &MonitorEvent) {
        self.0.lock().unwrap().push(event.clone());
    }
}

// =============================================================================
// Cycle Event Stream Tests
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_single_cycle_event_sequence() {
    let prober = StubProber::new([("10.0.0.1", true), ("10.0.0.2", false)]);
    let sink = CollectingSink::default();
    let events = sink.clone();
    let (tx, rx) = oneshot::channel::<()>();

    let monitor = Monitor::new(prober, sink);
    let handle = tokio::spawn(async move {
        monitor
            .run(
                || {
                    Ok(MonitorConfig::new(vec![
                        Device::new("A", "10.0.0.1"),
                        Device::new("B", "10.0.0.2"),
                    ])
                    .with_interval_seconds(5))
                },
                async {
                    let _ = rx.await;
                },
            )
            .await
    });

    // Let the immediate first cycle complete, then stop during the idle wait.
    tokio::time::sleep(Duration::from_secs(1)).await;
    tx.send(()).unwrap();
    handle.await.unwrap().unwrap();

    let events = events.events();
    assert_eq!(events.len(), 5);
    assert!(matches!(
        events[0],
        MonitorEvent::CycleStarted { device_count: 2 }
    ));
    match (&events[1], &events[2]) {
        (MonitorEvent::DeviceProbed(a), MonitorEvent::DeviceProbed(b)) => {
            assert_eq!(a.device.name, "A");
            assert_eq!(a.device.address, "10.0.0.1");
            assert!(a.reachable);
            assert_eq!(b.device.name, "B");
            assert_eq!(b.device.address, "10.0.0.2");
            assert!(!b.reachable);
        }
        other => panic!("unexpected events: {other:?}"),
    }
    assert!(matches!(events[3], MonitorEvent::CycleCompleted));
    assert!(matches!(events[4], MonitorEvent::ShuttingDown));
}

#[tokio::test(start_paused = true)]
async fn test_unreachable_device_never_aborts_cycle() {
    // Both devices are absent from the verdict table, so both probe NOK;
    // the cycle still visits each and closes with a separator.
    let prober = StubProber::new([]);
    let calls = prober.clone();
    let sink = CollectingSink::default();
    let events = sink.clone();
    let (tx, rx) = oneshot::channel::<()>();

    let monitor = Monitor::new(prober, sink);
    let handle = tokio::spawn(async move {
        monitor
            .run(
                || {
                    Ok(MonitorConfig::new(vec![
                        Device::new("down-1", "10.0.0.1"),
                        Device::new("down-2", "10.0.0.2"),
                    ])
                    .with_interval_seconds(5))
                },
                async {
                    let _ = rx.await;
                },
            )
            .await
    });

    tokio::time::sleep(Duration::from_secs(1)).await;
    tx.send(()).unwrap();
    handle.await.unwrap().unwrap();

    assert_eq!(calls.probed_addresses(), vec!["10.0.0.1", "10.0.0.2"]);
    assert!(
        events
            .events()
            .iter()
            .any(|e| matches!(e, MonitorEvent::CycleCompleted))
    );
}

// =============================================================================
// Configuration Reload Tests
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_device_list_reload_takes_effect_next_cycle() {
    let prober = StubProber::new([]);
    let calls = prober.clone();
    let sink = CollectingSink::default();
    let (tx, rx) = oneshot::channel::<()>();

    let monitor = Monitor::new(prober, sink);
    let mut loads = 0;
    let handle = tokio::spawn(async move {
        monitor
            .run(
                move || {
                    loads += 1;
                    let devices = if loads == 1 {
                        vec![
                            Device::new("old-a", "10.0.0.1"),
                            Device::new("old-b", "10.0.0.2"),
                        ]
                    } else {
                        vec![Device::new("new", "10.0.9.9")]
                    };
                    Ok(MonitorConfig::new(devices).with_interval_seconds(5))
                },
                async {
                    let _ = rx.await;
                },
            )
            .await
    });

    // First cycle probes the old list; the cycle at t+5s probes the new one.
    tokio::time::sleep(Duration::from_secs(6)).await;
    tx.send(()).unwrap();
    handle.await.unwrap().unwrap();

    assert_eq!(
        calls.probed_addresses(),
        vec!["10.0.0.1", "10.0.0.2", "10.0.9.9"]
    );
}

#[tokio::test(start_paused = true)]
async fn test_config_file_rewrite_between_cycles() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    std::fs::write(
        &path,
        "interval_seconds: 5\ndevices:\n  - name: a\n    ip: 10.0.0.1\n",
    )
    .unwrap();

    let prober = StubProber::new([]);
    let calls = prober.clone();
    let sink = CollectingSink::default();
    let (tx, rx) = oneshot::channel::<()>();

    let monitor = Monitor::new(prober, sink);
    let provider_path = path.clone();
    let handle = tokio::spawn(async move {
        monitor
            .run(move || MonitorConfig::load(&provider_path), async {
                let _ = rx.await;
            })
            .await
    });

    tokio::time::sleep(Duration::from_secs(1)).await;
    std::fs::write(
        &path,
        "interval_seconds: 5\ndevices:\n  - name: b\n    ip: 10.0.0.2\n",
    )
    .unwrap();

    tokio::time::sleep(Duration::from_secs(5)).await;
    tx.send(()).unwrap();
    handle.await.unwrap().unwrap();

    assert_eq!(calls.probed_addresses(), vec!["10.0.0.1", "10.0.0.2"]);
}

#[tokio::test(start_paused = true)]
async fn test_interval_change_reschedules_cadence() {
    let prober = StubProber::new([("10.0.0.1", true)]);
    let calls = prober.clone();
    let sink = CollectingSink::default();
    let (tx, rx) = oneshot::channel::<()>();

    let monitor = Monitor::new(prober, sink);
    let mut loads = 0;
    let handle = tokio::spawn(async move {
        monitor
            .run(
                move || {
                    loads += 1;
                    let secs = if loads == 1 { 5 } else { 2 };
                    Ok(
                        MonitorConfig::new(vec![Device::new("a", "10.0.0.1")])
                            .with_interval_seconds(secs),
                    )
                },
                async {
                    let _ = rx.await;
                },
            )
            .await
    });

    // Cycle 1 at t, cycle 2 at t+5s; the reload at t+5s rebuilds the
    // cadence, so cycle 3 lands at t+7s.
    tokio::time::sleep(Duration::from_secs(8)).await;
    tx.send(()).unwrap();
    handle.await.unwrap().unwrap();

    let instants = calls.probe_instants();
    assert_eq!(instants.len(), 3);
    assert_eq!(instants[1] - instants[0], Duration::from_secs(5));
    assert_eq!(instants[2] - instants[1], Duration::from_secs(2));
}

// =============================================================================
// Failure and Shutdown Tests
// =============================================================================

#[tokio::test]
async fn test_missing_devices_key_is_fatal_with_zero_probes() {
    let prober = StubProber::new([]);
    let calls = prober.clone();
    let sink = CollectingSink::default();
    let events = sink.clone();

    let monitor = Monitor::new(prober, sink);
    let result = monitor
        .run(
            || {
                serde_yaml::from_str::<MonitorConfig>("interval_seconds: 5")
                    .map_err(ConfigError::from)
            },
            std::future::pending(),
        )
        .await;

    let err = result.unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
    assert!(err.to_string().contains("devices"));
    assert!(calls.probed_addresses().is_empty());
    assert!(events.events().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_during_idle_wait() {
    let prober = StubProber::new([("10.0.0.1", true)]);
    let calls = prober.clone();
    let sink = CollectingSink::default();
    let events = sink.clone();
    let (tx, rx) = oneshot::channel::<()>();

    let monitor = Monitor::new(prober, sink);
    let handle = tokio::spawn(async move {
        monitor
            .run(
                || {
                    Ok(
                        MonitorConfig::new(vec![Device::new("a", "10.0.0.1")])
                            .with_interval_seconds(30),
                    )
                },
                async {
                    let _ = rx.await;
                },
            )
            .await
    });

    // One immediate cycle, then the loop idles until t+30s. The stop signal
    // must end the run without waiting out the interval.
    tokio::time::sleep(Duration::from_secs(1)).await;
    tx.send(()).unwrap();
    let result = handle.await.unwrap();

    assert!(result.is_ok());
    assert_eq!(calls.probed_addresses().len(), 1);
    assert_eq!(events.shutdown_count(), 1);
}
