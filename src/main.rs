//! Pharos binary entry point.
//!
//! Wires configuration, the prober, and the event sink together and runs
//! the monitor until interrupted.

use clap::Parser;
use pharos::{ConfigError, Monitor, MonitorConfig, PingProber, TracingSink};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Pharos - Host Reachability Monitor
#[derive(Parser, Debug)]
#[command(name = "pharos", version, about, long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(
        short,
        long,
        default_value = "configs/config.yaml",
        env = "PHAROS_CONFIG"
    )]
    config: String,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,pharos=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Pharos - Host Reachability Monitor");

    let cli = Cli::parse();
    tracing::info!("Loading configuration from: {}", cli.config);

    // The probe timeout is fixed from the initial load; the device list and
    // interval are re-read every cycle.
    let initial = match MonitorConfig::load(&cli.config) {
        Ok(config) => config,
        Err(e) => fatal(&e),
    };
    tracing::info!(
        device_count = initial.devices.len(),
        interval_secs = initial.effective_interval().as_secs(),
        "Starting monitoring service"
    );

    let prober = PingProber::new(initial.probe_timeout);
    let monitor = Monitor::new(prober, TracingSink);

    let config_path = cli.config.clone();
    if let Err(e) = monitor
        .run(move || MonitorConfig::load(&config_path), shutdown_signal())
        .await
    {
        fatal(&e);
    }

    tracing::info!("Shutdown complete");
}

/// Log a fatal configuration error and exit non-zero.
fn fatal(error: &ConfigError) -> ! {
    tracing::error!(error = %error, "Fatal configuration error");
    std::process::exit(1);
}

/// Wait for an operator-initiated termination signal.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal");
        }
        _ = terminate => {
            tracing::info!("Received terminate signal");
        }
    }
}
