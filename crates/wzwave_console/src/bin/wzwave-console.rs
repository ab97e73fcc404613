//! WZWave Console - drive a Z-Wave controller from the terminal.

use std::io::{self, BufReader};
use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info, warn};

use wzwave_config::{FileProvider, WZWaveConfig};
use wzwave_console::{Console, ShutdownOutcome, Terminal, telemetry};
use wzwave_controller::{SimulatedController, SimulatedControllerConfig, ZWaveController};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file (defaults to ./config.yaml when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Serial device of the Z-Wave controller
    #[arg(long)]
    serial_port: Option<String>,

    /// Directory for the controller's node storage
    #[arg(long)]
    storage: Option<PathBuf>,

    #[arg(long, default_value = "false")]
    debug: bool,
}

#[tokio::main]
async fn main() {
    if let Err(e) = run(Args::parse()).await {
        error!("{:#}", e);
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

async fn run(args: Args) -> anyhow::Result<()> {
    let config = load_config(&args)?;
    telemetry::init_logging(&config.logging)?;

    let controller = Arc::new(SimulatedController::new(SimulatedControllerConfig {
        serial_port: config.controller.serial_port.clone(),
        storage_dir: config.controller.storage_dir.clone(),
        ..Default::default()
    }));

    let console = Console::new(controller.clone(), Terminal::stdio()).with_config(&config.console);
    controller.add_listener(Arc::new(console.event_sink()));

    let mut handle = console
        .start(BufReader::new(io::stdin()))
        .context("Failed to start console input")?;

    let signalled = tokio::select! {
        _ = handle.closed() => false,
        _ = shutdown_signal() => true,
    };

    if signalled {
        info!("Termination signal received");
        if handle.shutdown("termination signal").await == ShutdownOutcome::Forced {
            warn!("Console loop had to be aborted");
        }
    }

    println!("\rConsole closed.");
    Ok(())
}

fn load_config(args: &Args) -> anyhow::Result<WZWaveConfig> {
    let mut config = FileProvider::load_or_default(args.config.as_deref())
        .context("Failed to load configuration")?;

    if let Some(serial_port) = &args.serial_port {
        config.controller.serial_port = serial_port.clone();
    }
    if let Some(storage) = &args.storage {
        config.controller.storage_dir = storage.clone();
    }
    config.logging.debug |= args.debug;

    Ok(config)
}

/// Resolves on Ctrl-C, or on SIGTERM / SIGHUP where those exist. SIGHUP is
/// what a closed terminal sends.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::SignalKind;

        tokio::select! {
            _ = unix_signal(SignalKind::terminate(), "SIGTERM") => {}
            _ = unix_signal(SignalKind::hangup(), "SIGHUP") => {}
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}

#[cfg(unix)]
async fn unix_signal(kind: tokio::signal::unix::SignalKind, name: &str) {
    match tokio::signal::unix::signal(kind) {
        Ok(mut stream) => {
            stream.recv().await;
            info!("Received {}", name);
        }
        Err(e) => {
            error!("Failed to listen for {}: {}", name, e);
            std::future::pending::<()>().await;
        }
    }
}
