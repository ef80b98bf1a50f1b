//! Telephony daemon
//!
//! Loads capability modules from the plugin directory, initializes them and
//! serves the registry until a shutdown signal arrives.

use std::path::Path;
use std::process::ExitCode;

use tokio::task::JoinHandle;
use tracing_subscriber::{EnvFilter, fmt};

use telephony_core::AppResult;
use telephony_core::config::DaemonConfig;
use telephony_core::config::monitor::MonitorConfig;
use telephony_core::error::AppError;
use telephony_monitor::slot::ACTIVE_SERVER;
use telephony_monitor::{LoopExit, MainLoop, spawn_signal_listener};
use telephony_plugin::{DiscoveryMode, PluginManager};
use telephony_server::Server;

mod cli;
mod notify;

use cli::Cli;

#[tokio::main]
async fn main() -> ExitCode {
    let (cli, ignored) = match Cli::parse_lenient(std::env::args_os()) {
        Ok(parsed) => parsed,
        Err(e) => e.exit(),
    };

    // Handlers go in before anything else so an early SIGUSR1 is absorbed.
    // A dump requested while no server is installed does nothing.
    let (main_loop, triggers) = MainLoop::new(&ACTIVE_SERVER);
    let early_monitor = MonitorConfig::default();
    let listener = match spawn_signal_listener(triggers.clone(), &early_monitor) {
        Ok(handle) => handle,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let config = match DaemonConfig::load(cli.config.as_deref()) {
        Ok(c) => c.with_plugin_directory(cli.plugin_path.clone()),
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    init_logging(&config);

    if !ignored.is_empty() {
        tracing::debug!(arguments = ?ignored, "Ignoring unrecognized command-line arguments");
    }

    let listener = if config.monitor == early_monitor {
        listener
    } else {
        listener.abort();
        match spawn_signal_listener(triggers.clone(), &config.monitor) {
            Ok(handle) => handle,
            Err(e) => {
                tracing::error!(error = %e, "Daemon failed");
                return ExitCode::FAILURE;
            }
        }
    };

    drop(triggers);

    match run(config, cli.testload, main_loop, listener).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Daemon failed");
            ExitCode::FAILURE
        }
    }
}

/// Initialize tracing/logging
fn init_logging(config: &DaemonConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

async fn run(
    config: DaemonConfig,
    testload: bool,
    main_loop: MainLoop,
    listener: JoinHandle<()>,
) -> AppResult<()> {
    tracing::info!("Starting telephony daemon v{}", env!("CARGO_PKG_VERSION"));

    let server = Server::new();
    let manager = PluginManager::new(&config.plugins);
    let dir = Path::new(&config.plugins.directory);

    if testload {
        let report = manager.start(&server, dir, DiscoveryMode::DryRun);
        listener.abort();
        let report = report?;
        tracing::info!(
            validated = report.discovery.validated.len(),
            failed = report.discovery.failures().count(),
            "Plugin load test finished"
        );
        return Ok(());
    }

    ACTIVE_SERVER.install(server.clone());

    if let Err(e) = manager.start(&server, dir, DiscoveryMode::Register) {
        listener.abort();
        if let Some(server) = ACTIVE_SERVER.release() {
            server.shutdown();
        }
        return Err(e.into());
    }
    drop(server);

    notify::notify_ready();

    match main_loop.run().await {
        LoopExit::Shutdown => {
            tracing::info!("Telephony daemon shut down gracefully");
            Ok(())
        }
        LoopExit::Disconnected => Err(AppError::signal("Signal listener stopped unexpectedly")),
    }
}
