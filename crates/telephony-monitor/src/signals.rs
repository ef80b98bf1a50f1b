//! Maps process signals onto [`Trigger`](crate::Trigger)s.

use tokio::task::JoinHandle;
use tracing::{info, warn};

use telephony_core::config::monitor::MonitorConfig;
use telephony_core::AppResult;

use crate::trigger::TriggerSender;

/// Installs the signal handlers and spawns the listener task.
///
/// `SIGUSR1` requests a dump, `SIGTERM` and `SIGINT` request shutdown.
/// `SIGHUP` and `SIGPIPE` are only logged. The task ends after forwarding
/// a shutdown request.
#[cfg(unix)]
pub fn spawn_signal_listener(
    triggers: TriggerSender,
    config: &MonitorConfig,
) -> AppResult<JoinHandle<()>> {
    use telephony_core::error::AppError;
    use tokio::signal::unix::{Signal, SignalKind, signal};

    fn install(kind: SignalKind, name: &str) -> AppResult<Signal> {
        signal(kind).map_err(|e| {
            AppError::signal(format!("Failed to install {name} handler: {e}"))
        })
    }

    let mut usr1 = install(SignalKind::user_defined1(), "SIGUSR1")?;
    let mut term = install(SignalKind::terminate(), "SIGTERM")?;
    let mut int = install(SignalKind::interrupt(), "SIGINT")?;
    let (mut hup, mut pipe) = if config.log_diagnostic_signals {
        (
            Some(install(SignalKind::hangup(), "SIGHUP")?),
            Some(install(SignalKind::pipe(), "SIGPIPE")?),
        )
    } else {
        (None, None)
    };
    let dump_on_signal = config.dump_on_signal;

    async fn recv_optional(signal: &mut Option<Signal>) -> Option<()> {
        match signal {
            Some(signal) => signal.recv().await,
            None => std::future::pending().await,
        }
    }

    Ok(tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = usr1.recv() => {
                    if dump_on_signal {
                        info!(signal = "SIGUSR1", "Dump requested");
                        triggers.request_dump();
                    } else {
                        info!(signal = "SIGUSR1", "Dump on signal disabled, ignoring");
                    }
                }
                _ = term.recv() => {
                    info!(signal = "SIGTERM", "Shutdown requested");
                    triggers.request_shutdown();
                    break;
                }
                _ = int.recv() => {
                    info!(signal = "SIGINT", "Shutdown requested");
                    triggers.request_shutdown();
                    break;
                }
                _ = recv_optional(&mut hup) => warn!(signal = "SIGHUP", "Signal received"),
                _ = recv_optional(&mut pipe) => warn!(signal = "SIGPIPE", "Signal received"),
            }
        }
    }))
}

/// Installs the Ctrl+C handler and spawns the listener task.
#[cfg(not(unix))]
pub fn spawn_signal_listener(
    triggers: TriggerSender,
    _config: &MonitorConfig,
) -> AppResult<JoinHandle<()>> {
    Ok(tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!(signal = "ctrl-c", "Shutdown requested");
                triggers.request_shutdown();
            }
            Err(e) => warn!(error = %e, "Failed to listen for Ctrl+C"),
        }
    }))
}
