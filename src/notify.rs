//! Readiness notification for a service supervisor.

use tracing::{debug, warn};

const NOTIFY_SOCKET: &str = "NOTIFY_SOCKET";

/// Sends `READY=1` to `$NOTIFY_SOCKET`. No-op when the variable is unset.
#[cfg(unix)]
pub fn notify_ready() {
    use std::os::unix::net::UnixDatagram;

    let Some(path) = std::env::var_os(NOTIFY_SOCKET) else {
        debug!("No supervisor socket, skipping readiness notification");
        return;
    };

    // Abstract socket addresses are not supported.
    if path.to_string_lossy().starts_with('@') {
        warn!("Abstract notify socket not supported");
        return;
    }

    let result = UnixDatagram::unbound().and_then(|socket| socket.send_to(b"READY=1", &path));
    match result {
        Ok(_) => debug!("Readiness notification sent"),
        Err(e) => warn!(error = %e, "Failed to send readiness notification"),
    }
}

#[cfg(not(unix))]
pub fn notify_ready() {
    debug!(var = NOTIFY_SOCKET, "Readiness notification unsupported on this platform");
}
