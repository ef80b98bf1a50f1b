//! Trigger path and main loop.
//!
//! Signal handlers never touch the registry. They only enqueue a
//! [`Trigger`]; the [`MainLoop`] picks it up and runs the monitor or the
//! teardown from ordinary async context.

use std::fmt;

use tokio::sync::{mpsc, watch};
use tracing::{debug, info};

use telephony_server::Server;

use crate::monitor::monitor_server_state;
use crate::slot::ServerSlot;

/// An externally requested action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Render a registry snapshot.
    Dump,
    /// Stop the main loop and release the registry.
    Shutdown,
}

/// Observable state of the main loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerState {
    /// Waiting for triggers.
    Idle,
    /// A dump is being rendered.
    DumpRequested,
    /// Teardown started. Terminal.
    ShuttingDown,
}

impl fmt::Display for TriggerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::DumpRequested => write!(f, "dump-requested"),
            Self::ShuttingDown => write!(f, "shutting-down"),
        }
    }
}

/// Why [`MainLoop::run`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopExit {
    /// A shutdown trigger was received.
    Shutdown,
    /// Every sender was dropped.
    Disconnected,
}

/// Cloneable, non-blocking handle for raising triggers.
#[derive(Debug, Clone)]
pub struct TriggerSender {
    tx: mpsc::UnboundedSender<Trigger>,
}

impl TriggerSender {
    /// Queues a dump. Returns `false` once the loop has exited.
    pub fn request_dump(&self) -> bool {
        self.tx.send(Trigger::Dump).is_ok()
    }

    /// Queues a shutdown. Returns `false` once the loop has exited.
    pub fn request_shutdown(&self) -> bool {
        self.tx.send(Trigger::Shutdown).is_ok()
    }
}

type DumpSink = Box<dyn FnMut(&Server) + Send>;

/// Consumes triggers until shutdown.
pub struct MainLoop {
    slot: &'static ServerSlot,
    rx: mpsc::UnboundedReceiver<Trigger>,
    state: watch::Sender<TriggerState>,
    sink: DumpSink,
}

impl fmt::Debug for MainLoop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MainLoop")
            .field("state", &*self.state.borrow())
            .finish_non_exhaustive()
    }
}

impl MainLoop {
    /// Creates a loop reading the server from `slot`. Dumps go to stderr.
    pub fn new(slot: &'static ServerSlot) -> (Self, TriggerSender) {
        let (tx, rx) = mpsc::unbounded_channel();
        let (state, _) = watch::channel(TriggerState::Idle);
        let main_loop = Self {
            slot,
            rx,
            state,
            sink: Box::new(monitor_server_state),
        };
        (main_loop, TriggerSender { tx })
    }

    /// Replaces the dump output.
    pub fn with_sink(mut self, sink: impl FnMut(&Server) + Send + 'static) -> Self {
        self.sink = Box::new(sink);
        self
    }

    /// Subscribes to state transitions.
    pub fn subscribe(&self) -> watch::Receiver<TriggerState> {
        self.state.subscribe()
    }

    /// Runs until a shutdown trigger arrives or every sender is gone.
    /// Either way the registry is torn down before returning.
    pub async fn run(mut self) -> LoopExit {
        info!("Main loop running");

        let exit = loop {
            match self.rx.recv().await {
                Some(Trigger::Dump) => self.dump(),
                Some(Trigger::Shutdown) => break LoopExit::Shutdown,
                None => break LoopExit::Disconnected,
            }
        };

        self.teardown();
        info!(exit = ?exit, "Main loop stopped");
        exit
    }

    fn dump(&mut self) {
        self.state.send_replace(TriggerState::DumpRequested);

        // The trigger may race startup or teardown.
        match self.slot.current() {
            Some(server) => (self.sink)(&*server),
            None => debug!("Dump requested without an active server"),
        }

        self.state.send_replace(TriggerState::Idle);
    }

    fn teardown(&mut self) {
        self.state.send_replace(TriggerState::ShuttingDown);
        self.rx.close();

        let Some(server) = self.slot.release() else {
            debug!("No active server to release");
            return;
        };
        if server.shutdown() {
            info!("Server resources released");
        }
    }
}
