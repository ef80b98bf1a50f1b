//! # telephony-monitor
//!
//! Introspection for a running daemon:
//!
//! - [`render_server_state`] walks the registry and renders a text snapshot
//! - [`MainLoop`] consumes dump/shutdown triggers at a safe point
//! - [`spawn_signal_listener`] maps process signals onto triggers
//! - [`ServerSlot`] is the process-wide, defensively read server handle

pub mod monitor;
pub mod signals;
pub mod slot;
pub mod trigger;

pub use monitor::{monitor_server_state, render_server_state, write_server_state};
pub use signals::spawn_signal_listener;
pub use slot::ServerSlot;
pub use trigger::{LoopExit, MainLoop, Trigger, TriggerSender, TriggerState};
