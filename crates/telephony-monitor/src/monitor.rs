//! Registry introspection.
//!
//! Renders plugins, storages, communicators and transports (with their
//! pending-request queues) as text. The walk is read-only and takes one
//! short snapshot per collection, so a dump taken while the main loop
//! registers objects or drains queues may be torn across sections.

use std::fmt::{self, Write as _};
use std::io::Write as _;

use tracing::info;

use telephony_server::{PendingQueue, Server};

fn fmt_addr(addr: Option<usize>) -> String {
    match addr {
        Some(addr) => format!("{addr:#x}"),
        None => "(null)".to_string(),
    }
}

fn monitor_plugins(server: &Server, out: &mut impl fmt::Write) -> fmt::Result {
    writeln!(out, "-- Plugins --")?;

    for plugin in server.plugins() {
        writeln!(out, "Name: [{}]", plugin.name())?;
        writeln!(out, " - file: {}", plugin.filename().display())?;
        writeln!(out, " - id: {}", plugin.id())?;
        writeln!(out, " - version: {}", plugin.module().version())?;
        writeln!(out, " - priority: {}", plugin.priority())?;
        writeln!(out, " - state: {}", plugin.state())?;
        writeln!(out, " - userdata: {}", fmt_addr(plugin.user_data_addr()))?;

        for object in plugin.core_objects() {
            writeln!(out, " - object: [{}] {}", object.kind(), object.id())?;
            for (key, value) in object.properties() {
                writeln!(out, "     {key} = {value}")?;
            }
        }
        writeln!(out)?;
    }
    Ok(())
}

fn monitor_storages(server: &Server, out: &mut impl fmt::Write) -> fmt::Result {
    writeln!(out, "-- Storages --")?;

    for storage in server.storages() {
        writeln!(out, "Name: [{}]", storage.name())?;
        writeln!(out, " - id: {}", storage.id())?;
        writeln!(out)?;
    }
    Ok(())
}

fn monitor_communicators(server: &Server, out: &mut impl fmt::Write) -> fmt::Result {
    writeln!(out, "-- Communicators --")?;

    for comm in server.communicators() {
        let parent = comm
            .plugin()
            .map_or_else(|| "(none)".to_string(), |id| id.to_string());
        writeln!(out, "Name: [{}]", comm.name())?;
        writeln!(out, " - id: {}", comm.id())?;
        writeln!(out, " - parent_plugin: {parent}")?;
        writeln!(out, " - userdata: {}", fmt_addr(comm.user_data_addr()))?;
        writeln!(out)?;
    }
    Ok(())
}

fn monitor_queue(queue: &PendingQueue, out: &mut impl fmt::Write) -> fmt::Result {
    // One snapshot so the length always matches the listed entries.
    let entries = queue.peek_all();
    writeln!(out, " - queue length: {}", entries.len())?;

    for (index, pending) in entries.iter().enumerate() {
        let ur = match pending.user_request() {
            Some(ur) => format!("{} (command {:#010x})", ur.id(), ur.command()),
            None => "(none)".to_string(),
        };
        writeln!(
            out,
            "   [{index}] id: {}, ur: {ur}, data: {:p}, len: {}",
            pending.id(),
            pending.payload().as_ptr(),
            pending.payload().len()
        )?;
    }
    Ok(())
}

fn monitor_transports(server: &Server, out: &mut impl fmt::Write) -> fmt::Result {
    writeln!(out, "-- Transports --")?;

    for transport in server.transports() {
        writeln!(out, "Name: [{}]", transport.name())?;
        writeln!(out, " - id: {}", transport.id())?;
        writeln!(out, " - parent_plugin: {}", transport.plugin())?;
        writeln!(out, " - userdata: {}", fmt_addr(transport.user_data_addr()))?;
        match transport.queue() {
            Some(queue) => monitor_queue(queue, out)?,
            None => writeln!(out, " - queue: (none)")?,
        }
        writeln!(out)?;
    }
    Ok(())
}

/// Writes every section to `out`, stopping at the first write error.
pub fn write_server_state(server: &Server, out: &mut impl fmt::Write) -> fmt::Result {
    monitor_plugins(server, out)?;
    monitor_storages(server, out)?;
    monitor_communicators(server, out)?;
    monitor_transports(server, out)
}

/// Renders the full registry snapshot.
pub fn render_server_state(server: &Server) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_server_state(server, &mut out);
    out
}

/// Writes the registry snapshot to stderr.
pub fn monitor_server_state(server: &Server) {
    let snapshot = render_server_state(server);
    info!(plugins = server.plugin_count(), "Dumping server state");

    let mut stderr = std::io::stderr().lock();
    let _ = stderr.write_all(snapshot.as_bytes());
    let _ = stderr.flush();
}
