//! Introspection and trigger path tests.

use std::sync::atomic::Ordering;
use std::sync::{Arc, Mutex};

use bytes::Bytes;

use telephony_monitor::{LoopExit, MainLoop, ServerSlot, render_server_state};
use telephony_plugin::DiscoveryMode;
use telephony_plugin::mock::{MockOpener, ModuleScript};
use telephony_server::{Communicator, Server, Storage, Transport, UserRequest};

use crate::helpers::{SCENARIO_FILES, TestDaemon, manager, scenario_opener};

#[test]
fn test_zero_plugins_still_prints_every_section() {
    let server = Server::new();
    let dump = render_server_state(&server);

    let headers: Vec<&str> = dump.lines().filter(|l| l.starts_with("-- ")).collect();
    assert_eq!(
        headers,
        vec!["-- Plugins --", "-- Storages --", "-- Communicators --", "-- Transports --"]
    );
    assert!(!dump.contains("Name: ["));
}

#[test]
fn test_dump_after_startup_shows_loaded_plugins() {
    let daemon = TestDaemon::with_files(SCENARIO_FILES);
    manager(scenario_opener())
        .start(&daemon.server, daemon.path(), DiscoveryMode::Register)
        .expect("startup");

    let dump = render_server_state(&daemon.server);
    assert!(dump.contains("Name: [modA]"));
    assert!(dump.contains(" - state: initialized"));
    assert!(!dump.contains("modB"));
    assert!(!dump.contains("readme.txt"));
}

#[test]
fn test_dump_shows_properties_published_in_init() {
    let daemon = TestDaemon::with_files(&["atmodem.so"]);
    let opener = MockOpener::new().with_module(
        "atmodem.so",
        ModuleScript::new("atmodem")
            .with_property("modem", "power", "on")
            .with_property("modem", "imei", "350000000000001"),
    );
    manager(opener)
        .start(&daemon.server, daemon.path(), DiscoveryMode::Register)
        .expect("startup");

    let dump = render_server_state(&daemon.server);
    assert!(dump.contains(" - object: [modem] "));
    assert!(dump.contains("imei = 350000000000001"));
    assert!(dump.contains("power = on"));
}

#[test]
fn test_dump_does_not_drain_queues() {
    let daemon = TestDaemon::with_files(&["atmodem.so"]);
    manager(MockOpener::new().with_module("atmodem.so", ModuleScript::new("atmodem")))
        .start(&daemon.server, daemon.path(), DiscoveryMode::Register)
        .expect("startup");
    let plugin = daemon.server.find_plugin("atmodem").expect("registered");

    daemon.server.add_storage(Arc::new(Storage::new("vconf")));
    daemon
        .server
        .add_communicator(Arc::new(Communicator::new("dbus-tapi", None)));
    let transport = Arc::new(Transport::new("uart0", plugin.id()).with_queue());
    daemon.server.add_transport(Arc::clone(&transport));
    daemon
        .server
        .add_transport(Arc::new(Transport::new("virtual", plugin.id())));

    let queue = transport.queue().expect("queue");
    let ur = Arc::new(UserRequest::new(0x0201));
    queue.push(Some(ur), Bytes::from_static(b"AT+CGSN\r"));
    queue.push(None, Bytes::from_static(b"AT+CPIN?\r"));

    let first = render_server_state(&daemon.server);
    let second = render_server_state(&daemon.server);

    assert_eq!(queue.len(), 2);
    assert_eq!(first, second);
    assert!(first.contains(" - queue length: 2"));
    assert!(first.contains("(command 0x00000201)"));
    assert!(first.contains(" - queue: (none)"));
    assert!(first.contains(" - parent_plugin: (none)"));
    assert!(first.contains("Name: [vconf]"));
}

#[tokio::test]
async fn test_signal_path_dump_and_teardown() {
    static SLOT: ServerSlot = ServerSlot::new();

    let daemon = TestDaemon::with_files(&["a.so", "b.so"]);
    let opener = MockOpener::new()
        .with_module("a.so", ModuleScript::new("a"))
        .with_module("b.so", ModuleScript::new("b"));
    let a = opener.calls("a.so");
    manager(opener)
        .start(&daemon.server, daemon.path(), DiscoveryMode::Register)
        .expect("startup");
    SLOT.install(Arc::clone(&daemon.server));

    let dumps = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&dumps);
    let (main_loop, triggers) = MainLoop::new(&SLOT);
    let main_loop = main_loop.with_sink(move |server: &Server| {
        sink.lock().unwrap().push(render_server_state(server));
    });

    triggers.request_dump();
    triggers.request_shutdown();
    triggers.request_dump();

    assert_eq!(main_loop.run().await, LoopExit::Shutdown);

    let dumps = dumps.lock().unwrap();
    assert_eq!(dumps.len(), 1);
    assert!(dumps[0].contains("Name: [a]"));
    assert!(dumps[0].contains("Name: [b]"));
    assert!(SLOT.current().is_none());
    assert!(daemon.server.is_shut_down());
    assert_eq!(a.unload.load(Ordering::SeqCst), 1);
}
