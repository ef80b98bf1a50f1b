//! Startup sequence tests.

use std::path::Path;
use std::sync::atomic::Ordering;

use telephony_core::config::plugin::{InitOrder, PluginConfig};
use telephony_core::error::{AppError, ErrorKind};
use telephony_plugin::discovery::SkipReason;
use telephony_plugin::mock::{MockOpener, ModuleScript};
use telephony_plugin::{DiscoveryMode, DynamicLoader, PluginError, PluginManager};
use telephony_server::{PluginState, Server};

use crate::helpers::{SCENARIO_FILES, TestDaemon, manager, scenario_opener};

#[test]
fn test_normal_startup_registers_accepted_modules_only() {
    let daemon = TestDaemon::with_files(SCENARIO_FILES);
    let opener = scenario_opener();
    let a = opener.calls("modA.so");
    let b = opener.calls("modB.so");
    let core = opener.calls("libcore.so");

    let report = manager(opener)
        .start(&daemon.server, daemon.path(), DiscoveryMode::Register)
        .expect("startup");

    assert_eq!(daemon.server.plugin_count(), 1);
    let plugin = daemon.server.find_plugin("modA").expect("modA registered");
    assert_eq!(plugin.state(), PluginState::Initialized);
    assert_eq!(a.init.load(Ordering::SeqCst), 1);

    // modB declined in load and was closed again.
    assert_eq!(b.load.load(Ordering::SeqCst), 1);
    assert_eq!(b.init.load(Ordering::SeqCst), 0);
    assert_eq!(b.closed.load(Ordering::SeqCst), 1);
    assert!(daemon.server.find_plugin("modB").is_none());

    // The internal library is never opened.
    assert_eq!(core.opened.load(Ordering::SeqCst), 0);

    assert_eq!(report.discovery.skipped.len(), 3);
    let failures: Vec<_> = report.discovery.failures().collect();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].path, daemon.path().join("modB.so"));
    assert!(matches!(
        failures[0].reason,
        SkipReason::Failed(PluginError::LoadRejected { .. })
    ));
}

#[test]
fn test_dry_run_validates_without_registering() {
    let daemon = TestDaemon::with_files(SCENARIO_FILES);
    let opener = scenario_opener();
    let a = opener.calls("modA.so");
    let b = opener.calls("modB.so");

    let report = manager(opener)
        .start(&daemon.server, daemon.path(), DiscoveryMode::DryRun)
        .expect("dry run");

    assert_eq!(daemon.server.plugin_count(), 0);
    assert!(report.init.is_none());
    assert_eq!(report.discovery.validated.len(), 2);
    for calls in [&a, &b] {
        assert_eq!(calls.opened.load(Ordering::SeqCst), 1);
        assert_eq!(calls.closed.load(Ordering::SeqCst), 1);
        assert_eq!(calls.init.load(Ordering::SeqCst), 0);
    }
}

#[test]
fn test_missing_directory_aborts_startup() {
    let server = Server::new();
    let err = manager(MockOpener::new())
        .start(&server, Path::new("/nonexistent/telephony/plugins"), DiscoveryMode::Register)
        .expect_err("missing directory is fatal");

    assert!(matches!(err, PluginError::Directory { .. }));
    assert_eq!(server.plugin_count(), 0);

    let app: AppError = err.into();
    assert_eq!(app.kind, ErrorKind::NotFound);
}

#[test]
fn test_failed_init_keeps_others_running() {
    let daemon = TestDaemon::with_files(&["a.so", "b.so", "c.so"]);
    let opener = MockOpener::new()
        .with_module("a.so", ModuleScript::new("a"))
        .with_module("b.so", ModuleScript::new("b").fail_init())
        .with_module("c.so", ModuleScript::new("c"));

    let report = manager(opener)
        .start(&daemon.server, daemon.path(), DiscoveryMode::Register)
        .expect("startup");

    let init = report.init.expect("initializer ran");
    assert_eq!(init.initialized, vec!["a", "c"]);
    assert_eq!(init.failed.len(), 1);
    assert_eq!(daemon.server.plugin_count(), 3);
    assert_eq!(
        daemon.server.find_plugin("b").expect("b stays").state(),
        PluginState::InitFailed
    );
}

#[test]
fn test_priority_controls_init_but_not_registration() {
    let daemon = TestDaemon::with_files(&["call.so", "modem.so", "network.so"]);
    let opener = MockOpener::new()
        .with_module("call.so", ModuleScript::new("call").priority(300))
        .with_module("modem.so", ModuleScript::new("modem").priority(100))
        .with_module("network.so", ModuleScript::new("network").priority(200));
    let journal = opener.journal();

    manager(opener)
        .start(&daemon.server, daemon.path(), DiscoveryMode::Register)
        .expect("startup");

    let registered: Vec<String> = daemon
        .server
        .plugins()
        .iter()
        .map(|p| p.name().to_string())
        .collect();
    assert_eq!(registered, vec!["call", "modem", "network"]);
    assert_eq!(*journal.lock().unwrap(), vec!["modem", "network", "call"]);
}

#[test]
fn test_registration_order_config() {
    let daemon = TestDaemon::with_files(&["call.so", "modem.so"]);
    let opener = MockOpener::new()
        .with_module("call.so", ModuleScript::new("call").priority(300))
        .with_module("modem.so", ModuleScript::new("modem").priority(100));
    let journal = opener.journal();
    let config = PluginConfig {
        init_order: InitOrder::Registration,
        ..PluginConfig::default()
    };

    PluginManager::with_loader(&config, DynamicLoader::new(Box::new(opener)))
        .start(&daemon.server, daemon.path(), DiscoveryMode::Register)
        .expect("startup");

    assert_eq!(*journal.lock().unwrap(), vec!["call", "modem"]);
}

#[test]
fn test_shutdown_unloads_in_reverse_order() {
    let daemon = TestDaemon::with_files(&["a.so", "b.so", "c.so"]);
    let opener = MockOpener::new()
        .with_module("a.so", ModuleScript::new("a"))
        .with_module("b.so", ModuleScript::new("b").priority(50))
        .with_module("c.so", ModuleScript::new("c"));
    let a = opener.calls("a.so");
    let b = opener.calls("b.so");
    let c = opener.calls("c.so");
    let unloads = opener.unload_journal();

    manager(opener)
        .start(&daemon.server, daemon.path(), DiscoveryMode::Register)
        .expect("startup");

    assert!(daemon.server.shutdown());
    assert!(!daemon.server.shutdown());
    assert_eq!(daemon.server.plugin_count(), 0);
    // Reverse registration order, independent of init priority.
    assert_eq!(*unloads.lock().unwrap(), vec!["c", "b", "a"]);
    for calls in [&a, &b, &c] {
        assert_eq!(calls.unload.load(Ordering::SeqCst), 1);
        assert_eq!(calls.closed.load(Ordering::SeqCst), 1);
    }
}
