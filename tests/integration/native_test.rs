//! Descriptor contract tests with modules compiled into the test binary.

use std::collections::HashMap;
use std::ffi::c_void;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use telephony_monitor::render_server_state;
use telephony_plugin::ffi::abi::{PluginDefineDesc, PluginHandle};
use telephony_plugin::{DiscoveryMode, ModuleOpener, NativeModule, PluginError};
use telephony_server::{Module, PluginState};

use crate::helpers::{TestDaemon, manager};

static SIM_UNLOADS: AtomicUsize = AtomicUsize::new(0);

extern "C" fn sim_init(handle: *mut PluginHandle) -> bool {
    unsafe {
        let ok = ((*handle).set_property)(handle, c"sim".as_ptr(), c"state".as_ptr(), c"ready".as_ptr());
        ((*handle).set_user_data)(handle, 0xbeef as *mut c_void);
        ok
    }
}

extern "C" fn sim_unload(handle: *mut PluginHandle) {
    let data = unsafe { ((*handle).get_user_data)(handle) };
    if data as usize == 0xbeef {
        SIM_UNLOADS.fetch_add(1, Ordering::SeqCst);
    }
}

mod sim {
    use super::*;

    telephony_plugin::define_plugin! {
        name: "sim",
        version: 2,
        priority: 20,
        init: sim_init,
        unload: sim_unload,
    }
}

static NAMELESS: PluginDefineDesc = PluginDefineDesc {
    name: std::ptr::null(),
    priority: 0,
    version: 1,
    load: None,
    init: None,
    unload: None,
};

/// Serves compiled-in descriptors by file name.
struct StaticOpener {
    descriptors: HashMap<&'static str, &'static PluginDefineDesc>,
}

impl ModuleOpener for StaticOpener {
    fn open(&self, path: &Path) -> Result<Box<dyn Module>, PluginError> {
        let file_name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
        let desc = *self.descriptors.get(file_name).ok_or_else(|| PluginError::Open {
            path: path.to_path_buf(),
            reason: "no such unit".to_string(),
        })?;
        let module = NativeModule::from_static(desc).map_err(|reason| PluginError::Contract {
            path: path.to_path_buf(),
            reason,
        })?;
        Ok(Box::new(module))
    }
}

#[test]
fn test_native_descriptor_lifecycle() {
    let daemon = TestDaemon::with_files(&["sim.so", "broken.so"]);
    let opener = StaticOpener {
        descriptors: HashMap::from([
            ("sim.so", &sim::plugin_define_desc),
            ("broken.so", &NAMELESS),
        ]),
    };

    let report = manager(opener)
        .start(&daemon.server, daemon.path(), DiscoveryMode::Register)
        .expect("startup");

    assert_eq!(report.discovery.registered, vec![daemon.path().join("sim.so")]);
    assert_eq!(report.discovery.failures().count(), 1);

    let plugin = daemon.server.find_plugin("sim").expect("sim registered");
    assert_eq!(plugin.state(), PluginState::Initialized);
    assert_eq!(plugin.priority(), 20);
    assert_eq!(plugin.user_data_addr(), Some(0xbeef));
    let sim = plugin.core_object("sim").expect("core object");
    assert_eq!(sim.property("state").as_deref(), Some("ready"));

    let dump = render_server_state(&daemon.server);
    assert!(dump.contains(" - userdata: 0xbeef"));
    assert!(dump.contains(" - version: 2"));

    assert!(daemon.server.shutdown());
    assert_eq!(SIM_UNLOADS.load(Ordering::SeqCst), 1);
}
