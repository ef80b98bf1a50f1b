//! Convenience macros for plugin development.

/// Exports a `plugin_define_desc` static for a plugin written in Rust.
///
/// Build the plugin as a `cdylib`; the daemon resolves the static by name.
/// `load`, `init` and `unload` are optional and must be given in that order.
///
/// # Example
/// ```rust,ignore
/// extern "C" fn init(handle: *mut PluginHandle) -> bool { true }
///
/// telephony_plugin::define_plugin! {
///     name: "atmodem",
///     version: 1,
///     priority: 100,
///     init: init,
/// }
/// ```
#[macro_export]
macro_rules! define_plugin {
    (
        name: $name:literal,
        version: $version:expr,
        priority: $priority:expr
        $(, load: $load:expr)?
        $(, init: $init:expr)?
        $(, unload: $unload:expr)?
        $(,)?
    ) => {
        #[unsafe(no_mangle)]
        #[allow(non_upper_case_globals)]
        pub static plugin_define_desc: $crate::ffi::abi::PluginDefineDesc =
            $crate::ffi::abi::PluginDefineDesc {
                name: concat!($name, "\0").as_ptr() as *const ::std::os::raw::c_char,
                priority: $priority,
                version: $version,
                load: $crate::__plugin_callback!($crate::ffi::abi::LoadFn; $($load)?),
                init: $crate::__plugin_callback!($crate::ffi::abi::InitFn; $($init)?),
                unload: $crate::__plugin_callback!($crate::ffi::abi::UnloadFn; $($unload)?),
            };
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __plugin_callback {
    ($ty:ty;) => {
        None
    };
    ($ty:ty; $f:expr) => {
        Some($f as $ty)
    };
}
