//! End-to-end tests: discovery, initialization, introspection and teardown.

mod binary_test;
mod helpers;
mod monitor_test;
mod native_test;
mod startup_test;
