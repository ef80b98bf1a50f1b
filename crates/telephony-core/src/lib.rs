//! # telephony-core
//!
//! Core crate for the telephony daemon. Contains configuration schemas,
//! typed identifiers and the unified error system shared by the registry,
//! plugin loader and monitor crates.
//!
//! This crate has **no** internal dependencies on other telephony crates.

pub mod config;
pub mod error;
pub mod result;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
