//! Convenience result type alias for the daemon.

use crate::error::AppError;

/// A specialized `Result` type for daemon operations.
pub type AppResult<T> = Result<T, AppError>;
