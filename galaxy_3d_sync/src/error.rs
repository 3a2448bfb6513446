//! Error types for the Galaxy3D scene synchronization engine
//!
//! Synchronization passes never fail as a whole: skip conditions, missing
//! properties and geometry job failures are all absorbed locally. These
//! errors surface only from construction (worker pool), from the geometry
//! converter and from lookups through stale entity handles.

use std::fmt;

/// Result type for Galaxy3D sync operations
pub type Result<T> = std::result::Result<T, Error>;

/// Galaxy3D sync errors
#[derive(Debug, Clone)]
pub enum Error {
    /// The geometry converter could not produce valid output
    ConversionFailed(String),

    /// Stale or unknown entity handle
    InvalidResource(String),

    /// The geometry worker pool could not be created or is unusable
    DispatcherError(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::ConversionFailed(msg) => write!(f, "Geometry conversion failed: {}", msg),
            Error::InvalidResource(msg) => write!(f, "Invalid resource: {}", msg),
            Error::DispatcherError(msg) => write!(f, "Geometry dispatcher error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

/// Log an error with file:line and build an `Error::InvalidResource` from it.
///
/// # Example
///
/// ```ignore
/// let object = objects.get(handle)
///     .ok_or_else(|| engine_err!("galaxy3d::SceneSync", "Object {:?} not found", handle))?;
/// ```
#[macro_export]
macro_rules! engine_err {
    ($source:expr, $($arg:tt)*) => {{
        let message = format!($($arg)*);
        $crate::engine_error!($source, "{}", message);
        $crate::galaxy3d::Error::InvalidResource(message)
    }};
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
