//! Crate-wide error type.
//!
//! Cache reads and writes are total — absence is a valid return, not a
//! failure — so the error type only covers the file-backed surfaces:
//! loading a [`CacheConfig`](crate::config::CacheConfig) and merging a
//! user-template file.

use std::path::PathBuf;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the fallible surfaces of the crate.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A config or template file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// Path of the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A config or template file contained invalid JSON.
    #[error("failed to parse {path}: {source}")]
    Parse {
        /// Path of the file that could not be parsed.
        path: PathBuf,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
}
