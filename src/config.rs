//! Cache configuration.
//!
//! The owner constructs a [`CacheConfig`] (or loads one from a JSON file) and
//! passes it to [`ResponseCache::new`](crate::cache::ResponseCache::new).
//! Nothing in this crate reads environment variables or well-known paths.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Tuning knobs for a [`ResponseCache`](crate::cache::ResponseCache).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// TTL applied by `set` when the caller does not pick one explicitly.
    pub default_ttl_minutes: u64,
    /// Period of the background sweep that bulk-removes expired entries.
    pub sweep_interval_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            default_ttl_minutes: 60,
            sweep_interval_secs: 300,
        }
    }
}

impl CacheConfig {
    /// Load a config from a JSON file.
    ///
    /// Missing fields fall back to their defaults, so a partial file such as
    /// `{"sweep_interval_secs": 60}` is valid.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&data).map_err(|source| Error::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Sweep period as a [`Duration`].
    ///
    /// Clamped to a minimum of 1 second — a zero period would make the
    /// sweeper spin.
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs.max(1))
    }
}
