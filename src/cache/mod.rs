//! LLM response caching with TTL expiry, hit accounting, and periodic sweep.

use std::time::{SystemTime, UNIX_EPOCH};

pub mod backend;
pub mod entry;
pub mod store;

pub use backend::{CacheBackend, MemoryBackend};
pub use entry::{CacheEntry, CacheStats};
pub use store::ResponseCache;

/// Current wall-clock time as unix seconds.
pub(crate) fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
