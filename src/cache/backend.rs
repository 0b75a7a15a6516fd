//! Storage backends for the response cache.
//!
//! [`CacheBackend`] is the substitution seam for a networked store: the
//! operations are compound (fetch-and-account, bulk sweep, filtered clear)
//! rather than raw get/put, so a remote implementation can keep each
//! read-modify-write sequence atomic on the server side. [`MemoryBackend`]
//! is the process-memory default.

use async_trait::async_trait;
use dashmap::DashMap;
use tracing::debug;

use super::entry::CacheEntry;
use crate::model::AiModel;

/// Entry storage behind a [`ResponseCache`](super::ResponseCache).
///
/// Implementations must make each operation atomic with respect to the
/// affected keys: `fetch`'s check-expiry/remove/increment sequence in
/// particular must not lose hit-count increments or observe a half-evicted
/// entry under concurrent calls.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CacheBackend: Send + Sync {
    /// Look up a key at time `now`.
    ///
    /// Removes the entry and returns `None` when it is past expiry (lazy
    /// eviction); increments the hit count and returns the entry when live.
    async fn fetch(&self, key: &str, now: u64) -> Option<CacheEntry>;

    /// Insert an entry under its own key, unconditionally overwriting any
    /// existing entry (last-write-wins).
    async fn store(&self, entry: CacheEntry);

    /// Remove every entry past expiry at time `now`. Returns the number
    /// removed.
    async fn sweep(&self, now: u64) -> usize;

    /// Remove all entries unconditionally.
    async fn clear(&self);

    /// Remove every entry produced by `model`, leaving others untouched.
    /// Returns the number removed.
    async fn clear_model(&self, model: AiModel) -> usize;

    /// Clone out all entries, live or not, for scan-based accounting.
    async fn snapshot(&self) -> Vec<CacheEntry>;

    /// Short backend identifier for logging.
    fn name(&self) -> &'static str;
}

/// In-memory backend over a concurrent map.
///
/// DashMap's per-shard locking makes `fetch` atomic per key; `remove_if`
/// re-checks expiry under the shard lock so a concurrent overwrite is never
/// removed by a stale expiry decision.
#[derive(Default)]
pub struct MemoryBackend {
    entries: DashMap<String, CacheEntry>,
}

impl MemoryBackend {
    /// Create an empty backend.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CacheBackend for MemoryBackend {
    async fn fetch(&self, key: &str, now: u64) -> Option<CacheEntry> {
        if let Some(mut entry) = self.entries.get_mut(key) {
            if entry.is_live(now) {
                entry.hit_count += 1;
                return Some(entry.value().clone());
            }
        }
        if self.entries.remove_if(key, |_, e| !e.is_live(now)).is_some() {
            debug!(key = %&key[..8.min(key.len())], "Cache entry expired, removing");
        }
        None
    }

    async fn store(&self, entry: CacheEntry) {
        self.entries.insert(entry.key.clone(), entry);
    }

    async fn sweep(&self, now: u64) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, e| e.is_live(now));
        before.saturating_sub(self.entries.len())
    }

    async fn clear(&self) {
        self.entries.clear();
    }

    async fn clear_model(&self, model: AiModel) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, e| e.model != model);
        before.saturating_sub(self.entries.len())
    }

    async fn snapshot(&self) -> Vec<CacheEntry> {
        self.entries.iter().map(|r| r.value().clone()).collect()
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
