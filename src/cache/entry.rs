//! Cache entry and aggregate statistics.

use serde::{Deserialize, Serialize};

use crate::model::AiModel;

/// A single cached model response plus its accounting metadata.
///
/// An entry is live iff `now < expires_at`; there is no deleted flag —
/// absence from the store is deletion. The only mutation after insertion is
/// the hit-count increment performed by a live read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Derived request identity (hex SHA-256). Not independently settable.
    pub key: String,
    /// The cached response text.
    pub response: String,
    /// Model that produced the response.
    pub model: AiModel,
    /// Provider cost (USD) charged for producing the response.
    pub cost: f64,
    /// Unix timestamp (seconds) at insertion.
    pub created_at: u64,
    /// Unix timestamp (seconds) after which the entry is logically absent.
    pub expires_at: u64,
    /// Number of live reads that returned this entry.
    pub hit_count: u64,
}

impl CacheEntry {
    /// Liveness predicate shared by lazy eviction and the periodic sweep.
    pub fn is_live(&self, now: u64) -> bool {
        now < self.expires_at
    }
}

/// Aggregate statistics computed by scanning all entries at call time.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct CacheStats {
    /// Entries currently present, live or not.
    pub total_entries: usize,
    /// Entries that are live right now.
    pub valid_entries: usize,
    /// Entries present but past expiry (not yet swept).
    pub expired_entries: usize,
    /// Sum of hit counts over live entries.
    pub total_hits: u64,
    /// Σ `cost × hit_count` over live entries — every hit after the first
    /// computation avoided re-paying the cost.
    pub total_cost_saved: f64,
    /// `total_hits / max(valid_entries, 1)`.
    ///
    /// Despite the name this is *average hits per live entry*, not a
    /// request-level hit/miss ratio: misses are not tracked. Kept as-is
    /// because callers chart the computed value.
    pub hit_rate: f64,
}

impl CacheStats {
    /// Compute stats over a snapshot of entries, partitioned by liveness at
    /// `now`.
    pub fn from_entries(entries: &[CacheEntry], now: u64) -> Self {
        let mut stats = CacheStats {
            total_entries: entries.len(),
            ..CacheStats::default()
        };
        for entry in entries {
            if entry.is_live(now) {
                stats.valid_entries += 1;
                stats.total_hits += entry.hit_count;
                stats.total_cost_saved += entry.cost * entry.hit_count as f64;
            } else {
                stats.expired_entries += 1;
            }
        }
        stats.hit_rate = stats.total_hits as f64 / stats.valid_entries.max(1) as f64;
        stats
    }
}
