//! Expiry-aware response store with periodic sweep.

use std::sync::{Arc, Mutex};

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::backend::{CacheBackend, MemoryBackend};
use super::entry::{CacheEntry, CacheStats};
use super::now_secs;
use crate::config::CacheConfig;
use crate::key::PromptKey;
use crate::model::AiModel;

/// In-process cache of model responses keyed by derived request identity.
///
/// Explicitly constructed and owned — callers hold the `Arc` and control the
/// sweeper's lifecycle via [`start_sweeper`](Self::start_sweeper) and
/// [`shutdown`](Self::shutdown). Correctness never depends on the sweeper:
/// [`get`](Self::get) re-evaluates liveness on every read and lazily evicts.
///
/// # Example
///
/// ```rust
/// # tokio_test::block_on(async {
/// use promptcache::{AiModel, CacheConfig, PromptKey, ResponseCache};
///
/// let cache = ResponseCache::new(CacheConfig::default());
/// cache.start_sweeper();
///
/// let key = PromptKey::new("Buy milk", AiModel::ClaudeHaiku).with_max_tokens(1000);
/// if cache.get(&key).await.is_none() {
///     // ...call the provider on a miss, then write back:
///     cache.set(&key, "Added 'Buy milk' to your list.", 0.003).await;
/// }
/// let entry = cache.get(&key).await.unwrap();
/// assert_eq!(entry.hit_count, 1);
///
/// cache.shutdown().await;
/// # });
/// ```
pub struct ResponseCache {
    config: CacheConfig,
    backend: Arc<dyn CacheBackend>,
    shutdown: CancellationToken,
    sweeper: Mutex<Option<JoinHandle<()>>>,
}

impl ResponseCache {
    /// Create a cache over the in-memory backend.
    pub fn new(config: CacheConfig) -> Arc<Self> {
        Self::with_backend(config, Arc::new(MemoryBackend::new()))
    }

    /// Create a cache over a caller-supplied backend.
    ///
    /// The read/write contracts are backend-independent; a networked
    /// key-value backend slots in here without touching call sites.
    pub fn with_backend(config: CacheConfig, backend: Arc<dyn CacheBackend>) -> Arc<Self> {
        Arc::new(Self {
            config,
            backend,
            shutdown: CancellationToken::new(),
            sweeper: Mutex::new(None),
        })
    }

    /// Spawn the periodic sweep task. Idempotent; a second call is a no-op.
    ///
    /// The task holds only a weak reference, so dropping every strong `Arc`
    /// stops the sweeper even without an explicit [`shutdown`](Self::shutdown).
    pub fn start_sweeper(self: &Arc<Self>) {
        let mut guard = self.sweeper.lock().unwrap_or_else(|e| e.into_inner());
        if guard.is_some() {
            return;
        }

        let weak = Arc::downgrade(self);
        let token = self.shutdown.clone();
        let period = self.config.sweep_interval();
        *guard = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.tick().await; // skip first immediate tick
            loop {
                tokio::select! {
                    _ = token.cancelled() => {
                        info!("Cache sweeper shutting down");
                        return;
                    }
                    _ = interval.tick() => {
                        let Some(cache) = weak.upgrade() else { return };
                        let removed = cache.backend.sweep(now_secs()).await;
                        if removed > 0 {
                            debug!(removed, "Swept expired cache entries");
                        }
                    }
                }
            }
        }));
        info!(
            interval_secs = self.config.sweep_interval_secs,
            backend = self.backend.name(),
            "Cache sweeper started"
        );
    }

    /// Look up the cached response for a request, if present and live.
    ///
    /// An expired entry is removed on discovery and reported absent; a live
    /// entry has its hit count incremented and is returned post-increment.
    pub async fn get(&self, key: &PromptKey<'_>) -> Option<CacheEntry> {
        self.backend.fetch(&key.derive(), now_secs()).await
    }

    /// Cache a response under the config's default TTL.
    pub async fn set(&self, key: &PromptKey<'_>, response: impl Into<String>, cost: f64) {
        self.set_with_ttl(key, response, cost, self.config.default_ttl_minutes)
            .await;
    }

    /// Cache a response with an explicit TTL in minutes, unconditionally
    /// overwriting any entry under the same derived key and resetting its
    /// hit count.
    pub async fn set_with_ttl(
        &self,
        key: &PromptKey<'_>,
        response: impl Into<String>,
        cost: f64,
        ttl_minutes: u64,
    ) {
        let now = now_secs();
        let entry = CacheEntry {
            key: key.derive(),
            response: response.into(),
            model: key.model(),
            cost,
            created_at: now,
            expires_at: now.saturating_add(ttl_minutes.saturating_mul(60)),
            hit_count: 0,
        };
        self.backend.store(entry).await;
    }

    /// Aggregate statistics, computed by scanning all entries at call time.
    pub async fn stats(&self) -> CacheStats {
        CacheStats::from_entries(&self.backend.snapshot().await, now_secs())
    }

    /// Remove all entries unconditionally.
    pub async fn clear(&self) {
        self.backend.clear().await;
    }

    /// Remove every entry produced by `model`. Returns the number removed.
    pub async fn clear_model(&self, model: AiModel) -> usize {
        let removed = self.backend.clear_model(model).await;
        debug!(model = %model, removed, "Cleared cache entries for model");
        removed
    }

    /// Approximate memory footprint in MB: the summed serialized length of
    /// every entry. An estimate only — not exact allocation accounting, and
    /// not suitable for enforcing a hard memory bound.
    pub async fn approximate_size_mb(&self) -> f64 {
        let bytes: usize = self
            .backend
            .snapshot()
            .await
            .iter()
            .map(|entry| serde_json::to_string(entry).map_or(0, |json| json.len()))
            .sum();
        bytes as f64 / (1024.0 * 1024.0)
    }

    /// Identifier of the storage backend, for logging.
    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// Halt the periodic sweep and clear all entries.
    ///
    /// Idempotent: safe to call when the sweeper was never started or was
    /// already stopped. The cache remains usable afterwards (empty, with
    /// lazy eviction still covering expiry).
    pub async fn shutdown(&self) {
        self.shutdown.cancel();
        let handle = {
            let mut guard = self.sweeper.lock().unwrap_or_else(|e| e.into_inner());
            guard.take()
        };
        if let Some(handle) = handle {
            let _ = handle.await;
        }
        self.backend.clear().await;
        info!("Cache shut down");
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::super::backend::MockCacheBackend;
    use super::*;

    fn cache() -> Arc<ResponseCache> {
        ResponseCache::new(CacheConfig::default())
    }

    /// Route sweeper logs through the test harness when RUST_LOG is set.
    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }

    #[tokio::test]
    async fn test_write_then_read() {
        let cache = cache();
        let key = PromptKey::new("buy milk", AiModel::ClaudeHaiku);
        cache.set_with_ttl(&key, "R", 5.0, 60).await;

        let first = cache.get(&key).await.unwrap();
        assert_eq!(first.response, "R");
        assert_eq!(first.model, AiModel::ClaudeHaiku);
        assert_eq!(first.cost, 5.0);
        assert_eq!(first.hit_count, 1);

        let second = cache.get(&key).await.unwrap();
        assert_eq!(second.hit_count, 2);
    }

    #[tokio::test]
    async fn test_case_variants_share_an_entry() {
        let cache = cache();
        cache
            .set(&PromptKey::new("Buy Milk", AiModel::ClaudeHaiku), "R", 0.01)
            .await;
        let hit = cache
            .get(&PromptKey::new("  buy milk  ", AiModel::ClaudeHaiku))
            .await;
        assert!(hit.is_some());
    }

    #[tokio::test]
    async fn test_zero_ttl_expires_immediately() {
        let cache = cache();
        let key = PromptKey::new("p", AiModel::ClaudeHaiku);
        cache.set_with_ttl(&key, "R", 5.0, 0).await;

        assert!(cache.get(&key).await.is_none());
        let stats = cache.stats().await;
        assert_eq!(stats.valid_entries, 0);
        assert_eq!(stats.total_hits, 0);
        assert_eq!(stats.total_entries, 0, "lazy eviction removed the entry");
    }

    #[tokio::test]
    async fn test_set_applies_config_default_ttl() {
        let cache = ResponseCache::new(CacheConfig {
            default_ttl_minutes: 2,
            ..CacheConfig::default()
        });
        let key = PromptKey::new("p", AiModel::ClaudeHaiku);
        cache.set(&key, "R", 0.01).await;

        let entry = cache.get(&key).await.unwrap();
        assert_eq!(entry.expires_at - entry.created_at, 120);
    }

    #[tokio::test]
    async fn test_overwrite_replaces_and_resets() {
        let cache = cache();
        let key = PromptKey::new("p", AiModel::ClaudeSonnet);
        cache.set_with_ttl(&key, "first", 1.0, 60).await;
        let _ = cache.get(&key).await;
        let _ = cache.get(&key).await;

        cache.set_with_ttl(&key, "second", 2.0, 120).await;
        let entry = cache.get(&key).await.unwrap();
        assert_eq!(entry.response, "second");
        assert_eq!(entry.cost, 2.0);
        assert_eq!(entry.expires_at - entry.created_at, 7200);
        assert_eq!(entry.hit_count, 1, "reset to 0 by the overwrite, then this read");
    }

    #[tokio::test]
    async fn test_stats_accounting() {
        let cache = cache();
        let k1 = PromptKey::new("one", AiModel::ClaudeHaiku);
        let k2 = PromptKey::new("two", AiModel::ClaudeSonnet);
        cache.set_with_ttl(&k1, "r1", 0.10, 60).await;
        cache.set_with_ttl(&k2, "r2", 0.20, 60).await;
        let _ = cache.get(&k1).await;
        let _ = cache.get(&k1).await;
        let _ = cache.get(&k2).await;

        let stats = cache.stats().await;
        assert_eq!(stats.total_entries, 2);
        assert_eq!(stats.valid_entries, 2);
        assert_eq!(stats.total_hits, 3);
        assert!((stats.total_cost_saved - 0.40).abs() < 1e-9);
        assert!((stats.hit_rate - 1.5).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_clear_model_leaves_other_models_readable() {
        let cache = cache();
        let haiku = PromptKey::new("p1", AiModel::ClaudeHaiku);
        let sonnet = PromptKey::new("p2", AiModel::ClaudeSonnet);
        cache.set(&haiku, "h", 0.01).await;
        cache.set(&sonnet, "s", 0.05).await;

        assert_eq!(cache.clear_model(AiModel::ClaudeSonnet).await, 1);
        assert!(cache.get(&sonnet).await.is_none());
        assert_eq!(cache.get(&haiku).await.unwrap().response, "h");
    }

    #[tokio::test]
    async fn test_approximate_size_grows_with_entries() {
        let cache = cache();
        assert_eq!(cache.approximate_size_mb().await, 0.0);

        cache
            .set(&PromptKey::new("p", AiModel::ClaudeHaiku), "x".repeat(4096), 0.01)
            .await;
        let size = cache.approximate_size_mb().await;
        assert!(size > 0.0);
        assert!(size < 1.0, "a single small entry stays well under a megabyte");
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweeper_removes_expired_without_reads() {
        init_tracing();
        let cache = ResponseCache::new(CacheConfig {
            default_ttl_minutes: 60,
            sweep_interval_secs: 1,
        });
        cache.start_sweeper();

        let key = PromptKey::new("stale", AiModel::ClaudeHaiku);
        cache.set_with_ttl(&key, "R", 0.01, 0).await;
        assert_eq!(cache.stats().await.total_entries, 1);

        // Paused-clock sleep auto-advances through the sweeper's tick.
        tokio::time::sleep(Duration::from_millis(2500)).await;
        assert_eq!(
            cache.stats().await.total_entries,
            0,
            "sweep removed the expired entry with no read involved"
        );

        cache.shutdown().await;
    }

    #[tokio::test]
    async fn test_start_sweeper_is_idempotent() {
        let cache = cache();
        cache.start_sweeper();
        cache.start_sweeper();
        cache.shutdown().await;
    }

    #[tokio::test]
    async fn test_shutdown_is_idempotent_and_cache_stays_usable() {
        let cache = cache();
        cache.start_sweeper();
        let key = PromptKey::new("p", AiModel::ClaudeHaiku);
        cache.set(&key, "R", 0.01).await;

        cache.shutdown().await;
        cache.shutdown().await;

        assert!(cache.get(&key).await.is_none(), "shutdown cleared the store");
        cache.set(&key, "again", 0.01).await;
        assert_eq!(cache.get(&key).await.unwrap().response, "again");
    }

    #[tokio::test]
    async fn test_shutdown_without_sweeper_is_safe() {
        let cache = cache();
        cache.shutdown().await;
    }

    #[tokio::test]
    async fn test_default_backend_is_memory() {
        assert_eq!(cache().backend_name(), "memory");
    }

    #[tokio::test]
    async fn test_get_passes_derived_key_to_backend() {
        let mut mock = MockCacheBackend::new();
        mock.expect_fetch()
            .withf(|key, _| key.len() == 64 && key.chars().all(|c| c.is_ascii_hexdigit()))
            .times(1)
            .returning(|_, _| None);
        let cache = ResponseCache::with_backend(CacheConfig::default(), Arc::new(mock));

        assert!(cache
            .get(&PromptKey::new("prompt", AiModel::ClaudeHaiku))
            .await
            .is_none());
    }

    #[tokio::test]
    async fn test_set_builds_fresh_entry_for_backend() {
        let mut mock = MockCacheBackend::new();
        mock.expect_store()
            .withf(|entry| {
                entry.hit_count == 0
                    && entry.expires_at - entry.created_at == 3600
                    && entry.model == AiModel::ClaudeOpus
            })
            .times(1)
            .returning(|_| ());
        let cache = ResponseCache::with_backend(CacheConfig::default(), Arc::new(mock));

        cache
            .set(&PromptKey::new("prompt", AiModel::ClaudeOpus), "R", 0.5)
            .await;
    }
}
