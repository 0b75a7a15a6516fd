//! In-process LLM response cache with TTL expiry, cost accounting, and
//! prompt templates.
//!
//! The AI layer of a task-assistant backend, packaged as a library:
//!
//! - [`ResponseCache`] — expiry-aware store of model responses keyed by
//!   derived request identity, with lazy eviction on read, a periodic sweep
//!   task, per-model invalidation, and scan-computed statistics.
//! - [`PromptKey`] — deterministic SHA-256 identity over the normalized
//!   prompt, model, and optional system prompt / max-token budget.
//! - [`policy`] — allow-list eligibility (`should_cache`) and per-category
//!   TTL (`cache_duration_minutes`).
//! - [`TemplateCache`] — named prompt templates with single-placeholder
//!   substitution, seeded with the common task-operation shapes.
//!
//! Storage is process-memory by default; the [`CacheBackend`] trait is the
//! documented upgrade path to a networked key-value store.
//!
//! # Example
//!
//! ```rust
//! # tokio_test::block_on(async {
//! use promptcache::{policy, AiModel, CacheConfig, PromptKey, ResponseCache, TemplateCache};
//!
//! let cache = ResponseCache::new(CacheConfig::default());
//! cache.start_sweeper();
//!
//! let templates = TemplateCache::new();
//! let prompt = templates.get("create_simple_task", "buy milk").unwrap();
//!
//! if policy::should_cache("tasks", "create_task") {
//!     let key = PromptKey::new(&prompt, AiModel::ClaudeHaiku);
//!     if cache.get(&key).await.is_none() {
//!         let ttl = policy::cache_duration_minutes("tasks");
//!         cache.set_with_ttl(&key, "Added 'buy milk'.", 0.003, ttl).await;
//!     }
//! }
//!
//! cache.shutdown().await;
//! # });
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod key;
pub mod model;
pub mod policy;
pub mod templates;

pub use cache::{CacheBackend, CacheEntry, CacheStats, MemoryBackend, ResponseCache};
pub use config::CacheConfig;
pub use error::{Error, Result};
pub use key::PromptKey;
pub use model::AiModel;
pub use templates::TemplateCache;
