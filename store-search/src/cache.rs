//! In-memory TTL cache in front of a [`Fetcher`].
//!
//! Caches per-scope results keyed by the (normalised term, scope) pair so
//! that retyping a recent query, or switching back to a scope, does not hit
//! the network again. Uses [`moka`] for async-friendly caching with
//! automatic expiry and eviction.

use std::time::Duration;

use moka::future::Cache;

use crate::error::SearchError;
use crate::fetcher::Fetcher;
use crate::types::{Scope, SearchItem};

/// Maximum number of cached per-scope result sets.
const MAX_CACHE_ENTRIES: u64 = 100;

/// Composite cache key: normalised term + concrete scope.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    /// Lowercased, trimmed term.
    term: String,
    scope: Scope,
}

impl CacheKey {
    /// Build a key. The term is lowercased and trimmed so that `" Rust"`
    /// and `"rust"` share an entry.
    pub fn new(term: &str, scope: Scope) -> Self {
        Self {
            term: term.trim().to_lowercase(),
            scope,
        }
    }
}

/// A [`Fetcher`] that serves repeated requests from memory.
///
/// Only successful fetches are stored; errors and cancellations always
/// reach the inner fetcher again next time.
pub struct CachedFetcher<F> {
    inner: F,
    cache: Option<Cache<CacheKey, Vec<SearchItem>>>,
}

impl<F: Fetcher> CachedFetcher<F> {
    /// Wrap `inner` with a cache whose entries live for `ttl_seconds`.
    ///
    /// A TTL of 0 disables caching and every call passes through.
    pub fn new(inner: F, ttl_seconds: u64) -> Self {
        let cache = (ttl_seconds > 0).then(|| {
            Cache::builder()
                .max_capacity(MAX_CACHE_ENTRIES)
                .time_to_live(Duration::from_secs(ttl_seconds))
                .build()
        });
        Self { inner, cache }
    }

    /// The wrapped fetcher.
    pub fn inner(&self) -> &F {
        &self.inner
    }

    /// Drop every cached entry.
    pub fn clear(&self) {
        if let Some(cache) = &self.cache {
            cache.invalidate_all();
        }
    }
}

impl<F: Fetcher> Fetcher for CachedFetcher<F> {
    async fn fetch(&self, term: &str, scope: Scope) -> Result<Vec<SearchItem>, SearchError> {
        let Some(cache) = &self.cache else {
            return self.inner.fetch(term, scope).await;
        };

        let key = CacheKey::new(term, scope);
        if let Some(items) = cache.get(&key).await {
            tracing::debug!(%scope, count = items.len(), "cache hit");
            return Ok(items);
        }

        let items = self.inner.fetch(term, scope).await?;
        cache.insert(key, items.clone()).await;
        Ok(items)
    }

    fn name(&self) -> &'static str {
        self.inner.name()
    }
}
