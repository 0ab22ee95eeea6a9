//! # store-search
//!
//! Search-as-you-type aggregation over the store catalogue.
//!
//! This crate turns rapid keystrokes into a stable, de-duplicated, grouped
//! set of results across the store's categories (movies, music, apps,
//! books). It knows nothing about rendering: a subscriber receives
//! [`ResultSnapshot`] values and draws them however it likes.
//!
//! ## Design
//!
//! - Debounces input and cancels superseded work by generation
//! - Fans each query out concurrently, one fetch per category scope
//! - Emits a regrouped snapshot as each scope completes, in arrival order
//! - Graceful degradation: a failing category reads as empty, never as an error
//! - Pluggable [`Fetcher`] seam, with an iTunes Search API implementation
//!   and an optional in-memory TTL cache
//!
//! ## Privacy
//!
//! Search terms are logged only at trace level.

pub mod aggregator;
pub mod cache;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod http;
pub mod itunes;
pub mod types;

pub use aggregator::{Generation, SearchAggregator};
pub use cache::CachedFetcher;
pub use config::SearchConfig;
pub use error::{Result, SearchError};
pub use fetcher::Fetcher;
pub use itunes::ItunesFetcher;
pub use types::{ItemKind, Query, ResultSnapshot, Scope, SearchItem, Section};

/// Build an aggregator over the iTunes Search API, cached per `config`.
///
/// # Errors
///
/// Returns [`SearchError::Config`] if `config` is invalid or no tokio
/// runtime is running, or [`SearchError::Http`] if the HTTP client cannot
/// be built.
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> store_search::Result<()> {
/// use store_search::{Scope, SearchConfig};
///
/// let aggregator = store_search::itunes_aggregator(&SearchConfig::default())?;
/// let mut snapshots = aggregator.subscribe_channel();
/// aggregator.on_input("daft punk", [Scope::All]);
/// while let Some(snapshot) = snapshots.recv().await {
///     for section in snapshot.sections() {
///         println!("{}: {} items", section.label(), section.items.len());
///     }
/// }
/// # Ok(())
/// # }
/// ```
pub fn itunes_aggregator(config: &SearchConfig) -> Result<SearchAggregator> {
    let fetcher = CachedFetcher::new(ItunesFetcher::new(config)?, config.cache_ttl_seconds);
    SearchAggregator::new(fetcher, config)
}

/// Fetch every concrete scope of `query` once, without debouncing, and
/// return the merged snapshot.
///
/// Failing scopes contribute nothing; only when every scope fails is the
/// last error returned.
///
/// # Errors
///
/// Returns the last per-scope [`SearchError`] if no scope succeeded.
pub async fn search_once<F: Fetcher>(fetcher: &F, query: &Query) -> Result<ResultSnapshot> {
    let scopes = query.expanded_scopes();
    if query.term.is_empty() || scopes.is_empty() {
        return Ok(ResultSnapshot::empty());
    }

    let outcomes =
        futures::future::join_all(scopes.iter().map(|scope| fetcher.fetch(&query.term, *scope)))
            .await;

    let mut merged = aggregator::MergedItems::new();
    let mut last_error = None;
    let mut succeeded = 0usize;
    for (scope, outcome) in scopes.iter().zip(outcomes) {
        match outcome {
            Ok(items) => {
                succeeded += 1;
                merged.merge(items);
            }
            Err(err) => {
                tracing::warn!(%scope, error = %err, "scope fetch failed");
                last_error = Some(err);
            }
        }
    }

    match last_error {
        Some(err) if succeeded == 0 => Err(err),
        _ => Ok(merged.snapshot()),
    }
}
