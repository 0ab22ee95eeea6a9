//! Trait definition for pluggable per-scope result sources.
//!
//! The aggregator never talks to the network itself. It is handed a
//! [`Fetcher`] at construction and calls it once per concrete scope.

use std::future::Future;
use std::sync::Arc;

use crate::error::SearchError;
use crate::types::{Scope, SearchItem};

/// A source of search results for one concrete scope at a time.
///
/// Implementors perform the request and decoding. Failures are reported as
/// [`SearchError`]; the aggregator treats every error except
/// [`SearchError::Cancelled`] as "no results for this scope".
///
/// Fetch futures may be dropped at any await point when their generation is
/// superseded. Implementations must tolerate that.
pub trait Fetcher: Send + Sync + 'static {
    /// Fetch results for `term` restricted to the concrete `scope`.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError`] if the request fails, times out, or the
    /// response cannot be decoded. Return [`SearchError::Cancelled`] to
    /// abandon a fetch without it counting as a result.
    fn fetch(
        &self,
        term: &str,
        scope: Scope,
    ) -> impl Future<Output = Result<Vec<SearchItem>, SearchError>> + Send;

    /// Short name used in log fields.
    fn name(&self) -> &'static str {
        "fetcher"
    }
}

impl<F: Fetcher> Fetcher for Arc<F> {
    fn fetch(
        &self,
        term: &str,
        scope: Scope,
    ) -> impl Future<Output = Result<Vec<SearchItem>, SearchError>> + Send {
        (**self).fetch(term, scope)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}
