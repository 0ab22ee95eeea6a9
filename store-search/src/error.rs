//! Error types for the store-search crate.
//!
//! Errors never reach a subscriber: the aggregator downgrades per-scope
//! failures to empty results and drops cancellations silently. They are
//! still surfaced by [`crate::Fetcher`] implementations and by config
//! validation so callers using those directly can act on them.

/// Errors that can occur while fetching or configuring a search.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// An HTTP request to the store API failed or returned a non-success status.
    #[error("HTTP error: {0}")]
    Http(String),

    /// A request did not complete within the configured timeout.
    #[error("search timed out: {0}")]
    Timeout(String),

    /// The store API response could not be decoded.
    #[error("parse error: {0}")]
    Parse(String),

    /// Invalid search configuration.
    #[error("config error: {0}")]
    Config(String),

    /// The fetch was abandoned cooperatively. Not a failure; never merged.
    #[error("search cancelled")]
    Cancelled,
}

impl SearchError {
    /// Whether this error signals cooperative cancellation rather than a failure.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

/// Convenience type alias for store-search results.
pub type Result<T> = std::result::Result<T, SearchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_http() {
        let err = SearchError::Http("status 503".into());
        assert_eq!(err.to_string(), "HTTP error: status 503");
    }

    #[test]
    fn display_timeout() {
        let err = SearchError::Timeout("exceeded 8s limit".into());
        assert_eq!(err.to_string(), "search timed out: exceeded 8s limit");
    }

    #[test]
    fn display_parse() {
        let err = SearchError::Parse("missing field `results`".into());
        assert_eq!(err.to_string(), "parse error: missing field `results`");
    }

    #[test]
    fn display_config() {
        let err = SearchError::Config("limit must be between 1 and 200".into());
        assert_eq!(
            err.to_string(),
            "config error: limit must be between 1 and 200"
        );
    }

    #[test]
    fn cancelled_is_distinguished() {
        assert!(SearchError::Cancelled.is_cancelled());
        assert!(!SearchError::Http("x".into()).is_cancelled());
        assert_eq!(SearchError::Cancelled.to_string(), "search cancelled");
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SearchError>();
    }
}
