//! Error types for the storefront front-end.

use thiserror::Error;

/// Errors raised outside the search core: configuration and terminal I/O.
#[derive(Debug, Error)]
pub enum StorefrontError {
    /// Configuration could not be parsed or is invalid.
    #[error("config error: {0}")]
    Config(String),

    /// Reading input or writing output failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A snapshot could not be serialised.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The search core refused to start.
    #[error(transparent)]
    Search(#[from] store_search::SearchError),
}

/// Convenience result alias.
pub type Result<T> = std::result::Result<T, StorefrontError>;
