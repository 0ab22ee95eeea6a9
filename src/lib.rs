//! Storefront: search-as-you-type over the store catalogue, in a terminal.
//!
//! The front-end plays the part of the search bar and the result list:
//! - **Session**: turns input lines into queries (term edits, scope changes)
//! - **Aggregator**: debounces, fans out per category, merges (`store-search`)
//! - **Presenter**: prints every grouped snapshot it receives

pub mod config;
pub mod error;
pub mod presenter;
pub mod session;

pub use config::{OutputFormat, StorefrontConfig};
pub use error::{Result, StorefrontError};
pub use presenter::Presenter;
pub use session::{Ending, Input, Session, read_inputs};
