//! Search configuration with sensible defaults.
//!
//! [`SearchConfig`] controls the debounce delay, the store API endpoint and
//! request shape, timeouts and caching. The defaults match what the store
//! front-end has always sent: `lang=en_us`, `limit=20`, 300 ms debounce.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::SearchError;

/// Default iTunes Search API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://itunes.apple.com/search";

/// Largest `limit` the store API accepts.
pub const MAX_LIMIT: u32 = 200;

/// Configuration for the search aggregator and its fetchers.
///
/// Use [`Default::default()`] for sensible defaults, or construct with
/// field overrides for custom behaviour. Missing fields fall back to their
/// defaults when deserialised.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Quiet period after the last keystroke before a search is issued.
    pub debounce_ms: u64,
    /// Maximum number of results requested per scope.
    pub limit: u32,
    /// Language tag sent with every request.
    pub lang: String,
    /// Store search endpoint.
    pub base_url: String,
    /// Per-request HTTP timeout in seconds.
    pub timeout_seconds: u64,
    /// How long to cache per-scope results in seconds. Set to 0 to disable caching.
    pub cache_ttl_seconds: u64,
    /// Custom User-Agent string. If `None`, `store-search/<version>` is sent.
    pub user_agent: Option<String>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 300,
            limit: 20,
            lang: "en_us".into(),
            base_url: DEFAULT_BASE_URL.into(),
            timeout_seconds: 8,
            cache_ttl_seconds: 600,
            user_agent: None,
        }
    }
}

impl SearchConfig {
    /// Validates this configuration, returning an error if any field is invalid.
    ///
    /// Checks:
    /// - `limit` must be between 1 and [`MAX_LIMIT`]
    /// - `timeout_seconds` must be greater than 0
    /// - `lang` must not be empty
    /// - `base_url` must be an absolute http(s) URL
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.limit == 0 || self.limit > MAX_LIMIT {
            return Err(SearchError::Config(format!(
                "limit must be between 1 and {MAX_LIMIT}"
            )));
        }
        if self.timeout_seconds == 0 {
            return Err(SearchError::Config(
                "timeout_seconds must be greater than 0".into(),
            ));
        }
        if self.lang.trim().is_empty() {
            return Err(SearchError::Config("lang must not be empty".into()));
        }
        let url = url::Url::parse(&self.base_url)
            .map_err(|e| SearchError::Config(format!("base_url is invalid: {e}")))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(SearchError::Config(
                "base_url must use http or https".into(),
            ));
        }
        Ok(())
    }

    /// The debounce delay as a [`Duration`].
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// The per-request timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_sensible_values() {
        let config = SearchConfig::default();
        assert_eq!(config.debounce_ms, 300);
        assert_eq!(config.limit, 20);
        assert_eq!(config.lang, "en_us");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout_seconds, 8);
        assert_eq!(config.cache_ttl_seconds, 600);
        assert!(config.user_agent.is_none());
    }

    #[test]
    fn valid_config_passes_validation() {
        assert!(SearchConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_limit_rejected() {
        let config = SearchConfig {
            limit: 0,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("limit"));
    }

    #[test]
    fn oversized_limit_rejected() {
        let config = SearchConfig {
            limit: MAX_LIMIT + 1,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_timeout_rejected() {
        let config = SearchConfig {
            timeout_seconds: 0,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("timeout_seconds"));
    }

    #[test]
    fn blank_lang_rejected() {
        let config = SearchConfig {
            lang: "  ".into(),
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("lang"));
    }

    #[test]
    fn relative_base_url_rejected() {
        let config = SearchConfig {
            base_url: "/search".into(),
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("base_url"));
    }

    #[test]
    fn non_http_base_url_rejected() {
        let config = SearchConfig {
            base_url: "ftp://itunes.apple.com/search".into(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_debounce_valid() {
        let config = SearchConfig {
            debounce_ms: 0,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
        assert_eq!(config.debounce(), Duration::ZERO);
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config: SearchConfig =
            serde_json::from_str(r#"{"debounce_ms": 150}"#).expect("deserialize");
        assert_eq!(config.debounce_ms, 150);
        assert_eq!(config.limit, 20);
        assert_eq!(config.lang, "en_us");
    }

    #[test]
    fn durations() {
        let config = SearchConfig::default();
        assert_eq!(config.debounce(), Duration::from_millis(300));
        assert_eq!(config.timeout(), Duration::from_secs(8));
    }
}
