//! iTunes Search API fetcher.
//!
//! Issues `GET {base_url}?term=..&media=..&lang=..&limit=..` and decodes the
//! `{ "resultCount": n, "results": [...] }` envelope into [`SearchItem`]s.
//! Tracks, collections and apps use different identifier and name fields,
//! so decoding falls back across them.

use serde::Deserialize;
use url::Url;

use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::fetcher::Fetcher;
use crate::http::{build_client, map_reqwest_error};
use crate::types::{ItemKind, Scope, SearchItem};

/// Fetcher backed by the public iTunes Search API.
#[derive(Debug, Clone)]
pub struct ItunesFetcher {
    client: reqwest::Client,
    config: SearchConfig,
}

impl ItunesFetcher {
    /// Create a fetcher using `config` for endpoint, language, limit and timeout.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] if the config is invalid, or
    /// [`SearchError::Http`] if the HTTP client cannot be built.
    pub fn new(config: &SearchConfig) -> Result<Self, SearchError> {
        config.validate()?;
        Ok(Self {
            client: build_client(config)?,
            config: config.clone(),
        })
    }

    /// Build the request URL for one scope.
    pub fn request_url(&self, term: &str, scope: Scope) -> Result<Url, SearchError> {
        build_request_url(&self.config, term, scope)
    }
}

/// Build the search URL for `term` restricted to `scope`.
///
/// # Errors
///
/// Returns [`SearchError::Config`] if `config.base_url` does not parse.
pub fn build_request_url(
    config: &SearchConfig,
    term: &str,
    scope: Scope,
) -> Result<Url, SearchError> {
    let mut url = Url::parse(&config.base_url)
        .map_err(|e| SearchError::Config(format!("base_url is invalid: {e}")))?;
    url.query_pairs_mut()
        .append_pair("term", term)
        .append_pair("media", scope.media_type())
        .append_pair("lang", &config.lang)
        .append_pair("limit", &config.limit.to_string());
    Ok(url)
}

impl Fetcher for ItunesFetcher {
    async fn fetch(&self, term: &str, scope: Scope) -> Result<Vec<SearchItem>, SearchError> {
        let url = self.request_url(term, scope)?;
        tracing::trace!(%scope, term, "requesting store results");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::Http(format!("store API returned {status}")));
        }

        let body = response.text().await.map_err(map_reqwest_error)?;
        let items = parse_response(&body)?;
        tracing::debug!(%scope, count = items.len(), "store results decoded");
        Ok(items)
    }

    fn name(&self) -> &'static str {
        "itunes"
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchEnvelope {
    #[serde(default)]
    result_count: usize,
    results: Vec<RawItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawItem {
    kind: Option<String>,
    collection_type: Option<String>,
    track_id: Option<u64>,
    collection_id: Option<u64>,
    track_view_url: Option<String>,
    collection_view_url: Option<String>,
    track_name: Option<String>,
    collection_name: Option<String>,
    artist_name: Option<String>,
    artwork_url100: Option<String>,
    description: Option<String>,
    long_description: Option<String>,
}

impl RawItem {
    fn into_item(self) -> Option<SearchItem> {
        let id = self
            .track_id
            .or(self.collection_id)
            .map(|id| id.to_string())
            .or(self.track_view_url)
            .or(self.collection_view_url)?;

        let kind = match (self.kind, self.collection_type) {
            (Some(kind), _) => ItemKind::from(kind),
            (None, Some(collection)) => ItemKind::from(collection.to_lowercase()),
            (None, None) => ItemKind::Other("unknown".into()),
        };

        Some(SearchItem {
            id,
            kind,
            title: self
                .track_name
                .or(self.collection_name)
                .unwrap_or_default(),
            artist: self.artist_name.unwrap_or_default(),
            artwork_url: self.artwork_url100,
            description: self.description.or(self.long_description),
        })
    }
}

/// Decode a search response body.
///
/// Results without any usable identifier are skipped.
///
/// # Errors
///
/// Returns [`SearchError::Parse`] if the body is not a search envelope.
pub fn parse_response(body: &str) -> Result<Vec<SearchItem>, SearchError> {
    let envelope: SearchEnvelope =
        serde_json::from_str(body).map_err(|e| SearchError::Parse(e.to_string()))?;
    let reported = envelope.result_count;
    let items: Vec<SearchItem> = envelope
        .results
        .into_iter()
        .filter_map(RawItem::into_item)
        .collect();
    if items.len() != reported {
        tracing::debug!(reported, decoded = items.len(), "result count mismatch");
    }
    Ok(items)
}
