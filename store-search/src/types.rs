//! Core types: result items, category scopes, queries and grouped snapshots.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SearchError;

/// A single store search result.
///
/// Only `id` and `kind` matter to the aggregator; the remaining fields are
/// carried through untouched for the presenter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchItem {
    /// Unique identifier used for de-duplication.
    pub id: String,
    /// Category tag that decides the item's section.
    pub kind: ItemKind,
    /// Track, collection or app name.
    pub title: String,
    /// Artist, author or developer name.
    pub artist: String,
    /// Artwork image URL, if the store provided one.
    pub artwork_url: Option<String>,
    /// Free-form description, if any.
    pub description: Option<String>,
}

impl SearchItem {
    /// Build an item with only the fields the aggregator needs.
    pub fn new(id: impl Into<String>, kind: ItemKind, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind,
            title: title.into(),
            artist: String::new(),
            artwork_url: None,
            description: None,
        }
    }

    /// Set the artist/author.
    pub fn with_artist(mut self, artist: impl Into<String>) -> Self {
        self.artist = artist.into();
        self
    }

    /// The concrete scope whose section this item belongs to, if any.
    pub fn scope(&self) -> Option<Scope> {
        self.kind.scope()
    }
}

/// Category tag reported by the store for each result.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ItemKind {
    /// `feature-movie`
    FeatureMovie,
    /// `song`
    Song,
    /// `album`
    Album,
    /// `software`
    Software,
    /// `ebook`
    Ebook,
    /// Any other tag (music videos, podcasts, TV episodes...). Never grouped.
    Other(String),
}

impl ItemKind {
    /// The wire tag for this kind.
    pub fn as_str(&self) -> &str {
        match self {
            Self::FeatureMovie => "feature-movie",
            Self::Song => "song",
            Self::Album => "album",
            Self::Software => "software",
            Self::Ebook => "ebook",
            Self::Other(tag) => tag,
        }
    }

    /// The section this kind is grouped under.
    pub fn scope(&self) -> Option<Scope> {
        match self {
            Self::FeatureMovie => Some(Scope::Movies),
            Self::Song | Self::Album => Some(Scope::Music),
            Self::Software => Some(Scope::Apps),
            Self::Ebook => Some(Scope::Books),
            Self::Other(_) => None,
        }
    }
}

impl From<&str> for ItemKind {
    fn from(tag: &str) -> Self {
        match tag {
            "feature-movie" => Self::FeatureMovie,
            "song" => Self::Song,
            "album" => Self::Album,
            "software" => Self::Software,
            "ebook" => Self::Ebook,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for ItemKind {
    fn from(tag: String) -> Self {
        Self::from(tag.as_str())
    }
}

impl From<ItemKind> for String {
    fn from(kind: ItemKind) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Category filter for a search.
///
/// Variant order is the canonical section order; `All` sorts first.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub enum Scope {
    /// Meta scope: every concrete category.
    All,
    /// Feature films.
    Movies,
    /// Songs and albums.
    Music,
    /// Software.
    Apps,
    /// E-books.
    Books,
}

impl Scope {
    /// The concrete scopes in canonical order.
    pub const CONCRETE: [Scope; 4] = [Self::Movies, Self::Music, Self::Apps, Self::Books];

    /// Every scope, in the order a scope bar shows them.
    pub fn all() -> &'static [Scope] {
        &[Self::All, Self::Movies, Self::Music, Self::Apps, Self::Books]
    }

    /// Display title, also used as the section label.
    pub fn title(&self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Movies => "Movies",
            Self::Music => "Music",
            Self::Apps => "Apps",
            Self::Books => "Books",
        }
    }

    /// The `media` parameter the store API expects for this scope.
    pub fn media_type(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Movies => "movie",
            Self::Music => "music",
            Self::Apps => "software",
            Self::Books => "ebook",
        }
    }

    /// Whether this is one of the four fetchable categories.
    pub fn is_concrete(&self) -> bool {
        !matches!(self, Self::All)
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

impl TryFrom<String> for Scope {
    type Error = SearchError;

    fn try_from(name: String) -> Result<Self, Self::Error> {
        name.parse()
    }
}

impl From<Scope> for String {
    fn from(scope: Scope) -> Self {
        scope.title().to_ascii_lowercase()
    }
}

impl FromStr for Scope {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::all()
            .iter()
            .copied()
            .find(|scope| {
                scope.title().eq_ignore_ascii_case(wanted)
                    || scope.media_type().eq_ignore_ascii_case(wanted)
            })
            .ok_or_else(|| SearchError::Config(format!("unknown scope `{wanted}`")))
    }
}

/// The latest desired search: a term plus the active scopes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Query {
    /// Raw search term as typed.
    pub term: String,
    /// Active scopes. Order-insensitive.
    pub scopes: BTreeSet<Scope>,
}

impl Query {
    pub fn new(term: impl Into<String>, scopes: impl IntoIterator<Item = Scope>) -> Self {
        Self {
            term: term.into(),
            scopes: scopes.into_iter().collect(),
        }
    }

    /// Concrete scopes to fan out to, in canonical order.
    ///
    /// `All` expands to every concrete scope. An empty scope set yields
    /// nothing to fetch.
    pub fn expanded_scopes(&self) -> Vec<Scope> {
        if self.scopes.contains(&Scope::All) {
            return Scope::CONCRETE.to_vec();
        }
        self.scopes.iter().copied().filter(Scope::is_concrete).collect()
    }

    /// Whether results for `scope` are wanted by this query.
    pub fn accepts(&self, scope: Scope) -> bool {
        self.scopes.contains(&Scope::All) || self.scopes.contains(&scope)
    }
}

/// One labelled group of items in a [`ResultSnapshot`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    /// The concrete scope this section represents.
    pub scope: Scope,
    /// Items in arrival order.
    pub items: Vec<SearchItem>,
}

impl Section {
    /// Section label shown as a header.
    pub fn label(&self) -> &'static str {
        self.scope.title()
    }
}

/// Grouped results handed to the subscriber.
///
/// Sections follow the canonical order (movies, music, apps, books) and
/// only non-empty sections are present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResultSnapshot {
    sections: Vec<Section>,
}

impl ResultSnapshot {
    /// A snapshot with no sections.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Group items into canonical sections, keeping arrival order within each.
    ///
    /// Items whose kind maps to no section are left out.
    pub fn from_items<'a>(items: impl IntoIterator<Item = &'a SearchItem>) -> Self {
        let mut buckets: [Vec<SearchItem>; 4] = Default::default();
        for item in items {
            let Some(scope) = item.scope() else {
                continue;
            };
            if let Some(slot) = Scope::CONCRETE.iter().position(|s| *s == scope) {
                buckets[slot].push(item.clone());
            }
        }

        let sections = Scope::CONCRETE
            .into_iter()
            .zip(buckets)
            .filter(|(_, items)| !items.is_empty())
            .map(|(scope, items)| Section { scope, items })
            .collect();
        Self { sections }
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Section labels in display order.
    pub fn labels(&self) -> Vec<&'static str> {
        self.sections.iter().map(Section::label).collect()
    }

    /// The section for `scope`, if it has any items.
    pub fn section(&self, scope: Scope) -> Option<&Section> {
        self.sections.iter().find(|s| s.scope == scope)
    }

    /// Total number of items across all sections.
    pub fn item_count(&self) -> usize {
        self.sections.iter().map(|s| s.items.len()).sum()
    }
}
