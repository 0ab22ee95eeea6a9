//! Running collection of merged results for the current generation.
//!
//! Items are kept in arrival order and de-duplicated by identifier: the
//! first copy of an id wins, later copies (from another scope or a repeated
//! completion) are ignored. Snapshots are rebuilt from scratch on demand.

use std::collections::HashSet;

use crate::types::{ResultSnapshot, SearchItem};

/// Arrival-ordered, id-unique item collection.
#[derive(Debug, Default)]
pub struct MergedItems {
    items: Vec<SearchItem>,
    seen: HashSet<String>,
}

impl MergedItems {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append every item whose id has not been seen yet.
    ///
    /// Returns how many items were added.
    pub fn merge(&mut self, incoming: impl IntoIterator<Item = SearchItem>) -> usize {
        let before = self.items.len();
        for item in incoming {
            if self.seen.insert(item.id.clone()) {
                self.items.push(item);
            }
        }
        self.items.len() - before
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.seen.clear();
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[SearchItem] {
        &self.items
    }

    /// Group the collection into a fresh snapshot.
    pub fn snapshot(&self) -> ResultSnapshot {
        ResultSnapshot::from_items(&self.items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ItemKind, Scope};

    fn item(id: &str, kind: ItemKind) -> SearchItem {
        SearchItem::new(id, kind, format!("Title {id}"))
    }

    #[test]
    fn merge_appends_in_arrival_order() {
        let mut merged = MergedItems::new();
        merged.merge([item("2", ItemKind::Software)]);
        merged.merge([item("1", ItemKind::Song)]);
        let ids: Vec<_> = merged.items().iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "1"]);
    }

    #[test]
    fn merging_same_items_twice_is_idempotent() {
        let batch = vec![item("1", ItemKind::Song), item("2", ItemKind::Album)];
        let mut merged = MergedItems::new();

        assert_eq!(merged.merge(batch.clone()), 2);
        assert_eq!(merged.merge(batch), 0);

        let snapshot = merged.snapshot();
        assert_eq!(snapshot.item_count(), 2);
        assert_eq!(
            snapshot.section(Scope::Music).map(|s| s.items.len()),
            Some(2)
        );
    }

    #[test]
    fn first_copy_of_an_id_wins() {
        let mut merged = MergedItems::new();
        merged.merge([item("7", ItemKind::Song)]);
        merged.merge([item("7", ItemKind::Ebook)]);

        assert_eq!(merged.len(), 1);
        assert_eq!(merged.snapshot().labels(), vec!["Music"]);
    }

    #[test]
    fn clear_resets_seen_ids() {
        let mut merged = MergedItems::new();
        merged.merge([item("1", ItemKind::Song)]);
        merged.clear();
        assert!(merged.is_empty());
        assert_eq!(merged.merge([item("1", ItemKind::Song)]), 1);
    }

    #[test]
    fn snapshot_of_empty_collection_is_empty() {
        assert!(MergedItems::new().snapshot().is_empty());
    }
}
