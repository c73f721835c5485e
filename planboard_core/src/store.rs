use std::cmp::Ordering;
use std::sync::Arc;

use crate::models::{Bucket, Item, ItemId};
use crate::projection::{BoardProjection, project};

/// Mutations the item store understands. The action space is closed: every
/// change to the collection, optimistic or push-driven, is one of these.
#[derive(Debug, Clone, PartialEq)]
pub enum ItemAction {
    /// Upsert: replace items with matching ids in place, append the rest.
    Add(Vec<Item>),
    /// Wholesale substitution, used after a full reload.
    Replace(Vec<Item>),
    /// Delete by id; absent ids are not an error.
    Remove(Vec<ItemId>),
    /// Empty the collection.
    Clear,
}

/// Applies one action to the item collection.
///
/// Pure: consumes the current collection, returns the next one. `Add`
/// replaces matching ids in place (keeping their position) and appends the
/// rest, so re-applying the same `Add` yields the same collection.
pub fn apply(mut items: Vec<Item>, action: ItemAction) -> Vec<Item> {
    match action {
        ItemAction::Add(incoming) => {
            for item in incoming {
                match items.iter().position(|existing| existing.id == item.id) {
                    Some(at) => items[at] = item,
                    None => items.push(item),
                }
            }
            items
        }
        ItemAction::Replace(incoming) => incoming,
        ItemAction::Remove(ids) => {
            items.retain(|item| !ids.contains(&item.id));
            items
        }
        ItemAction::Clear => Vec::new(),
    }
}

/// Revision-counted owner of the board inputs (items and buckets) with a
/// projection cache keyed by revision.
///
/// The controller holds one of these behind a lock; everything else treats
/// it as the single source of truth for what is on the board.
#[derive(Debug, Default)]
pub struct BoardState {
    items: Vec<Item>,
    buckets: Vec<Bucket>,
    revision: u64,
    projected: Option<(u64, Arc<BoardProjection>)>,
}

impl BoardState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn buckets(&self) -> &[Bucket] {
        &self.buckets
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn item(&self, id: ItemId) -> Option<&Item> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn apply(&mut self, action: ItemAction) {
        self.items = apply(std::mem::take(&mut self.items), action);
        self.revision += 1;
    }

    /// Replaces the bucket list, kept sorted ascending by weight.
    pub fn set_buckets(&mut self, mut buckets: Vec<Bucket>) {
        buckets.sort_by(|a, b| a.weight.partial_cmp(&b.weight).unwrap_or(Ordering::Equal));
        self.buckets = buckets;
        self.revision += 1;
    }

    /// Returns the bucket projection for the current revision. The same
    /// `Arc` comes back until the next mutation; recomputation is always
    /// wholesale, never an incremental patch.
    pub fn board(&mut self) -> Arc<BoardProjection> {
        if let Some((revision, projection)) = &self.projected {
            if *revision == self.revision {
                return Arc::clone(projection);
            }
        }
        let projection = Arc::new(project(&self.items, &self.buckets));
        self.projected = Some((self.revision, Arc::clone(&projection)));
        projection
    }
}
