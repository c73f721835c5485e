use std::cmp::Ordering;
use std::collections::HashMap;

use crate::models::{Bucket, BucketKey, Item};

/// One projected column: a bucket key and the items grouped under it,
/// sorted ascending by weight (ties keep arrival order).
#[derive(Debug, Clone, PartialEq)]
pub struct BoardColumn {
    pub key: BucketKey,
    pub items: Vec<Item>,
}

/// Derived grouping of the item collection by bucket.
///
/// Column order: the unassigned sentinel first, then loaded buckets
/// ascending by bucket weight, then columns for items whose bucket id
/// matches no loaded bucket (ascending by id). The last group keeps every
/// item visible through a transient bucket/item load mismatch; it empties
/// out on the next load.
#[derive(Debug, Clone, PartialEq)]
pub struct BoardProjection {
    columns: Vec<BoardColumn>,
}

impl BoardProjection {
    pub fn columns(&self) -> &[BoardColumn] {
        &self.columns
    }

    pub fn column(&self, key: BucketKey) -> Option<&BoardColumn> {
        self.columns.iter().find(|column| column.key == key)
    }

    /// Items in the given column, empty when the column is absent.
    pub fn items_in(&self, key: BucketKey) -> &[Item] {
        self.column(key)
            .map(|column| column.items.as_slice())
            .unwrap_or(&[])
    }

    pub fn item_count(&self) -> usize {
        self.columns.iter().map(|column| column.items.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.item_count() == 0
    }
}

/// Computes the bucket projection from scratch.
///
/// Always a wholesale recompute; callers that want memoization key it on a
/// store revision (see `BoardState::board`).
pub fn project(items: &[Item], buckets: &[Bucket]) -> BoardProjection {
    let mut grouped: HashMap<BucketKey, Vec<Item>> = HashMap::new();
    for item in items {
        grouped
            .entry(item.bucket_key())
            .or_default()
            .push(item.clone());
    }

    let mut ordered: Vec<&Bucket> = buckets.iter().collect();
    ordered.sort_by(|a, b| a.weight.partial_cmp(&b.weight).unwrap_or(Ordering::Equal));

    let mut columns = Vec::with_capacity(ordered.len() + 1);
    columns.push(column(
        BucketKey::Unassigned,
        grouped.remove(&BucketKey::Unassigned),
    ));
    for bucket in ordered {
        columns.push(column(bucket.key(), grouped.remove(&bucket.key())));
    }

    let mut orphaned: Vec<BucketKey> = grouped.keys().copied().collect();
    orphaned.sort();
    for key in orphaned {
        let items = grouped.remove(&key);
        columns.push(column(key, items));
    }

    BoardProjection { columns }
}

fn column(key: BucketKey, items: Option<Vec<Item>>) -> BoardColumn {
    let mut items = items.unwrap_or_default();
    items.sort_by(|a, b| a.weight.partial_cmp(&b.weight).unwrap_or(Ordering::Equal));
    BoardColumn { key, items }
}
