use crate::error::{Error, Result};
use crate::models::{BucketId, Item};

/// Reassigns each item's weight to its 0-based position in the slice.
///
/// The only place weights are written: both drag paths renumber through
/// here, so position and weight cannot drift apart.
pub fn renumber(items: &mut [Item]) {
    for (position, item) in items.iter_mut().enumerate() {
        item.weight = position as f64;
    }
}

/// Computes the contents of one column after a within-column drag: the item
/// at `from` moves to `to`, every weight renumbered by position.
///
/// Indices are validated against the column before anything is touched.
pub fn plan_reorder(column: &[Item], from: usize, to: usize) -> Result<Vec<Item>> {
    let len = column.len();
    if from >= len {
        return Err(Error::invalid_input(format!(
            "reorder from index {from} out of range for {len} items"
        )));
    }
    if to >= len {
        return Err(Error::invalid_input(format!(
            "reorder to index {to} out of range for {len} items"
        )));
    }
    let mut items = column.to_vec();
    let moved = items.remove(from);
    items.insert(to, moved);
    renumber(&mut items);
    Ok(items)
}

/// Computes the destination column after a cross-column drag: `source[from]`
/// is inserted into `dest` at `to`, every destination item is pointed at
/// `dest_bucket`, and destination weights are renumbered by position.
///
/// Returns the new destination column only; the moved item leaves the source
/// column when the projection recomputes over its new bucket id. Same-column
/// drags must go through `plan_reorder` instead.
pub fn plan_transfer(
    source: &[Item],
    dest: &[Item],
    from: usize,
    to: usize,
    dest_bucket: Option<BucketId>,
) -> Result<Vec<Item>> {
    if from >= source.len() {
        return Err(Error::invalid_input(format!(
            "transfer from index {from} out of range for {} items",
            source.len()
        )));
    }
    if to > dest.len() {
        return Err(Error::invalid_input(format!(
            "transfer to index {to} out of range for {} items",
            dest.len()
        )));
    }
    let mut items = dest.to_vec();
    items.insert(to, source[from].clone());
    for item in &mut items {
        item.bucket_id = dest_bucket;
    }
    renumber(&mut items);
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ItemId, PlanId};

    fn item(id: i64, bucket: Option<i64>, weight: f64) -> Item {
        Item {
            id: ItemId(id),
            plan_id: PlanId(1),
            criterion_id: None,
            bucket_id: bucket.map(BucketId),
            weight,
            completed_at: None,
            completed_by: None,
        }
    }

    fn ids(items: &[Item]) -> Vec<i64> {
        items.iter().map(|i| i.id.0).collect()
    }

    fn weights(items: &[Item]) -> Vec<f64> {
        items.iter().map(|i| i.weight).collect()
    }

    #[test]
    fn renumber_assigns_positional_weights() {
        let mut items = vec![item(3, None, 9.0), item(1, None, 4.5), item(2, None, 7.0)];
        renumber(&mut items);
        assert_eq!(weights(&items), vec![0.0, 1.0, 2.0]);
    }

    #[test]
    fn reorder_moves_and_renumbers() {
        let column = vec![item(2, Some(5), 0.0), item(1, Some(5), 1.0)];
        let updated = plan_reorder(&column, 0, 1).expect("valid indices");
        assert_eq!(ids(&updated), vec![1, 2]);
        assert_eq!(weights(&updated), vec![0.0, 1.0]);
    }

    #[test]
    fn reorder_to_the_end_of_the_column() {
        let column = vec![
            item(1, Some(5), 0.0),
            item(2, Some(5), 1.0),
            item(3, Some(5), 2.0),
        ];
        let updated = plan_reorder(&column, 0, 2).expect("valid indices");
        assert_eq!(ids(&updated), vec![2, 3, 1]);
        assert_eq!(weights(&updated), vec![0.0, 1.0, 2.0]);
    }

    #[test]
    fn reorder_rejects_out_of_range_indices() {
        let column = vec![item(1, Some(5), 0.0), item(2, Some(5), 1.0)];
        assert!(matches!(
            plan_reorder(&column, 2, 0),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            plan_reorder(&column, 0, 2),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn transfer_inserts_retargets_and_renumbers() {
        let source = vec![item(1, None, 0.0)];
        let dest = vec![item(2, Some(5), 0.0)];
        let updated = plan_transfer(&source, &dest, 0, 0, Some(BucketId(5))).expect("valid move");

        assert_eq!(ids(&updated), vec![1, 2]);
        assert_eq!(weights(&updated), vec![0.0, 1.0]);
        assert!(updated.iter().all(|i| i.bucket_id == Some(BucketId(5))));
    }

    #[test]
    fn transfer_into_an_empty_column() {
        let source = vec![item(1, Some(3), 0.0)];
        let updated = plan_transfer(&source, &[], 0, 0, None).expect("valid move");
        assert_eq!(ids(&updated), vec![1]);
        assert_eq!(updated[0].bucket_id, None);
        assert_eq!(updated[0].weight, 0.0);
    }

    #[test]
    fn transfer_allows_insertion_at_the_tail() {
        let source = vec![item(1, None, 0.0)];
        let dest = vec![item(2, Some(5), 0.0)];
        let updated = plan_transfer(&source, &dest, 0, 1, Some(BucketId(5))).expect("valid move");
        assert_eq!(ids(&updated), vec![2, 1]);
    }

    #[test]
    fn transfer_rejects_out_of_range_indices() {
        let source = vec![item(1, None, 0.0)];
        let dest = vec![item(2, Some(5), 0.0)];
        assert!(matches!(
            plan_transfer(&source, &dest, 1, 0, Some(BucketId(5))),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            plan_transfer(&source, &dest, 0, 2, Some(BucketId(5))),
            Err(Error::InvalidInput(_))
        ));
    }
}
