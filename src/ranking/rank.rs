use std::cmp::Ordering;

use crate::schema::element_model::{CollectionEntry, ElementCollection};

/// Display order: descending importance, ties keep payload order.
///
/// Ranking never touches identities; callers keep addressing state by
/// `CollectionEntry::identity`.
pub fn rank(collection: &ElementCollection) -> Vec<&CollectionEntry> {
    let mut ranked: Vec<&CollectionEntry> = collection.entries().iter().collect();
    // `sort_by` is stable. JSON has no NaN, and `-0.0` must tie with `0.0`.
    ranked.sort_by(|a, b| {
        b.element
            .importance
            .partial_cmp(&a.element.importance)
            .unwrap_or(Ordering::Equal)
    });
    ranked
}

/// Payload indices in display order.
pub fn rank_indices(collection: &ElementCollection) -> Vec<usize> {
    rank(collection).into_iter().map(|e| e.index).collect()
}
