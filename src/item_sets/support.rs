use crate::dataset::{Dataset, ItemId};

/// Whether every id in `items` also appears in `transaction`.
///
/// Both slices must be ascending; the check is a single merge walk.
pub fn is_subset(items: &[ItemId], transaction: &[ItemId]) -> bool {
    if items.len() > transaction.len() {
        return false;
    }
    let mut rest = transaction.iter();
    'outer: for item in items {
        for candidate in rest.by_ref() {
            if candidate == item {
                continue 'outer;
            }
            if candidate > item {
                return false;
            }
        }
        return false;
    }
    true
}

/// Number of transactions containing every id in `items`.
pub fn count_containing(items: &[ItemId], dataset: &Dataset) -> usize {
    match items {
        [single] => dataset
            .transactions()
            .iter()
            .filter(|t| t.binary_search(single).is_ok())
            .count(),
        _ => dataset
            .transactions()
            .iter()
            .filter(|t| is_subset(items, t))
            .count(),
    }
}

/// Fraction of transactions containing every id in `items`. A dataset without
/// transactions gives a support of zero.
pub fn support(items: &[ItemId], dataset: &Dataset) -> f64 {
    if dataset.is_empty() {
        return 0.0;
    }
    count_containing(items, dataset) as f64 / dataset.len() as f64
}
