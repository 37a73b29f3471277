mod apriori;
mod candidates;
mod support;

pub use apriori::{mine_frequent_itemsets, Apriori, LevelSummary};
pub use candidates::generate_candidates;
pub use support::{count_containing, is_subset, support};

pub use crate::dataset::{Dataset, ItemId, Transaction};

use std::borrow::Borrow;

use smallvec::SmallVec;

/// Item ids of a group, kept in ascending order without duplicates. Two
/// itemsets are equal exactly when their sorted id sequences are equal.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ItemSet(SmallVec<[ItemId; 8]>);

impl ItemSet {
    /// Canonicalizes `items` into a sorted, duplicate-free itemset.
    pub fn new(items: impl IntoIterator<Item = ItemId>) -> Self {
        let mut ids: SmallVec<[ItemId; 8]> = items.into_iter().collect();
        ids.sort_unstable();
        ids.dedup();
        ItemSet(ids)
    }

    pub(crate) fn from_sorted(ids: SmallVec<[ItemId; 8]>) -> Self {
        debug_assert!(ids.windows(2).all(|w| w[0] < w[1]));
        ItemSet(ids)
    }

    pub fn single(item: ItemId) -> Self {
        let mut ids = SmallVec::new();
        ids.push(item);
        ItemSet(ids)
    }

    pub fn items(&self) -> &[ItemId] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The itemset with the item at `position` removed.
    pub fn without(&self, position: usize) -> ItemSet {
        let mut ids = self.0.clone();
        ids.remove(position);
        ItemSet(ids)
    }
}

impl Borrow<[ItemId]> for ItemSet {
    fn borrow(&self) -> &[ItemId] {
        &self.0
    }
}

impl AsRef<[ItemId]> for ItemSet {
    fn as_ref(&self) -> &[ItemId] {
        &self.0
    }
}

impl FromIterator<ItemId> for ItemSet {
    fn from_iter<I: IntoIterator<Item = ItemId>>(iter: I) -> Self {
        ItemSet::new(iter)
    }
}

/// An itemset whose support met the threshold of the run that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct FrequentItemset {
    pub itemset: ItemSet,
    /// Fraction of transactions containing every item of `itemset`.
    pub support: f64,
}

impl FrequentItemset {
    pub fn items(&self) -> &[ItemId] {
        self.itemset.items()
    }

    pub fn length(&self) -> usize {
        self.itemset.len()
    }
}

impl AsRef<[ItemId]> for FrequentItemset {
    fn as_ref(&self) -> &[ItemId] {
        self.itemset.items()
    }
}

pub trait ItemSetMiner {
    /// Returns every itemset whose support is at least `sup_min`, shortest
    /// itemsets first.
    fn mine(&self, dataset: &Dataset, sup_min: f64) -> Vec<FrequentItemset>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(raw: &[usize]) -> Vec<ItemId> {
        raw.iter().copied().map(ItemId::from_index).collect()
    }

    #[test]
    fn new_sorts_and_deduplicates() {
        let itemset = ItemSet::new(ids(&[3, 1, 3, 2]));
        assert_eq!(itemset.items(), ids(&[1, 2, 3]).as_slice());
        assert_eq!(itemset.len(), 3);
    }

    #[test]
    fn collect_canonicalizes() {
        let itemset: ItemSet = ids(&[5, 2, 5]).into_iter().collect();
        assert_eq!(itemset, ItemSet::new(ids(&[2, 5])));
        assert!(!itemset.is_empty());

        let empty: ItemSet = std::iter::empty::<ItemId>().collect();
        assert!(empty.is_empty());
        assert_eq!(empty, ItemSet::default());
    }

    #[test]
    fn equality_ignores_input_order() {
        assert_eq!(ItemSet::new(ids(&[2, 0])), ItemSet::new(ids(&[0, 2])));
    }

    #[test]
    fn without_drops_one_position() {
        let itemset = ItemSet::new(ids(&[0, 4, 7]));
        assert_eq!(itemset.without(1).items(), ids(&[0, 7]).as_slice());
        assert_eq!(itemset.without(2).items(), ids(&[0, 4]).as_slice());
    }

    #[test]
    fn map_lookup_by_slice() {
        let mut supports = rustc_hash::FxHashMap::default();
        supports.insert(ItemSet::new(ids(&[1, 5])), 0.25);

        let probe = ids(&[1, 5]);
        assert_eq!(supports.get(probe.as_slice()), Some(&0.25));
    }
}
