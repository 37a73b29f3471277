//! Transactions over an interned, sorted item universe.
//!
//! Items are interned once when a [`Dataset`] is frozen. Ids are handed out in
//! ascending name order, so comparing two [`ItemId`]s gives the same answer as
//! comparing the item names they stand for.

use std::fmt;

use rustc_hash::FxHashMap;

/// Interned identifier of an item within one [`Dataset`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ItemId(u32);

impl ItemId {
    pub(crate) fn from_index(index: usize) -> Self {
        debug_assert!(index <= u32::MAX as usize);
        ItemId(index as u32)
    }

    /// Position of the item in [`Dataset::universe`].
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A basket: distinct item ids in ascending order.
pub type Transaction = Box<[ItemId]>;

/// Immutable collection of transactions plus the universe of items they use.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    transactions: Vec<Transaction>,
    universe: Vec<String>,
}

impl Dataset {
    /// Builds a dataset where every inner iterator is one transaction.
    /// Duplicate items inside a transaction collapse to one.
    pub fn from_transactions<I, T, S>(transactions: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut builder = DatasetBuilder::new();
        for transaction in transactions {
            builder.push_transaction(transaction);
        }
        builder.build()
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// Distinct item names, strictly ascending.
    pub fn universe(&self) -> &[String] {
        &self.universe
    }

    /// Number of transactions.
    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// Ids of every item in the universe, ascending.
    pub fn item_ids(&self) -> impl Iterator<Item = ItemId> + '_ {
        (0..self.universe.len()).map(ItemId::from_index)
    }

    /// Name of an interned item.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not produced by this dataset.
    pub fn item_name(&self, id: ItemId) -> &str {
        &self.universe[id.index()]
    }

    pub fn item_id(&self, name: &str) -> Option<ItemId> {
        self.universe
            .binary_search_by(|probe| probe.as_str().cmp(name))
            .ok()
            .map(ItemId::from_index)
    }

    /// Resolves a list of ids to item names, keeping their order.
    pub fn item_names<'a>(&'a self, ids: &[ItemId]) -> Vec<&'a str> {
        ids.iter().map(|&id| self.item_name(id)).collect()
    }
}

/// Mutable accumulator that groups items by basket and freezes into a
/// [`Dataset`].
///
/// Item names are interned provisionally while baskets are filled; `build`
/// sorts the universe once and remaps every basket onto the final ids.
#[derive(Debug, Default)]
pub struct DatasetBuilder {
    names: Vec<String>,
    lookup: FxHashMap<String, u32>,
    baskets: Vec<Vec<u32>>,
    basket_index: FxHashMap<String, usize>,
}

impl DatasetBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `item` as a member of basket `basket`. Baskets keep the order in
    /// which they were first seen.
    pub fn add(&mut self, basket: &str, item: &str) {
        let slot = match self.basket_index.get(basket) {
            Some(&slot) => slot,
            None => {
                self.baskets.push(Vec::new());
                let slot = self.baskets.len() - 1;
                self.basket_index.insert(basket.to_owned(), slot);
                slot
            }
        };
        let id = self.intern(item);
        self.baskets[slot].push(id);
    }

    /// Appends an anonymous basket holding `items`.
    pub fn push_transaction<T, S>(&mut self, items: T)
    where
        T: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let basket = items
            .into_iter()
            .map(|item| self.intern(item.as_ref()))
            .collect();
        self.baskets.push(basket);
    }

    /// Number of baskets collected so far.
    pub fn basket_count(&self) -> usize {
        self.baskets.len()
    }

    pub fn build(self) -> Dataset {
        let mut order: Vec<usize> = (0..self.names.len()).collect();
        order.sort_unstable_by(|&a, &b| self.names[a].cmp(&self.names[b]));

        let mut remap = vec![ItemId::from_index(0); self.names.len()];
        for (rank, &provisional) in order.iter().enumerate() {
            remap[provisional] = ItemId::from_index(rank);
        }

        let transactions = self
            .baskets
            .into_iter()
            .map(|basket| {
                let mut ids: Vec<ItemId> = basket.into_iter().map(|p| remap[p as usize]).collect();
                ids.sort_unstable();
                ids.dedup();
                ids.into_boxed_slice()
            })
            .collect();

        let mut names: Vec<Option<String>> = self.names.into_iter().map(Some).collect();
        let universe = order
            .into_iter()
            .filter_map(|provisional| names[provisional].take())
            .collect();

        Dataset {
            transactions,
            universe,
        }
    }

    fn intern(&mut self, item: &str) -> u32 {
        if let Some(&id) = self.lookup.get(item) {
            return id;
        }
        let id = self.names.len() as u32;
        self.names.push(item.to_owned());
        self.lookup.insert(item.to_owned(), id);
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn universe_is_sorted_and_distinct() {
        let dataset = Dataset::from_transactions([
            vec!["milk", "bread"],
            vec!["butter", "bread", "bread"],
        ]);

        assert_eq!(dataset.universe(), ["bread", "butter", "milk"]);
        assert_eq!(dataset.len(), 2);
    }

    #[test]
    fn transactions_are_sorted_and_deduplicated() {
        let dataset = Dataset::from_transactions([vec!["milk", "bread", "milk"]]);
        let bread = dataset.item_id("bread").unwrap();
        let milk = dataset.item_id("milk").unwrap();

        assert_eq!(&*dataset.transactions()[0], &[bread, milk]);
    }

    #[test]
    fn id_order_matches_name_order() {
        let dataset = Dataset::from_transactions([vec!["zebra", "apple", "mango"]]);
        let ids: Vec<ItemId> = dataset.item_ids().collect();
        let names = dataset.item_names(&ids);

        assert_eq!(names, ["apple", "mango", "zebra"]);
        assert!(dataset.item_id("apple") < dataset.item_id("zebra"));
        assert_eq!(dataset.item_id("kiwi"), None);
    }

    #[test]
    fn builder_groups_rows_by_basket() {
        let mut builder = DatasetBuilder::new();
        builder.add("b1", "milk");
        builder.add("b2", "bread");
        builder.add("b1", "bread");
        builder.add("b1", "milk");
        assert_eq!(builder.basket_count(), 2);

        let dataset = builder.build();
        let names: Vec<Vec<&str>> = dataset
            .transactions()
            .iter()
            .map(|t| dataset.item_names(t))
            .collect();

        assert_eq!(names, vec![vec!["bread", "milk"], vec!["bread"]]);
    }

    #[test]
    fn empty_builder_yields_empty_dataset() {
        let dataset = DatasetBuilder::new().build();
        assert!(dataset.is_empty());
        assert!(dataset.universe().is_empty());
    }
}
