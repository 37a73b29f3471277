//! # Apriori Miner
//!
//! Frequent itemset mining and association rule generation over basket data,
//! using the level-wise Apriori search.
//!
//! ## Example
//!
//! ```rust
//! use apriori_miner::dataset::Dataset;
//! use apriori_miner::item_sets::mine_frequent_itemsets;
//! use apriori_miner::rules::generate_rules;
//!
//! let dataset = Dataset::from_transactions([
//!     vec!["bread", "milk"],
//!     vec!["bread", "butter"],
//!     vec!["bread", "milk", "butter"],
//!     vec!["milk"],
//! ]);
//!
//! let itemsets = mine_frequent_itemsets(&dataset, 0.5, 2);
//! let rules = generate_rules(&itemsets, 0.6).unwrap();
//! assert_eq!(itemsets.len(), 5);
//! assert_eq!(rules.len(), 4);
//! ```

pub mod benchmark;
pub mod config;
pub mod dataset;
pub mod error;
pub mod item_sets;
pub mod loader;
pub mod report;
pub mod rules;

pub use dataset::{Dataset, DatasetBuilder, ItemId};
pub use error::MiningError;
pub use item_sets::{mine_frequent_itemsets, Apriori, FrequentItemset, ItemSet, ItemSetMiner};
pub use rules::{generate_rules, AssociationRule};
