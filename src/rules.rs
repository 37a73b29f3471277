//! Association rules derived from mined frequent itemsets.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use tracing::{info, instrument};

use crate::dataset::ItemId;
use crate::error::MiningError;
use crate::item_sets::{FrequentItemset, ItemSet};

/// `antecedent => consequent`, a split of one frequent itemset into two
/// disjoint non-empty halves.
#[derive(Debug, Clone, PartialEq)]
pub struct AssociationRule {
    pub antecedent: ItemSet,
    pub consequent: ItemSet,
    /// Support of the whole itemset.
    pub support: f64,
    /// `support / support(antecedent)`.
    pub confidence: f64,
    /// `confidence / support(consequent)`; above 1 means positive association.
    pub lift: f64,
    /// `support - support(antecedent) * support(consequent)`.
    pub leverage: f64,
    /// `(1 - support(consequent)) / (1 - confidence)`, infinite when the
    /// consequent is in every transaction or the confidence is exactly 1.
    pub conviction: f64,
}

/// Enumerates every antecedent/consequent split of each itemset longer than
/// one item and keeps the rules with `confidence >= min_confidence`.
///
/// Rules follow the order of `itemsets`, then ascending antecedent bitmask
/// over item positions. Every subset of every itemset must itself be in
/// `itemsets`; lists produced by the miner always satisfy this, and a missing
/// subset is reported as [`MiningError::MissingSubsetSupport`].
#[instrument(skip(itemsets), fields(itemsets = itemsets.len()))]
pub fn generate_rules(
    itemsets: &[FrequentItemset],
    min_confidence: f64,
) -> Result<Vec<AssociationRule>, MiningError> {
    let supports: FxHashMap<&[ItemId], f64> = itemsets
        .iter()
        .map(|frequent| (frequent.items(), frequent.support))
        .collect();
    let lookup = |items: &[ItemId]| {
        supports
            .get(items)
            .copied()
            .ok_or_else(|| MiningError::MissingSubsetSupport {
                items: items.to_vec(),
            })
    };

    let mut rules = Vec::new();
    for frequent in itemsets.iter().filter(|f| f.length() > 1) {
        let items = frequent.items();
        let length = items.len();
        if length >= u64::BITS as usize {
            return Err(MiningError::ItemsetTooLarge { length });
        }

        let full: u64 = (1 << length) - 1;
        for mask in 1..full {
            let (antecedent, consequent) = split(items, mask);
            let antecedent_support = lookup(antecedent.as_slice())?;
            let consequent_support = lookup(consequent.as_slice())?;

            let confidence = frequent.support / antecedent_support;
            let confident = confidence >= min_confidence;
            if !confident {
                continue;
            }

            let lift = confidence / consequent_support;
            let leverage = frequent.support - antecedent_support * consequent_support;
            let conviction = if consequent_support == 1.0 || confidence == 1.0 {
                f64::INFINITY
            } else {
                (1.0 - consequent_support) / (1.0 - confidence)
            };

            rules.push(AssociationRule {
                antecedent: ItemSet::from_sorted(antecedent),
                consequent: ItemSet::from_sorted(consequent),
                support: frequent.support,
                confidence,
                lift,
                leverage,
                conviction,
            });
        }
    }

    info!(rules = rules.len(), min_confidence, "generated association rules");
    Ok(rules)
}

/// Items whose position bit is set in `mask`, and the rest. Both halves stay
/// ascending.
fn split(items: &[ItemId], mask: u64) -> (SmallVec<[ItemId; 8]>, SmallVec<[ItemId; 8]>) {
    let mut chosen = SmallVec::new();
    let mut rest = SmallVec::new();
    for (position, &item) in items.iter().enumerate() {
        if mask & (1 << position) != 0 {
            chosen.push(item);
        } else {
            rest.push(item);
        }
    }
    (chosen, rest)
}
