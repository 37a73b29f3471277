use std::ops::ControlFlow;
use std::time::{Duration, Instant};

use tracing::{debug, info, instrument};

use super::{generate_candidates, support, Dataset, FrequentItemset, ItemSet, ItemSetMiner};

/// Level-wise Apriori search bounded by a maximum itemset length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Apriori {
    max_len: usize,
}

/// What one finished level of the search produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelSummary {
    /// Itemset length of this level.
    pub k: usize,
    /// Candidates whose support was counted.
    pub candidates: usize,
    /// Candidates that met the support threshold.
    pub frequent: usize,
    pub elapsed: Duration,
}

impl Apriori {
    pub fn new(max_len: usize) -> Self {
        Apriori { max_len }
    }

    pub fn max_len(&self) -> usize {
        self.max_len
    }

    /// Runs the search, reporting each completed level to `observer`.
    ///
    /// Levels are all-or-nothing: the observer only sees a level after its
    /// support counting is done, and returning [`ControlFlow::Break`] keeps
    /// that level and every earlier one but starts no further level.
    #[instrument(
        skip(self, dataset, observer),
        fields(transactions = dataset.len(), max_len = self.max_len)
    )]
    pub fn mine_levels<F>(
        &self,
        dataset: &Dataset,
        sup_min: f64,
        mut observer: F,
    ) -> Vec<FrequentItemset>
    where
        F: FnMut(&LevelSummary) -> ControlFlow<()>,
    {
        let mut result = Vec::new();
        if self.max_len == 0 {
            return result;
        }
        info!(items = dataset.universe().len(), sup_min, "mining frequent itemsets");

        let mut k = 1;
        let mut started = Instant::now();
        let mut counted = dataset.universe().len();
        let mut level: Vec<FrequentItemset> = dataset
            .item_ids()
            .filter_map(|id| keep_frequent(ItemSet::single(id), dataset, sup_min))
            .collect();

        loop {
            let summary = LevelSummary {
                k,
                candidates: counted,
                frequent: level.len(),
                elapsed: started.elapsed(),
            };
            info!(k, candidates = counted, frequent = level.len(), "level complete");
            let flow = observer(&summary);

            if level.is_empty() {
                break;
            }
            if flow.is_break() {
                debug!(k, "mining stopped between levels");
                result.append(&mut level);
                break;
            }
            if k >= self.max_len {
                result.append(&mut level);
                break;
            }

            k += 1;
            started = Instant::now();
            let candidates = generate_candidates(&level, k);
            counted = candidates.len();
            result.append(&mut level);
            level = candidates
                .into_iter()
                .filter_map(|candidate| keep_frequent(candidate, dataset, sup_min))
                .collect();
        }

        info!(itemsets = result.len(), "mining finished");
        result
    }
}

impl ItemSetMiner for Apriori {
    fn mine(&self, dataset: &Dataset, sup_min: f64) -> Vec<FrequentItemset> {
        self.mine_levels(dataset, sup_min, |_| ControlFlow::Continue(()))
    }
}

/// Mines every itemset of at most `max_len` items whose support is at least
/// `min_support`. Results are ordered by length; order within one length is
/// not part of the contract.
///
/// `0 < min_support <= 1` and `max_len >= 1` are the caller's to check. Out of
/// range values still give a well-defined result: `max_len == 0` yields
/// nothing, a NaN threshold admits nothing, and a non-positive threshold
/// admits every candidate.
pub fn mine_frequent_itemsets(
    dataset: &Dataset,
    min_support: f64,
    max_len: usize,
) -> Vec<FrequentItemset> {
    Apriori::new(max_len).mine(dataset, min_support)
}

fn keep_frequent(itemset: ItemSet, dataset: &Dataset, sup_min: f64) -> Option<FrequentItemset> {
    let support = support(itemset.items(), dataset);
    (support >= sup_min).then_some(FrequentItemset { itemset, support })
}
