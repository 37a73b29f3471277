use rustc_hash::FxHashSet;
use smallvec::SmallVec;
use tracing::debug;

use super::ItemSet;
use crate::dataset::ItemId;

/// Builds the size-`k` candidates from the frequent itemsets of size `k - 1`.
///
/// Two itemsets join when their first `k - 2` items agree; the candidate is
/// the first itemset extended with the last item of the second. For `k > 2`
/// a candidate survives only if each of its `k` subsets of size `k - 1` is in
/// `previous`. Output follows pair enumeration order. An empty `previous`
/// gives no candidates.
pub fn generate_candidates<T: AsRef<[ItemId]>>(previous: &[T], k: usize) -> Vec<ItemSet> {
    if k < 2 {
        return Vec::new();
    }
    let prefix = k - 2;
    let known: FxHashSet<&[ItemId]> = if k > 2 {
        previous.iter().map(AsRef::as_ref).collect()
    } else {
        FxHashSet::default()
    };

    let mut candidates = Vec::new();
    let mut pruned = 0usize;
    let mut scratch: SmallVec<[ItemId; 8]> = SmallVec::new();

    for (i, left) in previous.iter().enumerate() {
        let left = left.as_ref();
        if left.len() != k - 1 {
            continue;
        }
        for right in &previous[i + 1..] {
            let right = right.as_ref();
            if right.len() != k - 1 || left[..prefix] != right[..prefix] {
                continue;
            }
            if left[prefix] == right[prefix] {
                continue;
            }

            let mut ids: SmallVec<[ItemId; 8]> = SmallVec::from_slice(left);
            ids.push(right[prefix]);
            ids.sort_unstable();

            if k > 2 && !all_subsets_known(&ids, &known, &mut scratch) {
                pruned += 1;
                continue;
            }
            candidates.push(ItemSet::from_sorted(ids));
        }
    }

    debug!(
        k,
        previous = previous.len(),
        candidates = candidates.len(),
        pruned,
        "generated candidates"
    );
    candidates
}

fn all_subsets_known(
    ids: &[ItemId],
    known: &FxHashSet<&[ItemId]>,
    scratch: &mut SmallVec<[ItemId; 8]>,
) -> bool {
    (0..ids.len()).all(|skip| {
        scratch.clear();
        scratch.extend(
            ids.iter()
                .enumerate()
                .filter(|&(position, _)| position != skip)
                .map(|(_, &id)| id),
        );
        known.contains(scratch.as_slice())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(raw: &[usize]) -> ItemSet {
        ItemSet::new(raw.iter().copied().map(ItemId::from_index))
    }

    fn raw(candidates: &[ItemSet]) -> Vec<Vec<usize>> {
        candidates
            .iter()
            .map(|c| c.items().iter().map(|id| id.index()).collect())
            .collect()
    }

    #[test]
    fn pairs_join_unconditionally() {
        let singles = [set(&[0]), set(&[1]), set(&[2])];
        let candidates = generate_candidates(&singles, 2);
        assert_eq!(raw(&candidates), vec![vec![0, 1], vec![0, 2], vec![1, 2]]);
    }

    #[test]
    fn join_requires_shared_prefix() {
        let pairs = [set(&[0, 1]), set(&[0, 2]), set(&[1, 2]), set(&[1, 3])];
        let candidates = generate_candidates(&pairs, 3);
        // {1,2,3} is pruned because {2,3} is not frequent.
        assert_eq!(raw(&candidates), vec![vec![0, 1, 2]]);
    }

    #[test]
    fn prune_rejects_candidates_with_infrequent_subsets() {
        let pairs = [set(&[0, 1]), set(&[0, 2])];
        let candidates = generate_candidates(&pairs, 3);
        assert!(candidates.is_empty());
    }

    #[test]
    fn quadruples_from_triples() {
        let triples = [
            set(&[0, 1, 2]),
            set(&[0, 1, 3]),
            set(&[0, 2, 3]),
            set(&[1, 2, 3]),
            set(&[0, 1, 4]),
        ];
        let candidates = generate_candidates(&triples, 4);
        assert_eq!(raw(&candidates), vec![vec![0, 1, 2, 3]]);
    }

    #[test]
    fn empty_level_gives_no_candidates() {
        let none: [ItemSet; 0] = [];
        assert!(generate_candidates(&none, 2).is_empty());
        assert!(generate_candidates(&none, 5).is_empty());
    }
}
