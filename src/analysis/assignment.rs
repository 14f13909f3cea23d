// Released under MIT License.
// Copyright (c) 2023-2025 Ladislav Bartos

//! Greedy resolution of candidate waters competing for reference slots.

use hashbrown::HashSet;
use indexmap::IndexMap;

use crate::structures::residue::ResidueKey;

/// Unique pairing of reference slots with candidate waters.
///
/// Each slot and each candidate appears in at most one pair.
/// Pairs are stored in the order in which the slots were claimed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Assignment {
    pairs: Vec<(usize, ResidueKey)>,
}

impl Assignment {
    /// Get the number of claimed slots.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Returns `true` if no slot has been claimed.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Returns `true` if all `n_slots` reference slots have been claimed.
    #[inline(always)]
    pub fn is_complete(&self, n_slots: usize) -> bool {
        self.pairs.len() == n_slots
    }

    /// Get the (slot index, candidate) pairs.
    #[inline(always)]
    pub fn get_pairs(&self) -> &[(usize, ResidueKey)] {
        &self.pairs
    }

    /// Get the candidate which claimed the given slot.
    pub fn get_candidate(&self, slot: usize) -> Option<&ResidueKey> {
        self.pairs
            .iter()
            .find(|(claimed, _)| *claimed == slot)
            .map(|(_, key)| key)
    }
}

/// Assign candidate waters to the reference slots they satisfy.
///
/// ## Details
/// 1. Candidates are ordered by the number of satisfied slots (descending).
///    Candidates satisfying the same number of slots are ordered by their residue key (ascending).
/// 2. In this order, each candidate claims the lowest-index slot it satisfies
///    that has not been claimed by a previous candidate.
/// 3. Candidates with no unclaimed satisfied slot are not assigned.
///
/// This is a greedy approximation of maximum bipartite matching and the result is
/// not guaranteed to be the largest possible assignment.
/// The result does not depend on the order of the candidates in `candidates`.
///
/// ## Example
/// ```
/// # use watrack_rs::analysis::assignment::resolve_assignment;
/// # use watrack_rs::structures::residue::ResidueKey;
/// # use indexmap::IndexMap;
/// #
/// let mut candidates = IndexMap::new();
/// candidates.insert(ResidueKey::new("A", "5"), vec![0]);
/// candidates.insert(ResidueKey::new("A", "7"), vec![0, 1]);
///
/// // A:7 satisfies more slots and is assigned first
/// let assignment = resolve_assignment(&candidates);
/// assert_eq!(assignment.len(), 1);
/// assert_eq!(assignment.get_candidate(0), Some(&ResidueKey::new("A", "7")));
/// ```
pub fn resolve_assignment(candidates: &IndexMap<ResidueKey, Vec<usize>>) -> Assignment {
    let mut ordered = candidates
        .iter()
        .filter(|(_, slots)| !slots.is_empty())
        .collect::<Vec<(&ResidueKey, &Vec<usize>)>>();

    ordered.sort_by(|(key1, slots1), (key2, slots2)| {
        slots2.len().cmp(&slots1.len()).then_with(|| key1.cmp(key2))
    });

    let mut claimed = HashSet::new();
    let mut pairs = Vec::new();

    for (key, slots) in ordered {
        let free = slots
            .iter()
            .copied()
            .filter(|slot| !claimed.contains(slot))
            .min();

        if let Some(slot) = free {
            claimed.insert(slot);
            pairs.push((slot, key.clone()));
        }
    }

    Assignment { pairs }
}

/******************************/
/*         UNIT TESTS         */
/******************************/

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};

    fn key(chain: &str, residue: &str) -> ResidueKey {
        ResidueKey::new(chain, residue)
    }

    #[test]
    fn empty() {
        let assignment = resolve_assignment(&IndexMap::new());
        assert!(assignment.is_empty());
        assert!(assignment.is_complete(0));
        assert!(!assignment.is_complete(1));
    }

    #[test]
    fn unique_candidates() {
        let mut candidates = IndexMap::new();
        candidates.insert(key("A", "1"), vec![0]);
        candidates.insert(key("B", "2"), vec![1]);
        candidates.insert(key("B", "3"), vec![]);

        let assignment = resolve_assignment(&candidates);
        assert_eq!(assignment.len(), 2);
        assert!(assignment.is_complete(2));
        assert_eq!(assignment.get_candidate(0), Some(&key("A", "1")));
        assert_eq!(assignment.get_candidate(1), Some(&key("B", "2")));
        assert_eq!(assignment.get_candidate(2), None);
    }

    #[test]
    fn lowest_slot_claimed() {
        let mut candidates = IndexMap::new();
        candidates.insert(key("A", "1"), vec![2, 0, 1]);

        let assignment = resolve_assignment(&candidates);
        assert_eq!(assignment.get_pairs(), &[(0, key("A", "1"))]);
    }

    #[test]
    fn high_degree_first() {
        let mut candidates = IndexMap::new();
        candidates.insert(key("A", "1"), vec![1]);
        candidates.insert(key("A", "2"), vec![0, 1]);
        candidates.insert(key("A", "3"), vec![0, 1, 2]);

        // A:3 claims 0, A:2 claims 1, A:1 is left without a slot
        let assignment = resolve_assignment(&candidates);
        assert_eq!(
            assignment.get_pairs(),
            &[(0, key("A", "3")), (1, key("A", "2"))]
        );
    }

    #[test]
    fn greedy_not_optimal() {
        let mut candidates = IndexMap::new();
        candidates.insert(key("A", "1"), vec![0]);
        candidates.insert(key("A", "2"), vec![0, 1]);

        // A:2 -> 1 and A:1 -> 0 would claim both slots
        let assignment = resolve_assignment(&candidates);
        assert_eq!(assignment.len(), 1);
        assert_eq!(assignment.get_candidate(0), Some(&key("A", "2")));
        assert_eq!(assignment.get_candidate(1), None);
    }

    #[test]
    fn ties_broken_by_key() {
        let mut candidates = IndexMap::new();
        candidates.insert(key("B", "1"), vec![0]);
        candidates.insert(key("A", "10"), vec![0]);
        candidates.insert(key("A", "9"), vec![0]);

        let assignment = resolve_assignment(&candidates);
        assert_eq!(assignment.get_pairs(), &[(0, key("A", "9"))]);
    }

    fn random_candidates(rng: &mut StdRng, n_slots: usize) -> IndexMap<ResidueKey, Vec<usize>> {
        let n_candidates = rng.gen_range(0..12);
        let mut candidates = IndexMap::new();

        for i in 0..n_candidates {
            let chain = if rng.gen_bool(0.5) { "A" } else { "B" };
            let mut slots = (0..n_slots)
                .filter(|_| rng.gen_bool(0.4))
                .collect::<Vec<usize>>();
            slots.shuffle(rng);
            candidates.insert(key(chain, &i.to_string()), slots);
        }

        candidates
    }

    #[test]
    fn random_invariants() {
        let mut rng = StdRng::seed_from_u64(20231012);

        for _ in 0..2000 {
            let n_slots = rng.gen_range(0..8);
            let candidates = random_candidates(&mut rng, n_slots);
            let assignment = resolve_assignment(&candidates);

            assert!(assignment.len() <= n_slots.min(candidates.len()));

            let slots = assignment
                .get_pairs()
                .iter()
                .map(|(slot, _)| *slot)
                .collect::<HashSet<usize>>();
            assert_eq!(slots.len(), assignment.len());

            let keys = assignment
                .get_pairs()
                .iter()
                .map(|(_, key)| key.clone())
                .collect::<HashSet<ResidueKey>>();
            assert_eq!(keys.len(), assignment.len());

            for (slot, key) in assignment.get_pairs() {
                assert!(candidates.get(key).unwrap().contains(slot));
            }

            // any candidate with at least one satisfied slot gets something
            // if a slot it satisfies remains unclaimed
            for (key, satisfied) in candidates.iter() {
                if keys.contains(key) {
                    continue;
                }
                assert!(satisfied.iter().all(|slot| slots.contains(slot)));
            }
        }
    }

    #[test]
    fn random_order_independent() {
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..500 {
            let n_slots = rng.gen_range(1..6);
            let candidates = random_candidates(&mut rng, n_slots);

            let mut entries = candidates.clone().into_iter().collect::<Vec<_>>();
            entries.shuffle(&mut rng);
            let shuffled = entries.into_iter().collect::<IndexMap<ResidueKey, Vec<usize>>>();

            assert_eq!(resolve_assignment(&candidates), resolve_assignment(&shuffled));
        }
    }
}
