//! Global passport ranking
//!
//! Rank = 1-based position when every tracked country is ordered by
//! visa-free destinations, descending. Ties keep input order. The
//! ordering is computed over an index vector so the caller's data is
//! never reordered.

use crate::name_key;
use std::collections::HashMap;

/// Rank assignment for one input sequence, computed in a single pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RankTable {
    /// Rank of the item at each input position
    by_position: Vec<u32>,
    /// Input positions in rank order
    order: Vec<usize>,
    /// Case-insensitive name -> rank (first occurrence wins)
    by_name: HashMap<String, u32>,
}

impl RankTable {
    /// Rank `(country, can_travel_to)` pairs given in canonical order
    pub fn compute<'a, I>(items: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, u32)>,
    {
        let items: Vec<(&str, u32)> = items.into_iter().collect();

        let mut order: Vec<usize> = (0..items.len()).collect();
        // sort_by_key is stable, so equal counts stay in input order
        order.sort_by_key(|&i| std::cmp::Reverse(items[i].1));

        let mut by_position = vec![0u32; items.len()];
        let mut by_name = HashMap::with_capacity(items.len());
        for (slot, &position) in order.iter().enumerate() {
            let rank = slot as u32 + 1;
            by_position[position] = rank;
        }
        for (position, (name, _)) in items.iter().enumerate() {
            by_name.entry(name_key(name)).or_insert(by_position[position]);
        }

        Self {
            by_position,
            order,
            by_name,
        }
    }

    /// Rank of the item at `position` in the input sequence
    pub fn rank_at(&self, position: usize) -> Option<u32> {
        self.by_position.get(position).copied()
    }

    /// Rank by country name, case-insensitive
    pub fn rank_of(&self, country: &str) -> Option<u32> {
        self.by_name.get(&name_key(country)).copied()
    }

    /// Input positions from rank 1 downwards
    pub fn positions_in_rank_order(&self) -> &[usize] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.by_position.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_position.is_empty()
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    fn distinct_counts() -> impl Strategy<Value = Vec<u32>> {
        prop::collection::hash_set(0u32..=195, 1..60).prop_map(|s| s.into_iter().collect())
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(500))]

        // Distinct counts: ranks form a bijection onto 1..=N and the max holds rank 1
        #[test]
        fn fuzz_rank_is_bijection(counts in distinct_counts()) {
            let names: Vec<String> = (0..counts.len()).map(|i| format!("country-{i}")).collect();
            let ranks = RankTable::compute(names.iter().map(String::as_str).zip(counts.iter().copied()));

            let assigned: HashSet<u32> = (0..counts.len()).filter_map(|i| ranks.rank_at(i)).collect();
            let expected: HashSet<u32> = (1..=counts.len() as u32).collect();
            prop_assert_eq!(assigned, expected);

            let max_pos = counts.iter().enumerate().max_by_key(|(_, c)| **c).map(|(i, _)| i).unwrap();
            prop_assert_eq!(ranks.rank_at(max_pos), Some(1));
        }

        // Ties: recomputation is deterministic and dense
        #[test]
        fn fuzz_rank_stable_with_ties(counts in prop::collection::vec(0u32..=5, 1..40)) {
            let names: Vec<String> = (0..counts.len()).map(|i| format!("country-{i}")).collect();
            let pairs = || names.iter().map(String::as_str).zip(counts.iter().copied());

            let first = RankTable::compute(pairs());
            let second = RankTable::compute(pairs());
            prop_assert_eq!(&first, &second);

            let mut seen: Vec<u32> = (0..counts.len()).filter_map(|i| first.rank_at(i)).collect();
            seen.sort_unstable();
            prop_assert_eq!(seen, (1..=counts.len() as u32).collect::<Vec<_>>());

            // Among equal counts, earlier input always ranks higher
            for i in 0..counts.len() {
                for j in (i + 1)..counts.len() {
                    if counts[i] == counts[j] {
                        prop_assert!(first.rank_at(i) < first.rank_at(j));
                    }
                }
            }
        }
    }
}
