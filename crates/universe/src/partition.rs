//! Pair id to row positions mapping, built once per universe.

use std::collections::BTreeMap;

use universe_core::PairId;

/// Row positions of every pair, each list in table order.
#[derive(Debug, Clone, Default)]
pub struct KeyPartition {
    groups: BTreeMap<PairId, Vec<usize>>,
}

impl KeyPartition {
    /// Group row positions by their pair id.
    pub fn build(keys: &[PairId]) -> Self {
        let mut groups: BTreeMap<PairId, Vec<usize>> = BTreeMap::new();
        for (position, &pair_id) in keys.iter().enumerate() {
            groups.entry(pair_id).or_default().push(position);
        }
        Self { groups }
    }

    /// Number of distinct pairs.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Positions for a pair; empty if the pair has no rows.
    pub fn get(&self, pair_id: PairId) -> &[usize] {
        self.groups.get(&pair_id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn pair_ids(&self) -> impl Iterator<Item = PairId> + '_ {
        self.groups.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (PairId, &[usize])> + '_ {
        self.groups
            .iter()
            .map(|(&pair_id, positions)| (pair_id, positions.as_slice()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_groups_in_row_order() {
        let partition = KeyPartition::build(&[5, 1, 5, 2, 1, 5]);
        assert_eq!(partition.len(), 3);
        assert_eq!(partition.get(5), &[0, 2, 5]);
        assert_eq!(partition.get(1), &[1, 4]);
        assert_eq!(partition.get(2), &[3]);
        assert!(partition.get(9).is_empty());
    }

    #[test]
    fn test_every_row_in_exactly_one_group() {
        let keys = [3, 3, 1, 4, 1, 5, 9, 2, 6];
        let partition = KeyPartition::build(&keys);
        let mut seen: Vec<usize> = partition.iter().flat_map(|(_, p)| p.iter().copied()).collect();
        seen.sort_unstable();
        assert_eq!(seen, (0..keys.len()).collect::<Vec<_>>());
        assert_eq!(partition.pair_ids().collect::<Vec<_>>(), vec![1, 2, 3, 4, 5, 6, 9]);
    }

    #[test]
    fn test_empty_partition() {
        let partition = KeyPartition::build(&[]);
        assert!(partition.is_empty());
        assert_eq!(partition.pair_ids().count(), 0);
    }
}
