//! Ascending time index over a sample table.
//!
//! Entries are `(timestamp, row position)` pairs sorted by timestamp. Rows
//! sharing a timestamp keep their table order, so lookups return them in the
//! order they were delivered.

use universe_core::Timestamp;

/// Sorted `(timestamp, row position)` pairs.
#[derive(Debug, Clone, Default)]
pub struct TimeIndex {
    entries: Vec<(Timestamp, usize)>,
}

impl TimeIndex {
    /// Build from per-row UTC timestamps.
    pub fn build(timestamps: &[Timestamp]) -> Self {
        let mut entries: Vec<(Timestamp, usize)> = timestamps
            .iter()
            .copied()
            .enumerate()
            .map(|(position, ts)| (ts, position))
            .collect();
        // Stable: ties stay in row order.
        entries.sort_by_key(|&(ts, _)| ts);
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn first(&self) -> Option<Timestamp> {
        self.entries.first().map(|&(ts, _)| ts)
    }

    pub fn last(&self) -> Option<Timestamp> {
        self.entries.last().map(|&(ts, _)| ts)
    }

    /// Entries with `start <= ts <= end`.
    pub fn range(&self, start: Timestamp, end: Timestamp) -> &[(Timestamp, usize)] {
        let lo = self.entries.partition_point(|&(ts, _)| ts < start);
        let hi = self.entries.partition_point(|&(ts, _)| ts <= end);
        if lo >= hi {
            return &[];
        }
        &self.entries[lo..hi]
    }

    /// Entries exactly at `ts`.
    pub fn at(&self, ts: Timestamp) -> &[(Timestamp, usize)] {
        self.range(ts, ts)
    }

    /// Largest indexed timestamp that is `<= ts`.
    pub fn prior(&self, ts: Timestamp) -> Option<Timestamp> {
        let hi = self.entries.partition_point(|&(indexed, _)| indexed <= ts);
        hi.checked_sub(1).map(|i| self.entries[i].0)
    }

    /// Row positions of a slice of entries.
    pub fn positions(entries: &[(Timestamp, usize)]) -> Vec<usize> {
        entries.iter().map(|&(_, position)| position).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn hour(h: i64) -> Timestamp {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::hours(h)
    }

    fn make_index() -> TimeIndex {
        // Rows out of time order, two rows at hour 2.
        TimeIndex::build(&[hour(3), hour(1), hour(2), hour(0), hour(2)])
    }

    #[test]
    fn test_build_sorts_and_keeps_ties_in_row_order() {
        let index = make_index();
        assert_eq!(index.len(), 5);
        assert_eq!(TimeIndex::positions(&index.entries), vec![3, 1, 2, 4, 0]);
        assert_eq!(index.first(), Some(hour(0)));
        assert_eq!(index.last(), Some(hour(3)));
    }

    #[test]
    fn test_range_is_inclusive() {
        let index = make_index();
        assert_eq!(TimeIndex::positions(index.range(hour(1), hour(2))), vec![1, 2, 4]);
        assert_eq!(index.range(hour(-5), hour(10)).len(), 5);
        assert!(index.range(hour(4), hour(10)).is_empty());
        assert!(index.range(hour(2), hour(1)).is_empty());
    }

    #[test]
    fn test_at_returns_all_duplicates() {
        let index = make_index();
        assert_eq!(TimeIndex::positions(index.at(hour(2))), vec![2, 4]);
        assert!(index.at(hour(5)).is_empty());
    }

    #[test]
    fn test_prior() {
        let index = make_index();
        assert_eq!(index.prior(hour(2)), Some(hour(2)));
        assert_eq!(index.prior(hour(2) + Duration::minutes(30)), Some(hour(2)));
        assert_eq!(index.prior(hour(100)), Some(hour(3)));
        assert_eq!(index.prior(hour(-1)), None);
    }

    #[test]
    fn test_empty_index() {
        let index = TimeIndex::build(&[]);
        assert!(index.is_empty());
        assert_eq!(index.first(), None);
        assert_eq!(index.prior(hour(0)), None);
        assert!(index.range(hour(0), hour(1)).is_empty());
    }
}
