//! Grouped, time-indexed view over a flat sample table.
//!
//! The server ships candles (or liquidity samples) of every pair in one flat
//! table. [`GroupedUniverse`] takes ownership of such a table and builds:
//! - a pair id to row positions partition, for per-pair access
//! - an ascending time index, for cross-sectional and range queries
//!
//! Both are derived once. The universe has no mutation API, so it can be
//! shared between threads for reads.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::sync::OnceLock;

use tracing::{debug, trace};
use universe_core::{
    Error, PairId, Result, Table, TimeBucket, Timestamp, ToUtc, UniverseConfig,
};

use crate::index::TimeIndex;
use crate::partition::KeyPartition;
use crate::samples::Samples;

/// Candles or liquidity samples of many pairs, grouped by pair and indexed by time.
#[derive(Debug)]
pub struct GroupedUniverse {
    table: Table,
    config: UniverseConfig,
    /// Pair id of every row.
    keys: Vec<PairId>,
    /// UTC timestamp of every row.
    timestamps: Vec<Timestamp>,
    partition: KeyPartition,
    index: OnceLock<TimeIndex>,
}

impl GroupedUniverse {
    /// Build a universe over `table`.
    ///
    /// Fails with [`Error::InvalidArgument`] if the pair or timestamp column
    /// is missing, or a row holds something other than an unsigned pair id
    /// or a timestamp in them.
    pub fn new(table: Table, config: UniverseConfig) -> Result<Self> {
        let keys = table.pair_id_column(&config.pair_column)?;
        let timestamps = normalize_timestamps(&table, &config.timestamp_column)?;
        let partition = KeyPartition::build(&keys);

        let index = if config.auto_index {
            OnceLock::from(TimeIndex::build(&timestamps))
        } else {
            OnceLock::new()
        };

        debug!(
            rows = table.len(),
            pairs = partition.len(),
            time_bucket = %config.time_bucket,
            auto_index = config.auto_index,
            "built grouped universe"
        );

        Ok(Self {
            table,
            config,
            keys,
            timestamps,
            partition,
            index,
        })
    }

    /// Build with the default configuration (daily bars, `timestamp` column).
    pub fn from_table(table: Table) -> Result<Self> {
        Self::new(table, UniverseConfig::default())
    }

    pub fn config(&self) -> &UniverseConfig {
        &self.config
    }

    pub fn time_bucket(&self) -> TimeBucket {
        self.config.time_bucket
    }

    pub fn timestamp_column(&self) -> &str {
        &self.config.timestamp_column
    }

    /// The underlying flat table.
    pub fn table(&self) -> &Table {
        &self.table
    }

    fn time_index(&self) -> &TimeIndex {
        self.index.get_or_init(|| {
            debug!(rows = self.timestamps.len(), "building deferred time index");
            TimeIndex::build(&self.timestamps)
        })
    }

    fn samples<'a>(&'a self, positions: Cow<'a, [usize]>) -> Samples<'a> {
        Samples::new(&self.table, &self.keys, &self.timestamps, positions)
    }

    pub fn column_names(&self) -> &[String] {
        self.table.columns()
    }

    /// Total number of samples over all pairs.
    pub fn sample_count(&self) -> usize {
        self.table.len()
    }

    pub fn pair_count(&self) -> usize {
        self.partition.len()
    }

    /// All samples of one pair, in table order. Empty if the pair is absent.
    pub fn samples_by_pair(&self, pair_id: PairId) -> Samples<'_> {
        self.samples(Cow::Borrowed(self.partition.get(pair_id)))
    }

    /// Pair ids present in the universe, ascending.
    pub fn pair_ids(&self) -> impl Iterator<Item = PairId> + '_ {
        self.partition.pair_ids()
    }

    /// Every pair with its samples, ascending by pair id.
    pub fn all_pairs(&self) -> impl Iterator<Item = (PairId, Samples<'_>)> + '_ {
        self.partition
            .iter()
            .map(move |(pair_id, positions)| (pair_id, self.samples(Cow::Borrowed(positions))))
    }

    /// Samples of all pairs at exactly `ts`.
    ///
    /// Every matching row is returned, duplicates included. Fails with
    /// [`Error::NotFound`] when no sample sits at `ts`.
    pub fn samples_at(&self, ts: impl ToUtc) -> Result<Samples<'_>> {
        let ts = ts.try_to_utc()?;
        let entries = self.time_index().at(ts);
        if entries.is_empty() {
            return Err(Error::not_found(format!("the universe does not contain a sample at {ts}")));
        }
        trace!(%ts, rows = entries.len(), "samples at timestamp");
        Ok(self.samples(Cow::Owned(TimeIndex::positions(entries))))
    }

    /// Samples of all pairs with `start <= timestamp <= end`, in time order.
    ///
    /// Both bounds are inclusive. Requires `start < end`.
    pub fn samples_in_range(&self, start: impl ToUtc, end: impl ToUtc) -> Result<Samples<'_>> {
        let (start, end) = check_range(start, end)?;
        let entries = self.time_index().range(start, end);
        trace!(%start, %end, rows = entries.len(), "samples in range");
        Ok(self.samples(Cow::Owned(TimeIndex::positions(entries))))
    }

    /// Same rows as [`GroupedUniverse::samples_in_range`], grouped by pair.
    ///
    /// Pairs without samples in the range are absent; no group is empty.
    pub fn samples_in_range_by_pair(
        &self,
        start: impl ToUtc,
        end: impl ToUtc,
    ) -> Result<BTreeMap<PairId, Samples<'_>>> {
        let (start, end) = check_range(start, end)?;
        let mut groups: BTreeMap<PairId, Vec<usize>> = BTreeMap::new();
        for &(_, position) in self.time_index().range(start, end) {
            groups.entry(self.keys[position]).or_default().push(position);
        }
        trace!(%start, %end, pairs = groups.len(), "samples in range by pair");
        Ok(groups
            .into_iter()
            .map(|(pair_id, positions)| (pair_id, self.samples(Cow::Owned(positions))))
            .collect())
    }

    /// Earliest and latest timestamp in UTC, `(None, None)` when empty.
    pub fn timestamp_range(&self) -> (Option<Timestamp>, Option<Timestamp>) {
        let index = self.time_index();
        (index.first(), index.last())
    }

    /// Largest indexed timestamp at or before `ts`.
    ///
    /// Calibrates an arbitrary instant to the last bar actually present,
    /// e.g. the start of the latest weekly candle. Fails with
    /// [`Error::NotFound`] when `ts` precedes all samples.
    pub fn prior_timestamp(&self, ts: impl ToUtc) -> Result<Timestamp> {
        let ts = ts.try_to_utc()?;
        self.time_index()
            .prior(ts)
            .ok_or_else(|| Error::not_found(format!("no sample at or before {ts}")))
    }
}

fn check_range(start: impl ToUtc, end: impl ToUtc) -> Result<(Timestamp, Timestamp)> {
    let start = start.try_to_utc()?;
    let end = end.try_to_utc()?;
    if start >= end {
        return Err(Error::InvalidRange { start, end });
    }
    Ok((start, end))
}

fn normalize_timestamps(table: &Table, column: &str) -> Result<Vec<Timestamp>> {
    let index = table.require_column(column)?;
    table
        .rows()
        .map(|row| {
            let value = &row.values()[index];
            value.as_timestamp().ok_or_else(|| {
                Error::invalid_argument(format!(
                    "row {}: {column:?} must be a timestamp, got {} {value}",
                    row.position(),
                    value.type_name()
                ))
            })
        })
        .collect()
}
