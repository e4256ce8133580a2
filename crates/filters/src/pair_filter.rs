//! Pair filters over candle and liquidity sample tables.

use std::collections::HashSet;

use tracing::debug;
use universe_core::{PairDescriptor, PairId, Result, Table, PAIR_ID_COLUMN};

/// Keep only the rows whose `pair_id` is one of `pair_ids`.
///
/// Row order is preserved. An empty id set yields an empty table with the
/// same columns.
pub fn filter_for_pair_ids<I>(samples: &Table, pair_ids: I) -> Result<Table>
where
    I: IntoIterator<Item = PairId>,
{
    filter_column_for_pair_ids(samples, PAIR_ID_COLUMN, pair_ids)
}

/// [`filter_for_pair_ids`] for tables keyed by a column other than `pair_id`,
/// e.g. the one named by `UniverseConfig::pair_column`.
pub fn filter_column_for_pair_ids<I>(samples: &Table, column: &str, pair_ids: I) -> Result<Table>
where
    I: IntoIterator<Item = PairId>,
{
    let wanted: HashSet<PairId> = pair_ids.into_iter().collect();
    let keys = samples.pair_id_column(column)?;

    let positions = keys
        .iter()
        .enumerate()
        .filter(|(_, key)| wanted.contains(*key))
        .map(|(position, _)| position);
    let filtered = samples.select(positions);

    debug!(
        column,
        pairs = wanted.len(),
        rows_in = samples.len(),
        rows_out = filtered.len(),
        "filtered samples for pairs"
    );
    Ok(filtered)
}

/// Keep only the rows belonging to pairs listed in a pair metadata table.
///
/// `pairs` is the server's pair table; only its `pair_id` column is read.
pub fn filter_for_pairs(samples: &Table, pairs: &Table) -> Result<Table> {
    let pair_ids = pairs.pair_id_column(PAIR_ID_COLUMN)?;
    filter_for_pair_ids(samples, pair_ids)
}

/// Keep only the rows of a single trading pair.
///
/// Fails if `pair` does not describe a trading pair, rather than returning an
/// empty table.
pub fn filter_for_single_pair<P>(samples: &Table, pair: &P) -> Result<Table>
where
    P: PairDescriptor + ?Sized,
{
    let pair_id = pair.resolve_pair_id()?;
    filter_for_pair_ids(samples, [pair_id])
}
