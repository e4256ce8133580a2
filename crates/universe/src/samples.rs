//! Borrowed query results.

use std::borrow::Cow;

use universe_core::{PairId, Result, RowRef, Table, Timestamp, Value};

/// A set of rows selected from a universe's table.
///
/// Holds row positions only; cells stay in the universe. Use
/// [`Samples::to_table`] to get an owned copy.
#[derive(Debug, Clone)]
pub struct Samples<'a> {
    table: &'a Table,
    keys: &'a [PairId],
    timestamps: &'a [Timestamp],
    positions: Cow<'a, [usize]>,
}

impl<'a> Samples<'a> {
    pub(crate) fn new(
        table: &'a Table,
        keys: &'a [PairId],
        timestamps: &'a [Timestamp],
        positions: Cow<'a, [usize]>,
    ) -> Self {
        Self {
            table,
            keys,
            timestamps,
            positions,
        }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Positions of the selected rows in the universe's table.
    pub fn positions(&self) -> &[usize] {
        &self.positions
    }

    pub fn get(&self, i: usize) -> Option<RowRef<'a>> {
        self.positions.get(i).and_then(|&position| self.table.row(position))
    }

    pub fn first(&self) -> Option<RowRef<'a>> {
        self.get(0)
    }

    pub fn last(&self) -> Option<RowRef<'a>> {
        self.positions.len().checked_sub(1).and_then(|i| self.get(i))
    }

    pub fn iter(&self) -> impl Iterator<Item = RowRef<'a>> + '_ {
        let table = self.table;
        self.positions.iter().filter_map(move |&position| table.row(position))
    }

    /// UTC timestamps of the selected rows.
    pub fn timestamps(&self) -> impl Iterator<Item = Timestamp> + '_ {
        self.positions.iter().map(move |&position| self.timestamps[position])
    }

    pub fn pair_ids(&self) -> impl Iterator<Item = PairId> + '_ {
        self.positions.iter().map(move |&position| self.keys[position])
    }

    /// Cells of one column for the selected rows.
    pub fn column(&self, name: &str) -> Result<Vec<&'a Value>> {
        let index = self.table.require_column(name)?;
        Ok(self.iter().map(|row| &row.values()[index]).collect())
    }

    /// Copy the selected rows into a new table.
    pub fn to_table(&self) -> Table {
        self.table.select(self.positions.iter().copied())
    }
}
