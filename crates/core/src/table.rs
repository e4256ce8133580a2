//! Flat sample tables as delivered by the server.
//!
//! A [`Table`] mixes rows of many trading pairs. Columns are addressed by
//! name; every row carries exactly one cell per column.

use std::fmt;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Offset, TimeZone, Utc};
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::{PairId, Timestamp, ToUtc};

/// A single cell.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Value {
    Null,
    Bool(bool),
    UInt(u64),
    Int(i64),
    Float(OrderedFloat<f64>),
    Text(String),
    /// Naive timestamp, interpreted as UTC.
    Timestamp(NaiveDateTime),
    /// Timezone-aware timestamp.
    TimestampTz(DateTime<FixedOffset>),
}

impl Value {
    /// Short type name for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::UInt(_) => "uint",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Text(_) => "text",
            Value::Timestamp(_) => "timestamp",
            Value::TimestampTz(_) => "timestamptz",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Read the cell as a pair id. Only non-negative integers qualify.
    pub fn as_pair_id(&self) -> Option<PairId> {
        match *self {
            Value::UInt(v) => Some(v),
            Value::Int(v) => u64::try_from(v).ok(),
            _ => None,
        }
    }

    /// Numeric cells as `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Value::UInt(v) => Some(v as f64),
            Value::Int(v) => Some(v as f64),
            Value::Float(v) => Some(v.into_inner()),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Timestamp cells normalized to UTC.
    pub fn as_timestamp(&self) -> Option<Timestamp> {
        match self {
            Value::Timestamp(ts) => Some(Utc.from_utc_datetime(ts)),
            Value::TimestampTz(ts) => Some(ts.with_timezone(&Utc)),
            _ => None,
        }
    }

    /// Convert a JSON scalar from the server's record format.
    pub fn from_json(value: &serde_json::Value) -> Value {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(*b),
            serde_json::Value::Number(n) => {
                if let Some(v) = n.as_u64() {
                    Value::UInt(v)
                } else if let Some(v) = n.as_i64() {
                    Value::Int(v)
                } else {
                    Value::Float(OrderedFloat(n.as_f64().unwrap_or(f64::NAN)))
                }
            }
            serde_json::Value::String(s) => {
                Value::parse_timestamp(s).unwrap_or_else(|| Value::Text(s.clone()))
            }
            other => Value::Text(other.to_string()),
        }
    }

    /// Recognize the timestamp spellings the server uses: RFC 3339, naive
    /// ISO 8601 with `T` or space separator, or a bare date.
    pub fn parse_timestamp(s: &str) -> Option<Value> {
        if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
            return Some(Value::TimestampTz(ts));
        }
        for format in [
            "%Y-%m-%dT%H:%M:%S",
            "%Y-%m-%d %H:%M:%S",
            "%Y-%m-%dT%H:%M:%S%.f",
            "%Y-%m-%d %H:%M:%S%.f",
        ] {
            if let Ok(ts) = NaiveDateTime::parse_from_str(s, format) {
                return Some(Value::Timestamp(ts));
            }
        }
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(Value::Timestamp)
    }
}

impl ToUtc for Value {
    fn try_to_utc(&self) -> Result<Timestamp> {
        self.as_timestamp().ok_or_else(|| {
            Error::invalid_timestamp(format!("expected a timestamp, got {} {self}", self.type_name()))
        })
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(v) => write!(f, "{v}"),
            Value::UInt(v) => write!(f, "{v}"),
            Value::Int(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Text(v) => write!(f, "{v:?}"),
            Value::Timestamp(v) => write!(f, "{v}"),
            Value::TimestampTz(v) => write!(f, "{v}"),
        }
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Value::UInt(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(OrderedFloat(v))
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(v: NaiveDateTime) -> Self {
        Value::Timestamp(v)
    }
}

impl From<DateTime<FixedOffset>> for Value {
    fn from(v: DateTime<FixedOffset>) -> Self {
        Value::TimestampTz(v)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Value::TimestampTz(v.with_timezone(&Utc.fix()))
    }
}

/// Row-oriented flat table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Table {
    /// Create an empty table with the given columns.
    pub fn new<I, S>(columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let columns: Vec<String> = columns.into_iter().map(Into::into).collect();
        for (i, name) in columns.iter().enumerate() {
            if columns[..i].contains(name) {
                return Err(Error::invalid_argument(format!("duplicate column {name:?}")));
            }
        }
        Ok(Self {
            columns,
            rows: Vec::new(),
        })
    }

    /// Create a table from columns and row cells.
    pub fn from_rows<I, S>(columns: I, rows: Vec<Vec<Value>>) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut table = Self::new(columns)?;
        table.rows.reserve(rows.len());
        for row in rows {
            table.push_row(row)?;
        }
        Ok(table)
    }

    /// Parse a JSON array of records (objects keyed by column name).
    ///
    /// Columns appear in order of first appearance, walking each record's
    /// keys as written. Cells a record lacks are `Null`.
    pub fn from_json_records(json: &str) -> Result<Self> {
        let parsed: serde_json::Value = serde_json::from_str(json)?;
        Self::from_json_value(&parsed)
    }

    /// Same as [`Table::from_json_records`] for an already parsed document.
    pub fn from_json_value(records: &serde_json::Value) -> Result<Self> {
        let records = records
            .as_array()
            .ok_or_else(|| Error::invalid_argument("expected a JSON array of records"))?;

        let mut objects = Vec::with_capacity(records.len());
        let mut columns: Vec<String> = Vec::new();
        for record in records {
            let object = record
                .as_object()
                .ok_or_else(|| Error::invalid_argument(format!("expected a JSON object, got {record}")))?;
            for key in object.keys() {
                if !columns.contains(key) {
                    columns.push(key.clone());
                }
            }
            objects.push(object);
        }

        let rows = objects
            .into_iter()
            .map(|object| {
                columns
                    .iter()
                    .map(|column| object.get(column).map(Value::from_json).unwrap_or(Value::Null))
                    .collect()
            })
            .collect();

        Ok(Self { columns, rows })
    }

    /// Append a row. The row must have one cell per column.
    pub fn push_row(&mut self, row: Vec<Value>) -> Result<()> {
        if row.len() != self.columns.len() {
            return Err(Error::invalid_argument(format!(
                "row has {} cells, table has {} columns",
                row.len(),
                self.columns.len()
            )));
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Like [`Table::column_index`], failing when the column is missing.
    pub fn require_column(&self, name: &str) -> Result<usize> {
        self.column_index(name)
            .ok_or_else(|| Error::invalid_argument(format!("table has no {name:?} column")))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, position: usize) -> Option<RowRef<'_>> {
        (position < self.rows.len()).then_some(RowRef { table: self, position })
    }

    pub fn rows(&self) -> impl Iterator<Item = RowRef<'_>> + '_ {
        (0..self.rows.len()).map(move |position| RowRef { table: self, position })
    }

    /// Copy the rows at `positions`, in the given order, into a new table.
    ///
    /// Out-of-range positions are skipped.
    pub fn select<I>(&self, positions: I) -> Table
    where
        I: IntoIterator<Item = usize>,
    {
        let rows = positions
            .into_iter()
            .filter_map(|position| self.rows.get(position).cloned())
            .collect();
        Table {
            columns: self.columns.clone(),
            rows,
        }
    }

    /// Read a key column as pair ids, one per row.
    ///
    /// Every cell must be a non-null, non-negative integer.
    pub fn pair_id_column(&self, column: &str) -> Result<Vec<PairId>> {
        let index = self.require_column(column)?;
        self.rows
            .iter()
            .enumerate()
            .map(|(position, row)| {
                row[index].as_pair_id().ok_or_else(|| {
                    Error::invalid_argument(format!(
                        "row {position}: {column:?} must be an unsigned integer, got {} {}",
                        row[index].type_name(),
                        row[index]
                    ))
                })
            })
            .collect()
    }
}

/// Borrowed view of one table row.
#[derive(Debug, Clone, Copy)]
pub struct RowRef<'a> {
    table: &'a Table,
    position: usize,
}

impl<'a> RowRef<'a> {
    /// Position of the row in its table.
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn columns(&self) -> &'a [String] {
        &self.table.columns
    }

    pub fn values(&self) -> &'a [Value] {
        &self.table.rows[self.position]
    }

    /// Cell by column name.
    pub fn get(&self, column: &str) -> Option<&'a Value> {
        let index = self.table.column_index(column)?;
        self.values().get(index)
    }

    /// Iterate `(column, value)` pairs in schema order.
    pub fn iter(&self) -> impl Iterator<Item = (&'a str, &'a Value)> + 'a {
        self.table
            .columns
            .iter()
            .map(String::as_str)
            .zip(self.table.rows[self.position].iter())
    }
}
