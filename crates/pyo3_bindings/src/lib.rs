//! PyO3 bindings for the grouped pair universe.
//!
//! Exposes the Rust universe to Python:
//! - Building a universe from the server's JSON records
//! - Per-pair, cross-sectional and range queries
//! - Prior timestamp calibration
//! - Pair filtering
//!
//! Rows come back as dicts, timestamps as ISO 8601 strings. Missing data
//! raises `KeyError`, malformed input `ValueError`.

use pyo3::exceptions::{PyKeyError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::PyDict;

use universe_core::{
    Error as RustError, PairId, RowRef, PAIR_ID_COLUMN, Table, TimeBucket, Timestamp, ToUtc, UniverseConfig, Value,
};
use universe_filters::filter_column_for_pair_ids;
use universe_grouped::{GroupedUniverse as RustGroupedUniverse, Samples};

// ============================================================================
// Conversions
// ============================================================================

fn to_py_err(err: RustError) -> PyErr {
    match err {
        RustError::NotFound(_) => PyKeyError::new_err(err.to_string()),
        _ => PyValueError::new_err(err.to_string()),
    }
}

fn parse_ts(s: &str) -> PyResult<Timestamp> {
    let value = Value::parse_timestamp(s)
        .ok_or_else(|| PyValueError::new_err(format!("Invalid timestamp: {s:?}")))?;
    value.try_to_utc().map_err(to_py_err)
}

fn format_ts(ts: Timestamp) -> String {
    ts.to_rfc3339()
}

fn value_to_py(py: Python<'_>, value: &Value) -> PyObject {
    match value {
        Value::Null => py.None(),
        Value::Bool(v) => (*v).into_py(py),
        Value::UInt(v) => (*v).into_py(py),
        Value::Int(v) => (*v).into_py(py),
        Value::Float(v) => v.into_inner().into_py(py),
        Value::Text(v) => v.as_str().into_py(py),
        Value::Timestamp(v) => v.format("%Y-%m-%dT%H:%M:%S%.f").to_string().into_py(py),
        Value::TimestampTz(v) => v.to_rfc3339().into_py(py),
    }
}

fn row_to_dict<'py>(py: Python<'py>, row: RowRef<'_>) -> PyResult<Bound<'py, PyDict>> {
    let dict = PyDict::new_bound(py);
    for (column, value) in row.iter() {
        dict.set_item(column, value_to_py(py, value))?;
    }
    Ok(dict)
}

fn samples_to_list<'py>(py: Python<'py>, samples: &Samples<'_>) -> PyResult<Vec<Bound<'py, PyDict>>> {
    samples.iter().map(|row| row_to_dict(py, row)).collect()
}

fn table_to_list<'py>(py: Python<'py>, table: &Table) -> PyResult<Vec<Bound<'py, PyDict>>> {
    table.rows().map(|row| row_to_dict(py, row)).collect()
}

// ============================================================================
// Universe
// ============================================================================

/// Candles or liquidity samples of many pairs, grouped by pair and indexed by time.
#[pyclass(name = "GroupedUniverse")]
pub struct PyGroupedUniverse {
    inner: RustGroupedUniverse,
}

#[pymethods]
impl PyGroupedUniverse {
    #[new]
    #[pyo3(signature = (records_json, time_bucket = "1d", timestamp_column = "timestamp", auto_index = true))]
    fn new(records_json: &str, time_bucket: &str, timestamp_column: &str, auto_index: bool) -> PyResult<Self> {
        let time_bucket: TimeBucket = time_bucket.parse().map_err(to_py_err)?;
        let config = UniverseConfig {
            time_bucket,
            timestamp_column: timestamp_column.to_string(),
            auto_index,
            ..UniverseConfig::default()
        };
        let table = Table::from_json_records(records_json).map_err(to_py_err)?;
        let inner = RustGroupedUniverse::new(table, config).map_err(to_py_err)?;
        Ok(PyGroupedUniverse { inner })
    }

    #[getter]
    fn time_bucket(&self) -> String {
        self.inner.time_bucket().to_string()
    }

    #[getter]
    fn timestamp_column(&self) -> String {
        self.inner.timestamp_column().to_string()
    }

    fn column_names(&self) -> Vec<String> {
        self.inner.column_names().to_vec()
    }

    fn sample_count(&self) -> usize {
        self.inner.sample_count()
    }

    fn pair_count(&self) -> usize {
        self.inner.pair_count()
    }

    fn pair_ids(&self) -> Vec<PairId> {
        self.inner.pair_ids().collect()
    }

    fn samples_by_pair<'py>(&self, py: Python<'py>, pair_id: PairId) -> PyResult<Vec<Bound<'py, PyDict>>> {
        samples_to_list(py, &self.inner.samples_by_pair(pair_id))
    }

    fn all_pairs<'py>(&self, py: Python<'py>) -> PyResult<Vec<(PairId, Vec<Bound<'py, PyDict>>)>> {
        self.inner
            .all_pairs()
            .map(|(pair_id, samples)| Ok((pair_id, samples_to_list(py, &samples)?)))
            .collect()
    }

    fn samples_at<'py>(&self, py: Python<'py>, ts: &str) -> PyResult<Vec<Bound<'py, PyDict>>> {
        let samples = self.inner.samples_at(parse_ts(ts)?).map_err(to_py_err)?;
        samples_to_list(py, &samples)
    }

    fn samples_in_range<'py>(&self, py: Python<'py>, start: &str, end: &str) -> PyResult<Vec<Bound<'py, PyDict>>> {
        let samples = self
            .inner
            .samples_in_range(parse_ts(start)?, parse_ts(end)?)
            .map_err(to_py_err)?;
        samples_to_list(py, &samples)
    }

    fn samples_in_range_by_pair<'py>(&self, py: Python<'py>, start: &str, end: &str) -> PyResult<Bound<'py, PyDict>> {
        let groups = self
            .inner
            .samples_in_range_by_pair(parse_ts(start)?, parse_ts(end)?)
            .map_err(to_py_err)?;
        let dict = PyDict::new_bound(py);
        for (pair_id, samples) in &groups {
            dict.set_item(pair_id, samples_to_list(py, samples)?)?;
        }
        Ok(dict)
    }

    fn timestamp_range(&self) -> (Option<String>, Option<String>) {
        let (start, end) = self.inner.timestamp_range();
        (start.map(format_ts), end.map(format_ts))
    }

    fn prior_timestamp(&self, ts: &str) -> PyResult<String> {
        let prior = self.inner.prior_timestamp(parse_ts(ts)?).map_err(to_py_err)?;
        Ok(format_ts(prior))
    }

    fn __len__(&self) -> usize {
        self.inner.sample_count()
    }

    fn __repr__(&self) -> String {
        format!(
            "GroupedUniverse(samples={}, pairs={}, time_bucket={})",
            self.inner.sample_count(),
            self.inner.pair_count(),
            self.inner.time_bucket()
        )
    }
}

// ============================================================================
// Filters
// ============================================================================

/// Keep only the records of the given pairs, as a list of dicts.
#[pyfunction]
#[pyo3(signature = (records_json, pair_ids, column=PAIR_ID_COLUMN))]
fn filter_for_pair_ids<'py>(
    py: Python<'py>,
    records_json: &str,
    pair_ids: Vec<PairId>,
    column: &str,
) -> PyResult<Vec<Bound<'py, PyDict>>> {
    let table = Table::from_json_records(records_json).map_err(to_py_err)?;
    let filtered = filter_column_for_pair_ids(&table, column, pair_ids).map_err(to_py_err)?;
    table_to_list(py, &filtered)
}

// ============================================================================
// Module Definition
// ============================================================================

/// Pair Universe - grouped time-series queries over candle and liquidity samples.
#[pymodule]
fn pair_universe(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyGroupedUniverse>()?;
    m.add_function(wrap_pyfunction!(filter_for_pair_ids, m)?)?;
    Ok(())
}
