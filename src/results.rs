//! Run-outcome model: the summary table of completed runs, final scalar
//! metrics, and the interpretation text shown when a run finishes.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Table of per-run summary rows with mode-specific column headers.
///
/// Rows carry the raw numeric values; rounding for display is the
/// front-end's concern.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SummaryTable {
    columns: Vec<String>,
    rows: Vec<Vec<f64>>,
}

impl SummaryTable {
    /// Create an empty table with no columns.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the column headers. Existing rows are untouched.
    pub fn set_columns(&mut self, columns: Vec<String>) {
        self.columns = columns;
    }

    /// Append a row.
    pub fn add_row(&mut self, row: Vec<f64>) {
        self.rows.push(row);
    }

    /// Remove the row at `index`. Out-of-range indices are a no-op.
    pub fn remove_row(&mut self, index: usize) {
        if index < self.rows.len() {
            self.rows.remove(index);
        }
    }

    /// Column headers.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// All rows in insertion order.
    #[must_use]
    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Drop all rows, keeping the column headers.
    pub fn clear(&mut self) {
        self.rows.clear();
    }
}

/// Read-only view of the summary table handed to the front-end.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Summary {
    /// Column headers.
    pub columns: Vec<String>,
    /// Rows of raw numeric values.
    pub rows: Vec<Vec<f64>>,
}

impl From<&SummaryTable> for Summary {
    fn from(table: &SummaryTable) -> Self {
        Self {
            columns: table.columns.clone(),
            rows: table.rows.clone(),
        }
    }
}

/// Named scalar values captured when a run finishes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FinalMetrics {
    values: IndexMap<String, f64>,
}

impl FinalMetrics {
    /// Create an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a value, replacing any previous value under the same key.
    pub fn set(&mut self, key: impl Into<String>, value: f64) {
        self.values.insert(key.into(), value);
    }

    /// Look up a value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<f64> {
        self.values.get(key).copied()
    }

    /// Iterate `(key, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Whether no values have been captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Drop all values.
    pub fn clear(&mut self) {
        self.values.clear();
    }
}

/// Complete outcome of a run: summary table, final metrics and the
/// human-readable interpretation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunOutcome {
    /// Per-run summary rows.
    pub table: SummaryTable,
    /// Scalar values captured at finish.
    pub metrics: FinalMetrics,
    /// Interpretation text; empty until a run finishes.
    pub interpretation: String,
}

impl RunOutcome {
    /// Create an empty outcome.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Install columns (when non-empty) and append a summary row.
    pub fn add_summary_row(&mut self, columns: Option<Vec<String>>, row: Vec<f64>) {
        if let Some(columns) = columns {
            if !columns.is_empty() {
                self.table.set_columns(columns);
            }
        }
        self.table.add_row(row);
    }

    /// Capture a final metric.
    pub fn set_metric(&mut self, key: impl Into<String>, value: f64) {
        self.metrics.set(key, value);
    }

    /// Reset everything except the column headers.
    pub fn reset(&mut self) {
        self.table.clear();
        self.metrics.clear();
        self.interpretation.clear();
    }
}
