//! Numeric table: an ordered, complete, equal-width matrix of sensor readings.

use serde::{Deserialize, Serialize};

use crate::error::{AnomalyError, Result};

/// A single time series of feature vectors.
///
/// Row order is temporal order. Every row has one value per column and no
/// value is missing, so the table can be reshaped into a
/// `(rows, 1, columns)` sequence without further checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawTable")]
pub struct NumericTable {
    columns: Vec<String>,
    rows: Vec<Vec<f64>>,
}

/// Unchecked wire form; deserialization goes through [`NumericTable::new`].
#[derive(Deserialize)]
struct RawTable {
    columns: Vec<String>,
    rows: Vec<Vec<f64>>,
}

impl TryFrom<RawTable> for NumericTable {
    type Error = AnomalyError;

    fn try_from(raw: RawTable) -> Result<Self> {
        Self::new(raw.columns, raw.rows)
    }
}

impl NumericTable {
    /// Create a table from column names and rows.
    ///
    /// # Errors
    ///
    /// Returns [`AnomalyError::DataFormat`] if there are no columns, no rows,
    /// a row whose width differs from the column count, or a non-finite value.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<f64>>) -> Result<Self> {
        if columns.is_empty() {
            return Err(AnomalyError::data_format("table has no numeric columns"));
        }
        if rows.is_empty() {
            return Err(AnomalyError::data_format("table has no complete rows"));
        }
        for (i, row) in rows.iter().enumerate() {
            if row.len() != columns.len() {
                return Err(AnomalyError::data_format(format!(
                    "row {} has {} values, expected {}",
                    i,
                    row.len(),
                    columns.len()
                )));
            }
            if row.iter().any(|v| !v.is_finite()) {
                return Err(AnomalyError::data_format(format!(
                    "row {} contains a non-finite value",
                    i
                )));
            }
        }
        Ok(Self { columns, rows })
    }

    /// Create a single-column table from a series of values.
    pub fn from_series(name: &str, values: &[f64]) -> Result<Self> {
        Self::new(
            vec![name.to_string()],
            values.iter().map(|&v| vec![v]).collect(),
        )
    }

    /// Column names, in file order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Rows, in temporal order.
    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    /// Number of timesteps.
    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    /// Number of feature columns.
    pub fn n_features(&self) -> usize {
        self.columns.len()
    }

    /// Row-major values as `f32`, the layout expected by the tensor backend.
    pub fn to_f32_flat(&self) -> Vec<f32> {
        self.rows
            .iter()
            .flat_map(|row| row.iter().map(|&v| v as f32))
            .collect()
    }

    /// Consume the table and return its rows.
    pub fn into_rows(self) -> Vec<Vec<f64>> {
        self.rows
    }
}
