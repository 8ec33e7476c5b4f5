//! Scoring and streaming trait definitions.

use crate::error::Result;
use crate::model::NumericTable;

/// Anomaly scorer trait.
///
/// Implementations map a numeric table to one non-negative score per row.
/// Scoring never mutates the scorer, so a single instance can be shared
/// across request handlers.
pub trait AnomalyScorer: Send + Sync {
    /// Feature count expected per row.
    fn input_dim(&self) -> usize;

    /// Compute per-timestep anomaly scores.
    fn score(&self, table: &NumericTable) -> Result<Vec<f64>>;
}

/// Rolling-window monitoring trait.
pub trait MonitoringStream: Send {
    /// Push a new value and rescore the window.
    ///
    /// Returns one score per buffered value, oldest first.
    fn push(&mut self, value: f64) -> Result<Vec<f64>>;

    /// Get current buffer contents.
    fn buffer(&self) -> &[f64];

    /// Reset the monitor state.
    fn reset(&mut self);
}
