//! Reconstruction-error scoring.

use anomaly_spi::{AnomalyScorer, NumericTable, Result};
use candle_core::Module;

use crate::autoencoder::LstmAutoencoder;
use crate::backend_error;

/// Score each timestep by its mean squared reconstruction error.
///
/// The reconstruction is detached from the autograd graph; the error is then
/// computed in `f64` against the original table values, so every score is
/// non-negative and there is exactly one score per row.
///
/// # Errors
///
/// Returns [`anomaly_spi::AnomalyError::DataShape`] when the table width
/// differs from the model's `input_dim`.
pub fn score(table: &NumericTable, model: &LstmAutoencoder) -> Result<Vec<f64>> {
    model.check_input(table)?;

    let input = model.sequence_tensor(table)?;
    let reconstruction: Vec<Vec<f32>> = model
        .forward(&input)
        .map_err(backend_error)?
        .detach()
        .squeeze(1)
        .and_then(|t| t.to_vec2())
        .map_err(backend_error)?;

    Ok(table
        .rows()
        .iter()
        .zip(reconstruction.iter())
        .map(|(original, rebuilt)| {
            let sum: f64 = original
                .iter()
                .zip(rebuilt.iter())
                .map(|(&x, &r)| (f64::from(r) - x).powi(2))
                .sum();
            sum / original.len() as f64
        })
        .collect())
}

impl AnomalyScorer for LstmAutoencoder {
    fn input_dim(&self) -> usize {
        self.config().input_dim
    }

    fn score(&self, table: &NumericTable) -> Result<Vec<f64>> {
        score(table, self)
    }
}
