//! Full-batch training.
//!
//! The sequence is its own target. Each epoch is one forward pass over the
//! whole table, one MSE loss and one Adam step; there is no batching,
//! shuffling, validation split or early stopping.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anomaly_api::{ModelConfig, TrainConfig};
use anomaly_spi::{EpochStats, NumericTable, Result};
use candle_core::Module;
use candle_nn::{AdamW, Optimizer, ParamsAdamW};
use tracing::info;

use crate::autoencoder::LstmAutoencoder;
use crate::backend_error;
use crate::loader::load_csv;

/// Outcome of a training run.
#[derive(Debug)]
pub struct TrainedModel {
    pub model: LstmAutoencoder,
    /// One entry per epoch, in order.
    pub history: Vec<EpochStats>,
    pub checkpoint_path: PathBuf,
}

impl TrainedModel {
    /// Loss of the last epoch.
    pub fn final_loss(&self) -> Option<f64> {
        self.history.last().map(|s| s.loss)
    }
}

/// Fits an autoencoder to one table and persists it.
#[derive(Debug, Clone, Default)]
pub struct Trainer {
    model_config: ModelConfig,
    train_config: TrainConfig,
}

impl Trainer {
    /// `model_config.input_dim` is ignored; it is taken from the table.
    pub fn new(model_config: ModelConfig, train_config: TrainConfig) -> Self {
        Self {
            model_config,
            train_config,
        }
    }

    pub fn train_config(&self) -> &TrainConfig {
        &self.train_config
    }

    /// Train a new model on `table` for exactly `epochs` steps and save it.
    pub fn fit(&self, table: &NumericTable) -> Result<TrainedModel> {
        self.train_config.validate()?;
        let config = self.model_config.with_input_dim(table.n_features());
        let model = LstmAutoencoder::new(config)?;
        let input = model.sequence_tensor(table)?;

        let params = ParamsAdamW {
            lr: self.train_config.learning_rate,
            weight_decay: 0.0,
            ..Default::default()
        };
        let mut optimizer = AdamW::new(model.trainable_vars(), params).map_err(backend_error)?;

        let epochs = self.train_config.epochs;
        let mut history = Vec::with_capacity(epochs);
        for epoch in 1..=epochs {
            let started = Instant::now();
            let reconstruction = model.forward(&input).map_err(backend_error)?;
            let loss = candle_nn::loss::mse(&reconstruction, &input).map_err(backend_error)?;
            optimizer.backward_step(&loss).map_err(backend_error)?;
            let loss = f64::from(loss.to_scalar::<f32>().map_err(backend_error)?);

            info!(epoch, epochs, loss, "epoch complete");
            history.push(EpochStats {
                epoch,
                total_epochs: epochs,
                loss,
                elapsed_ms: started.elapsed().as_millis() as u64,
            });
        }

        let checkpoint_path = self.train_config.checkpoint_path.clone();
        model.save(&checkpoint_path)?;

        Ok(TrainedModel {
            model,
            history,
            checkpoint_path,
        })
    }
}

/// Load a CSV file and train on it.
pub fn train_from_csv(
    path: impl AsRef<Path>,
    model_config: ModelConfig,
    train_config: TrainConfig,
) -> Result<TrainedModel> {
    let table = load_csv(path)?;
    Trainer::new(model_config, train_config).fit(&table)
}
