//! Anomaly Detection Core
//!
//! LSTM autoencoder, training, reconstruction-error scoring, threshold
//! summarization and streaming monitoring.

mod autoencoder;
mod checkpoint;
mod loader;
mod monitoring;
mod scorer;
mod summarizer;
mod trainer;

pub use autoencoder::*;
pub use checkpoint::{
    inspect_checkpoint, load_checkpoint, save_checkpoint, CHECKPOINT_FORMAT, CHECKPOINT_VERSION,
};
pub use loader::*;
pub use monitoring::*;
pub use scorer::*;
pub use summarizer::*;
pub use trainer::*;

use anomaly_spi::AnomalyError;

pub(crate) fn backend_error(e: candle_core::Error) -> AnomalyError {
    AnomalyError::Model(e.to_string())
}
