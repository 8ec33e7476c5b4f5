//! Anomaly Detection API
//!
//! Configuration types and builders for the LSTM autoencoder, its training
//! loop, the threshold summarizer and the streaming monitor.

pub mod config;

// Re-export SPI types
pub use anomaly_spi::{AnomalyError, AnomalyReport, EpochStats, NumericTable, Result};

pub use config::{
    ModelConfig, ModelConfigBuilder, MonitorConfig, SummaryConfig, TrainConfig,
    DEFAULT_CHECKPOINT_PATH,
};
