//! Anomaly Detection Facade
//!
//! Unified re-exports for the anomaly detection module.
//!
//! This facade provides a single entry point to all anomaly detection functionality:
//! - `AnomalyScorer`, `MonitoringStream` and `SummaryEnricher` contracts, data types and errors from SPI
//! - Model, training, summary and monitor configuration from API
//! - `LstmAutoencoder`, `Trainer`, scoring, summarization and `StreamMonitor` from Core

// Re-export everything from SPI
pub use anomaly_spi::*;

// Re-export everything from API
pub use anomaly_api::*;

// Re-export everything from Core
pub use anomaly_core::*;
