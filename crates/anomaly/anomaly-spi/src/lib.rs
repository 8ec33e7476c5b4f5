//! Anomaly Detection Service Provider Interface
//!
//! Defines traits, errors and data types shared by the autoencoder core,
//! the HTTP service and the command-line tool.

pub mod contract;
pub mod error;
pub mod model;

// Re-export all public items at crate root for convenience
pub use contract::{AnomalyScorer, MonitoringStream, SummaryEnricher};
pub use error::{AnomalyError, Result};
pub use model::{AnomalyReport, EpochStats, NumericTable};
