//! Contract definitions for anomaly detection.
//!
//! This module contains trait definitions that providers must implement.

mod anomaly_scorer;
mod summary_enricher;

pub use anomaly_scorer::{AnomalyScorer, MonitoringStream};
pub use summary_enricher::SummaryEnricher;
