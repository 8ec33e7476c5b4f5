//! Data models for anomaly detection.
//!
//! Tables flowing in, reports and training statistics flowing out.

mod anomaly_report;
mod epoch_stats;
mod numeric_table;

pub use anomaly_report::AnomalyReport;
pub use epoch_stats::EpochStats;
pub use numeric_table::NumericTable;
