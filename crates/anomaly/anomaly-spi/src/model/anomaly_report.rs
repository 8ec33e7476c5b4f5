//! Anomaly report types.

use serde::{Deserialize, Serialize};

/// Result of thresholding a score sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyReport {
    /// Mean of all scores.
    pub mean: f64,
    /// Population standard deviation of all scores.
    pub std_dev: f64,
    /// Scores strictly above this value are flagged.
    pub threshold: f64,
    /// Flagged timesteps, ascending.
    pub anomaly_indices: Vec<usize>,
    /// Human-readable summary.
    pub summary: String,
}

impl AnomalyReport {
    /// Count of flagged timesteps.
    pub fn anomaly_count(&self) -> usize {
        self.anomaly_indices.len()
    }

    /// Whether any timestep was flagged.
    pub fn has_anomalies(&self) -> bool {
        !self.anomaly_indices.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts() {
        let report = AnomalyReport {
            mean: 1.0,
            std_dev: 0.5,
            threshold: 2.0,
            anomaly_indices: vec![3, 7],
            summary: String::new(),
        };
        assert_eq!(report.anomaly_count(), 2);
        assert!(report.has_anomalies());
    }

    #[test]
    fn test_empty_report() {
        let report = AnomalyReport {
            mean: 0.0,
            std_dev: 0.0,
            threshold: 0.0,
            anomaly_indices: vec![],
            summary: "none".to_string(),
        };
        assert!(!report.has_anomalies());
    }
}
