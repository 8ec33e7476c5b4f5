//! Threshold summarizer.

use anomaly_api::SummaryConfig;
use anomaly_spi::{AnomalyReport, SummaryEnricher};
use tracing::{debug, warn};

/// Mean and population standard deviation (divisor `n`).
///
/// An empty slice yields `(0.0, 0.0)`.
pub fn population_stats(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0);
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    (mean, variance.sqrt())
}

/// Flags scores strictly above `mean + k·std` and describes them.
#[derive(Debug, Clone, Default)]
pub struct Summarizer {
    config: SummaryConfig,
}

impl Summarizer {
    pub fn new(config: SummaryConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SummaryConfig {
        &self.config
    }

    /// Build the rule-based report. Never fails.
    pub fn summarize(&self, scores: &[f64]) -> AnomalyReport {
        let (mean, std_dev) = population_stats(scores);
        let threshold = mean + self.config.sigma_multiplier * std_dev;
        let anomaly_indices: Vec<usize> = scores
            .iter()
            .enumerate()
            .filter(|(_, s)| **s > threshold)
            .map(|(i, _)| i)
            .collect();

        let summary = if anomaly_indices.is_empty() {
            format!(
                "No significant anomalies detected (mean={:.4}, std={:.4}).",
                mean, std_dev
            )
        } else {
            let listed: Vec<String> = anomaly_indices
                .iter()
                .take(self.config.max_listed)
                .map(usize::to_string)
                .collect();
            format!(
                "Detected {} anomalous timestep(s). Prominent indices: {}. Threshold={:.4}, mean={:.4}, std={:.4}.",
                anomaly_indices.len(),
                listed.join(", "),
                threshold,
                mean,
                std_dev
            )
        };

        debug!(
            count = scores.len(),
            flagged = anomaly_indices.len(),
            threshold,
            "summarized scores"
        );

        AnomalyReport {
            mean,
            std_dev,
            threshold,
            anomaly_indices,
            summary,
        }
    }

    /// Build the report and append the enricher's text when it succeeds.
    ///
    /// Enricher failures are logged and dropped; the rule-based summary is
    /// always kept intact.
    pub fn summarize_with(
        &self,
        scores: &[f64],
        enricher: Option<&dyn SummaryEnricher>,
    ) -> AnomalyReport {
        let mut report = self.summarize(scores);
        if let Some(enricher) = enricher {
            match enricher.enrich(&report) {
                Ok(text) if !text.trim().is_empty() => {
                    report.summary.push_str("\n\n");
                    report.summary.push_str(text.trim());
                }
                Ok(_) => {}
                Err(e) => {
                    warn!(enricher = enricher.name(), error = %e, "summary enrichment failed")
                }
            }
        }
        report
    }
}

/// Summarize with the default two-sigma rule.
pub fn summarize(scores: &[f64]) -> AnomalyReport {
    Summarizer::default().summarize(scores)
}
