//! Best-effort summary enrichment.

use crate::error::Result;
use crate::model::AnomalyReport;

/// Produces free text to append to a rule-based summary.
///
/// Failures are reported as [`crate::AnomalyError::ExternalService`] and are
/// never allowed to replace or remove the rule-based text.
pub trait SummaryEnricher: Send + Sync {
    /// Enricher name, used in logs.
    fn name(&self) -> &str;

    /// Generate additional text for the report.
    fn enrich(&self, report: &AnomalyReport) -> Result<String>;
}
