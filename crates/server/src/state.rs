//! Shared application state.

use std::sync::Arc;

use anomaly::{
    load_checkpoint, AnomalyScorer, LstmAutoencoder, ModelConfig, Result, SummaryEnricher,
    Summarizer,
};
use tracing::{info, warn};

use crate::config::ServiceConfig;
use crate::rate_limit::RateLimiter;

/// State shared by all handlers. The scorer is read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub scorer: Arc<dyn AnomalyScorer>,
    pub limiter: Arc<RateLimiter>,
    pub enricher: Option<Arc<dyn SummaryEnricher>>,
    pub summarizer: Summarizer,
    pub config: Arc<ServiceConfig>,
}

impl AppState {
    pub fn new(scorer: Arc<dyn AnomalyScorer>, config: ServiceConfig) -> Self {
        Self {
            scorer,
            limiter: Arc::new(RateLimiter::new(
                config.rate_limit_max,
                config.rate_limit_window,
            )),
            enricher: None,
            summarizer: Summarizer::default(),
            config: Arc::new(config),
        }
    }

    /// Build state with the model named by `MODEL_CHECKPOINT`, or an
    /// untrained default model when none is configured.
    pub fn from_config(config: ServiceConfig) -> Result<Self> {
        let model = match &config.model_checkpoint {
            Some(path) => {
                let model = load_checkpoint(path)?;
                info!(path = %path.display(), config = ?model.config(), "loaded checkpoint");
                model
            }
            None => {
                warn!("MODEL_CHECKPOINT not set; serving an untrained model");
                LstmAutoencoder::new(ModelConfig::default())?
            }
        };
        Ok(Self::new(Arc::new(model), config))
    }

    /// Attach a summary enricher for `/analyze`.
    pub fn with_enricher(mut self, enricher: Arc<dyn SummaryEnricher>) -> Self {
        self.enricher = Some(enricher);
        self
    }
}
