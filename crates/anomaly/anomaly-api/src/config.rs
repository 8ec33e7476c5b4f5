//! Model, training, summary and monitor configuration types.

use std::path::PathBuf;

use anomaly_spi::{AnomalyError, Result};
use serde::{Deserialize, Serialize};

/// Default checkpoint location, relative to the working directory.
pub const DEFAULT_CHECKPOINT_PATH: &str = "models/checkpoint.safetensors";

// ============================================================================
// Model Configuration
// ============================================================================

/// Architecture of an LSTM autoencoder.
///
/// Fixed at construction and stored alongside every checkpoint so the
/// parameters can be loaded back into an identically shaped model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Features per timestep.
    pub input_dim: usize,
    /// LSTM hidden state size.
    pub hidden_dim: usize,
    /// Bottleneck size, normally smaller than `hidden_dim`.
    pub latent_dim: usize,
    /// Stacked LSTM layers in both encoder and decoder.
    pub n_layers: usize,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            input_dim: 1,
            hidden_dim: 32,
            latent_dim: 8,
            n_layers: 1,
        }
    }
}

impl ModelConfig {
    pub fn new(input_dim: usize, hidden_dim: usize, latent_dim: usize, n_layers: usize) -> Self {
        Self {
            input_dim,
            hidden_dim,
            latent_dim,
            n_layers,
        }
    }

    /// Same architecture with a different input width.
    pub fn with_input_dim(mut self, input_dim: usize) -> Self {
        self.input_dim = input_dim;
        self
    }

    /// Check that every dimension is positive.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("input_dim", self.input_dim),
            ("hidden_dim", self.hidden_dim),
            ("latent_dim", self.latent_dim),
            ("n_layers", self.n_layers),
        ] {
            if value == 0 {
                return Err(AnomalyError::invalid_parameter(name, "must be positive"));
            }
        }
        Ok(())
    }
}

/// Builder for ModelConfig.
#[derive(Debug, Default)]
pub struct ModelConfigBuilder {
    input_dim: Option<usize>,
    hidden_dim: Option<usize>,
    latent_dim: Option<usize>,
    n_layers: Option<usize>,
}

impl ModelConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn input_dim(mut self, input_dim: usize) -> Self {
        self.input_dim = Some(input_dim);
        self
    }

    pub fn hidden_dim(mut self, hidden_dim: usize) -> Self {
        self.hidden_dim = Some(hidden_dim);
        self
    }

    pub fn latent_dim(mut self, latent_dim: usize) -> Self {
        self.latent_dim = Some(latent_dim);
        self
    }

    pub fn n_layers(mut self, n_layers: usize) -> Self {
        self.n_layers = Some(n_layers);
        self
    }

    /// Build the configuration, filling unset fields from the defaults.
    pub fn build(self) -> Result<ModelConfig> {
        let defaults = ModelConfig::default();
        let config = ModelConfig {
            input_dim: self.input_dim.unwrap_or(defaults.input_dim),
            hidden_dim: self.hidden_dim.unwrap_or(defaults.hidden_dim),
            latent_dim: self.latent_dim.unwrap_or(defaults.latent_dim),
            n_layers: self.n_layers.unwrap_or(defaults.n_layers),
        };
        config.validate()?;
        Ok(config)
    }
}

// ============================================================================
// Training Configuration
// ============================================================================

/// Full-batch training settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainConfig {
    /// Exact number of optimizer steps; there is no early stopping.
    pub epochs: usize,
    /// Adam learning rate.
    pub learning_rate: f64,
    /// Where the trained checkpoint is written.
    pub checkpoint_path: PathBuf,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            epochs: 10,
            learning_rate: 1e-3,
            checkpoint_path: PathBuf::from(DEFAULT_CHECKPOINT_PATH),
        }
    }
}

impl TrainConfig {
    pub fn new(epochs: usize, learning_rate: f64, checkpoint_path: impl Into<PathBuf>) -> Self {
        Self {
            epochs,
            learning_rate,
            checkpoint_path: checkpoint_path.into(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.epochs == 0 {
            return Err(AnomalyError::invalid_parameter("epochs", "must be positive"));
        }
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(AnomalyError::invalid_parameter(
                "learning_rate",
                "must be a positive finite number",
            ));
        }
        Ok(())
    }
}

// ============================================================================
// Summary Configuration
// ============================================================================

/// Statistical thresholding rule for score summaries.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SummaryConfig {
    /// Threshold is `mean + sigma_multiplier * std_dev` (default: 2.0).
    pub sigma_multiplier: f64,
    /// Flagged indices listed in the summary text (default: 5).
    pub max_listed: usize,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            sigma_multiplier: 2.0,
            max_listed: 5,
        }
    }
}

impl SummaryConfig {
    pub fn new(sigma_multiplier: f64, max_listed: usize) -> Self {
        Self {
            sigma_multiplier,
            max_listed,
        }
    }
}

// ============================================================================
// Monitor Configuration
// ============================================================================

/// Monitor configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Most recent values kept for streaming rescoring.
    pub buffer_size: usize,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self { buffer_size: 200 }
    }
}

impl MonitorConfig {
    pub fn new(buffer_size: usize) -> Self {
        Self { buffer_size }
    }

    pub fn validate(&self) -> Result<()> {
        if self.buffer_size == 0 {
            return Err(AnomalyError::invalid_parameter("buffer_size", "must be positive"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_config_defaults() {
        let config = ModelConfig::default();
        assert_eq!(config, ModelConfig::new(1, 32, 8, 1));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_model_config_with_input_dim() {
        let config = ModelConfig::default().with_input_dim(4);
        assert_eq!(config.input_dim, 4);
        assert_eq!(config.hidden_dim, 32);
    }

    #[test]
    fn test_model_config_rejects_zero_dimension() {
        let err = ModelConfig::new(1, 0, 8, 1).validate().unwrap_err();
        assert_eq!(err.to_string(), "Invalid parameter: hidden_dim - must be positive");

        assert!(ModelConfig::new(0, 8, 4, 1).validate().is_err());
        assert!(ModelConfig::new(1, 8, 0, 1).validate().is_err());
        assert!(ModelConfig::new(1, 8, 4, 0).validate().is_err());
    }

    #[test]
    fn test_builder_success() {
        let config = ModelConfigBuilder::new()
            .input_dim(3)
            .hidden_dim(16)
            .latent_dim(4)
            .n_layers(2)
            .build()
            .unwrap();
        assert_eq!(config, ModelConfig::new(3, 16, 4, 2));
    }

    #[test]
    fn test_builder_defaults() {
        let config = ModelConfigBuilder::new().hidden_dim(8).build().unwrap();
        assert_eq!(config, ModelConfig::new(1, 8, 8, 1));
    }

    #[test]
    fn test_builder_invalid() {
        assert!(ModelConfigBuilder::new().latent_dim(0).build().is_err());
    }

    #[test]
    fn test_train_config_defaults() {
        let config = TrainConfig::default();
        assert_eq!(config.epochs, 10);
        assert_eq!(config.learning_rate, 1e-3);
        assert_eq!(config.checkpoint_path, PathBuf::from(DEFAULT_CHECKPOINT_PATH));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_train_config_rejects_zero_epochs() {
        let config = TrainConfig::new(0, 1e-3, "out.safetensors");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_train_config_rejects_bad_learning_rate() {
        assert!(TrainConfig::new(1, 0.0, "m").validate().is_err());
        assert!(TrainConfig::new(1, -1.0, "m").validate().is_err());
        assert!(TrainConfig::new(1, f64::NAN, "m").validate().is_err());
    }

    #[test]
    fn test_summary_config_defaults() {
        let config = SummaryConfig::default();
        assert_eq!(config.sigma_multiplier, 2.0);
        assert_eq!(config.max_listed, 5);
    }

    #[test]
    fn test_monitor_config() {
        assert_eq!(MonitorConfig::default().buffer_size, 200);
        assert!(MonitorConfig::new(0).validate().is_err());
        assert!(MonitorConfig::new(10).validate().is_ok());
    }

    #[test]
    fn test_model_config_serde_roundtrip() {
        let config = ModelConfig::new(2, 16, 4, 2);
        let json = serde_json::to_string(&config).unwrap();
        let back: ModelConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, back);
    }
}
