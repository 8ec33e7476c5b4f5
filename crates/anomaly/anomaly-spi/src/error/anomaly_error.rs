//! Anomaly detection error types.

use std::path::PathBuf;

use thiserror::Error;

/// Anomaly detection errors.
#[derive(Debug, Error)]
pub enum AnomalyError {
    /// Input could not be read as a numeric table.
    #[error("Data format error: {0}")]
    DataFormat(String),

    /// Table width does not match the model's input dimension.
    #[error("Data shape error: expected {expected} feature column(s), got {got}")]
    DataShape { expected: usize, got: usize },

    #[error("Invalid parameter: {name} - {reason}")]
    InvalidParameter { name: String, reason: String },

    /// Checkpoint could not be written, read or matched to an architecture.
    #[error("Persistence error at {}: {reason}", path.display())]
    Persistence { path: PathBuf, reason: String },

    /// Tensor backend failure.
    #[error("Model error: {0}")]
    Model(String),

    /// Optional enrichment service failed. Never fatal to a request.
    #[error("External service error: {0}")]
    ExternalService(String),
}

impl AnomalyError {
    /// Create a data format error.
    pub fn data_format(reason: impl Into<String>) -> Self {
        Self::DataFormat(reason.into())
    }

    /// Create an invalid parameter error.
    pub fn invalid_parameter(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create a persistence error for the given path.
    pub fn persistence(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Persistence {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Whether the error was caused by the caller's input rather than the service.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::DataFormat(_) | Self::DataShape { .. } | Self::InvalidParameter { .. }
        )
    }
}

/// Result type for anomaly detection operations.
pub type Result<T> = std::result::Result<T, AnomalyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_format_display() {
        let error = AnomalyError::data_format("no numeric columns");
        assert_eq!(error.to_string(), "Data format error: no numeric columns");
    }

    #[test]
    fn test_data_shape_display() {
        let error = AnomalyError::DataShape {
            expected: 1,
            got: 3,
        };
        assert_eq!(
            error.to_string(),
            "Data shape error: expected 1 feature column(s), got 3"
        );
    }

    #[test]
    fn test_invalid_parameter_display() {
        let error = AnomalyError::invalid_parameter("epochs", "must be positive");
        assert_eq!(error.to_string(), "Invalid parameter: epochs - must be positive");
    }

    #[test]
    fn test_persistence_display() {
        let error = AnomalyError::persistence("/tmp/model.safetensors", "permission denied");
        assert_eq!(
            error.to_string(),
            "Persistence error at /tmp/model.safetensors: permission denied"
        );
    }

    #[test]
    fn test_model_error_display() {
        let error = AnomalyError::Model("shape mismatch in matmul".to_string());
        assert_eq!(error.to_string(), "Model error: shape mismatch in matmul");
    }

    #[test]
    fn test_external_service_display() {
        let error = AnomalyError::ExternalService("timeout".to_string());
        assert_eq!(error.to_string(), "External service error: timeout");
    }

    #[test]
    fn test_client_error_classification() {
        assert!(AnomalyError::data_format("x").is_client_error());
        assert!(AnomalyError::DataShape { expected: 2, got: 1 }.is_client_error());
        assert!(AnomalyError::invalid_parameter("lr", "zero").is_client_error());
        assert!(!AnomalyError::persistence("p", "r").is_client_error());
        assert!(!AnomalyError::Model("m".to_string()).is_client_error());
        assert!(!AnomalyError::ExternalService("e".to_string()).is_client_error());
    }

    #[test]
    fn test_data_shape_debug() {
        let error = AnomalyError::DataShape {
            expected: 10,
            got: 5,
        };
        let debug_str = format!("{:?}", error);
        assert!(debug_str.contains("DataShape"));
        assert!(debug_str.contains("10"));
        assert!(debug_str.contains("5"));
    }

    #[test]
    fn test_result_type_err() {
        let result: Result<i32> = Err(AnomalyError::data_format("empty"));
        assert!(matches!(result.unwrap_err(), AnomalyError::DataFormat(_)));
    }

    #[test]
    fn test_error_implements_std_error() {
        let error: Box<dyn std::error::Error> =
            Box::new(AnomalyError::Model("test".to_string()));
        assert!(!error.to_string().is_empty());
    }

    #[test]
    fn test_all_error_variants_are_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<AnomalyError>();
    }
}
