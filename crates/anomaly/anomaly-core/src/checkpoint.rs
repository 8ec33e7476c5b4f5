//! Checkpoint persistence.
//!
//! A checkpoint is a safetensors file. Its metadata header records the
//! architecture, so a checkpoint can be loaded without out-of-band knowledge
//! and a load against the wrong architecture fails loudly:
//!
//! | key | value |
//! |-----|-------|
//! | `format` | `lstm-autoencoder` |
//! | `format_version` | `1` |
//! | `input_dim`, `hidden_dim`, `latent_dim`, `n_layers` | decimal integers |

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anomaly_api::ModelConfig;
use anomaly_spi::{AnomalyError, Result};
use safetensors::SafeTensors;
use tracing::{debug, info};

use crate::autoencoder::LstmAutoencoder;

/// Value of the `format` header key.
pub const CHECKPOINT_FORMAT: &str = "lstm-autoencoder";

/// Value of the `format_version` header key.
pub const CHECKPOINT_VERSION: &str = "1";

fn header_for(config: &ModelConfig) -> HashMap<String, String> {
    HashMap::from([
        ("format".to_string(), CHECKPOINT_FORMAT.to_string()),
        ("format_version".to_string(), CHECKPOINT_VERSION.to_string()),
        ("input_dim".to_string(), config.input_dim.to_string()),
        ("hidden_dim".to_string(), config.hidden_dim.to_string()),
        ("latent_dim".to_string(), config.latent_dim.to_string()),
        ("n_layers".to_string(), config.n_layers.to_string()),
    ])
}

/// Write a model's parameters and architecture header to `path`.
pub fn save_checkpoint(model: &LstmAutoencoder, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .map_err(|e| AnomalyError::persistence(parent, e.to_string()))?;
        }
    }

    let params = model.named_parameters()?;
    let header = Some(header_for(model.config()));
    safetensors::serialize_to_file(params, &header, path)
        .map_err(|e| AnomalyError::persistence(path, e.to_string()))?;

    info!(path = %path.display(), "checkpoint saved");
    Ok(())
}

/// Read the architecture header of a checkpoint without loading weights.
pub fn inspect_checkpoint(path: impl AsRef<Path>) -> Result<ModelConfig> {
    let path = path.as_ref();
    let buffer = fs::read(path).map_err(|e| AnomalyError::persistence(path, e.to_string()))?;
    let (_, metadata) = SafeTensors::read_metadata(&buffer)
        .map_err(|e| AnomalyError::persistence(path, format!("not a safetensors file: {}", e)))?;

    let header = metadata
        .metadata()
        .as_ref()
        .ok_or_else(|| AnomalyError::persistence(path, "checkpoint has no architecture header"))?;

    match header.get("format").map(String::as_str) {
        Some(CHECKPOINT_FORMAT) => {}
        other => {
            return Err(AnomalyError::persistence(
                path,
                format!("unsupported checkpoint format {:?}", other),
            ))
        }
    }
    if header.get("format_version").map(String::as_str) != Some(CHECKPOINT_VERSION) {
        return Err(AnomalyError::persistence(
            path,
            format!(
                "unsupported checkpoint version {:?}",
                header.get("format_version")
            ),
        ));
    }

    let field = |name: &str| -> Result<usize> {
        header
            .get(name)
            .ok_or_else(|| AnomalyError::persistence(path, format!("header is missing {}", name)))?
            .parse::<usize>()
            .map_err(|e| AnomalyError::persistence(path, format!("header field {}: {}", name, e)))
    };

    let config = ModelConfig::new(
        field("input_dim")?,
        field("hidden_dim")?,
        field("latent_dim")?,
        field("n_layers")?,
    );
    debug!(path = %path.display(), ?config, "read checkpoint header");
    Ok(config)
}

/// Load a checkpoint into a model built from its own header.
pub fn load_checkpoint(path: impl AsRef<Path>) -> Result<LstmAutoencoder> {
    let path = path.as_ref();
    let config = inspect_checkpoint(path)?;
    LstmAutoencoder::load(path, &config)
}

pub(crate) fn ensure_same_architecture(
    path: &Path,
    stored: &ModelConfig,
    expected: &ModelConfig,
) -> Result<()> {
    let fields = [
        ("input_dim", stored.input_dim, expected.input_dim),
        ("hidden_dim", stored.hidden_dim, expected.hidden_dim),
        ("latent_dim", stored.latent_dim, expected.latent_dim),
        ("n_layers", stored.n_layers, expected.n_layers),
    ];
    for (name, stored, expected) in fields {
        if stored != expected {
            return Err(AnomalyError::persistence(
                path,
                format!(
                    "architecture mismatch: {} is {} in checkpoint, {} requested",
                    name, stored, expected
                ),
            ));
        }
    }
    Ok(())
}
