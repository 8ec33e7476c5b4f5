//! LSTM sequence autoencoder.
//!
//! ```text
//! (L, B, input_dim)
//!        │  encoder: n_layers × LSTM(input_dim → hidden_dim)
//!        ▼
//! (L, B, hidden_dim) ── enc_fc ──▶ (L, B, latent_dim)    bottleneck
//!                                        │
//!                                     dec_fc
//!                                        ▼
//! (L, B, hidden_dim) ◀── decoder: n_layers × LSTM(hidden_dim → hidden_dim)
//!        │  output_fc
//!        ▼
//! (L, B, input_dim)                                     reconstruction
//! ```
//!
//! Recurrent states start at zero on every call, so the output depends only
//! on the parameters and the input.

use std::path::Path;

use anomaly_api::ModelConfig;
use anomaly_spi::{AnomalyError, NumericTable, Result};
use candle_core::{DType, Device, Module, Tensor, Var};
use candle_nn::{linear, lstm, LSTMConfig, Linear, VarBuilder, VarMap, LSTM, RNN};

use crate::backend_error;
use crate::checkpoint;

/// Encoder–bottleneck–decoder network over a single feature sequence.
///
/// Parameters live in a [`VarMap`] owned by this instance. They change only
/// through an optimizer during training or through [`LstmAutoencoder::load`].
pub struct LstmAutoencoder {
    config: ModelConfig,
    encoder: Vec<LSTM>,
    enc_fc: Linear,
    dec_fc: Linear,
    decoder: Vec<LSTM>,
    output_fc: Linear,
    varmap: VarMap,
    device: Device,
}

impl std::fmt::Debug for LstmAutoencoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LstmAutoencoder")
            .field("config", &self.config)
            .field("device", &self.device)
            .finish()
    }
}

impl LstmAutoencoder {
    /// Create a freshly initialized model on the CPU.
    pub fn new(config: ModelConfig) -> Result<Self> {
        Self::with_device(config, &Device::Cpu)
    }

    /// Create a freshly initialized model on the given device.
    pub fn with_device(config: ModelConfig, device: &Device) -> Result<Self> {
        config.validate()?;

        let varmap = VarMap::new();
        let vb = VarBuilder::from_varmap(&varmap, DType::F32, device);

        let encoder = stacked_lstm(
            config.input_dim,
            config.hidden_dim,
            config.n_layers,
            vb.pp("encoder"),
        )
        .map_err(backend_error)?;
        let enc_fc =
            linear(config.hidden_dim, config.latent_dim, vb.pp("enc_fc")).map_err(backend_error)?;
        let dec_fc =
            linear(config.latent_dim, config.hidden_dim, vb.pp("dec_fc")).map_err(backend_error)?;
        let decoder = stacked_lstm(
            config.hidden_dim,
            config.hidden_dim,
            config.n_layers,
            vb.pp("decoder"),
        )
        .map_err(backend_error)?;
        let output_fc = linear(config.hidden_dim, config.input_dim, vb.pp("output_fc"))
            .map_err(backend_error)?;

        Ok(Self {
            config,
            encoder,
            enc_fc,
            dec_fc,
            decoder,
            output_fc,
            varmap,
            device: device.clone(),
        })
    }

    /// Load parameters saved for exactly this architecture.
    ///
    /// # Errors
    ///
    /// Returns [`AnomalyError::Persistence`] if the file cannot be read, has
    /// no architecture header, or was saved for a different architecture.
    pub fn load(path: impl AsRef<Path>, config: &ModelConfig) -> Result<Self> {
        let path = path.as_ref();
        let stored = checkpoint::inspect_checkpoint(path)?;
        checkpoint::ensure_same_architecture(path, &stored, config)?;

        let mut model = Self::new(*config)?;
        model
            .varmap
            .load(path)
            .map_err(|e| AnomalyError::persistence(path, e.to_string()))?;
        Ok(model)
    }

    /// Save parameters and the architecture header, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        checkpoint::save_checkpoint(self, path)
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    pub fn device(&self) -> &Device {
        &self.device
    }

    /// All trainable variables, for the optimizer.
    pub fn trainable_vars(&self) -> Vec<Var> {
        self.varmap.all_vars()
    }

    /// Parameter tensors keyed by their module path, sorted by name.
    pub fn named_parameters(&self) -> Result<Vec<(String, Tensor)>> {
        let vars = self
            .varmap
            .data()
            .lock()
            .map_err(|_| AnomalyError::Model("parameter store lock poisoned".to_string()))?;
        let mut params: Vec<(String, Tensor)> = vars
            .iter()
            .map(|(name, var)| (name.clone(), var.as_tensor().clone()))
            .collect();
        params.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(params)
    }

    /// Fail with [`AnomalyError::DataShape`] unless the table width matches `input_dim`.
    pub fn check_input(&self, table: &NumericTable) -> Result<()> {
        if table.n_features() != self.config.input_dim {
            return Err(AnomalyError::DataShape {
                expected: self.config.input_dim,
                got: table.n_features(),
            });
        }
        Ok(())
    }

    /// Reshape a table into a `(rows, 1, features)` sequence tensor.
    pub fn sequence_tensor(&self, table: &NumericTable) -> Result<Tensor> {
        Tensor::from_vec(
            table.to_f32_flat(),
            (table.n_rows(), 1, table.n_features()),
            &self.device,
        )
        .map_err(backend_error)
    }
}

impl Module for LstmAutoencoder {
    /// `xs` is `(seq_len, batch, input_dim)`; the output has the same shape.
    fn forward(&self, xs: &Tensor) -> candle_core::Result<Tensor> {
        // candle's recurrent layers are batch-first
        let xs = xs.transpose(0, 1)?.contiguous()?;

        let encoded = run_stack(&self.encoder, &xs)?;
        let latent = self.enc_fc.forward(&encoded)?;
        let expanded = self.dec_fc.forward(&latent)?;
        let decoded = run_stack(&self.decoder, &expanded)?;
        let reconstructed = self.output_fc.forward(&decoded)?;

        reconstructed.transpose(0, 1)?.contiguous()
    }
}

fn stacked_lstm(
    in_dim: usize,
    hidden_dim: usize,
    n_layers: usize,
    vb: VarBuilder,
) -> candle_core::Result<Vec<LSTM>> {
    (0..n_layers)
        .map(|layer_idx| {
            let layer_in = if layer_idx == 0 { in_dim } else { hidden_dim };
            let config = LSTMConfig {
                layer_idx,
                ..Default::default()
            };
            lstm(layer_in, hidden_dim, config, vb.clone())
        })
        .collect()
}

/// Run a batch-first sequence through each layer in turn, returning the
/// last layer's hidden state at every timestep.
fn run_stack(layers: &[LSTM], xs: &Tensor) -> candle_core::Result<Tensor> {
    let mut out = xs.clone();
    for layer in layers {
        let states = layer.seq(&out)?;
        out = layer.states_to_tensor(&states)?;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp_table(rows: usize, features: usize) -> NumericTable {
        let columns = (0..features).map(|i| format!("f{}", i)).collect();
        let data = (0..rows)
            .map(|r| (0..features).map(|f| (r * features + f) as f64 * 0.1).collect())
            .collect();
        NumericTable::new(columns, data).unwrap()
    }

    #[test]
    fn test_forward_preserves_shape() {
        let model = LstmAutoencoder::new(ModelConfig::new(3, 8, 4, 1)).unwrap();
        let table = ramp_table(12, 3);
        let input = model.sequence_tensor(&table).unwrap();
        let output = model.forward(&input).unwrap();
        assert_eq!(output.dims(), &[12, 1, 3]);
    }

    #[test]
    fn test_forward_stacked_layers() {
        let model = LstmAutoencoder::new(ModelConfig::new(2, 6, 3, 3)).unwrap();
        let table = ramp_table(5, 2);
        let input = model.sequence_tensor(&table).unwrap();
        let output = model.forward(&input).unwrap();
        assert_eq!(output.dims(), &[5, 1, 2]);
    }

    #[test]
    fn test_forward_is_deterministic() {
        let model = LstmAutoencoder::new(ModelConfig::new(1, 8, 4, 1)).unwrap();
        let table = ramp_table(10, 1);
        let input = model.sequence_tensor(&table).unwrap();
        let a: Vec<f32> = model.forward(&input).unwrap().flatten_all().unwrap().to_vec1().unwrap();
        let b: Vec<f32> = model.forward(&input).unwrap().flatten_all().unwrap().to_vec1().unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_parameter_names() {
        let model = LstmAutoencoder::new(ModelConfig::new(1, 4, 2, 2)).unwrap();
        let names: Vec<String> = model
            .named_parameters()
            .unwrap()
            .into_iter()
            .map(|(name, _)| name)
            .collect();
        assert!(names.contains(&"encoder.weight_ih_l0".to_string()));
        assert!(names.contains(&"encoder.weight_hh_l1".to_string()));
        assert!(names.contains(&"decoder.bias_ih_l1".to_string()));
        assert!(names.contains(&"enc_fc.weight".to_string()));
        assert!(names.contains(&"output_fc.bias".to_string()));
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let err = LstmAutoencoder::new(ModelConfig::new(1, 0, 4, 1)).unwrap_err();
        assert!(matches!(err, AnomalyError::InvalidParameter { .. }));
    }

    #[test]
    fn test_check_input_mismatch() {
        let model = LstmAutoencoder::new(ModelConfig::default()).unwrap();
        let table = ramp_table(4, 2);
        let err = model.check_input(&table).unwrap_err();
        assert!(matches!(err, AnomalyError::DataShape { expected: 1, got: 2 }));
    }

    #[test]
    fn test_sequence_tensor_layout() {
        let model = LstmAutoencoder::new(ModelConfig::new(2, 4, 2, 1)).unwrap();
        let table = ramp_table(3, 2);
        let tensor = model.sequence_tensor(&table).unwrap();
        assert_eq!(tensor.dims(), &[3, 1, 2]);
        let values: Vec<f32> = tensor.flatten_all().unwrap().to_vec1().unwrap();
        assert_eq!(values, table.to_f32_flat());
    }
}
