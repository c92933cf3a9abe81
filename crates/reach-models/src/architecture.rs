//! Network definition
//!
//! token ids → embedding → masked self-attention → masked mean pooling →
//! batch norm (inference statistics) → concat numeric features →
//! dense + ReLU → dropout (identity at inference) → linear head.
//!
//! The layer shapes are a fixed contract with the trained weights.

use candle_core::{DType, Device as CandleDevice, Module, ModuleT, Tensor};
use candle_nn::{
    batch_norm, embedding, linear, BatchNorm, BatchNormConfig, Dropout, Embedding, Linear,
    VarBuilder,
};
use reach_types::{
    ReachError, Result, NUM_NUMERIC_FEATURES, NUM_TARGETS, PAD_TOKEN_ID, SEQUENCE_LENGTH,
    VOCAB_SIZE,
};
use tracing::debug;

use crate::attention::SelfAttention;

/// Layer dimensions of the network
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArchitectureSpec {
    pub sequence_length: usize,
    pub vocab_size: usize,
    pub embed_dim: usize,
    pub num_heads: usize,
    pub key_dim: usize,
    pub num_numeric_features: usize,
    pub dense_units: usize,
    pub dropout_rate: f32,
    pub norm_eps: f64,
    pub num_outputs: usize,
}

impl Default for ArchitectureSpec {
    /// The trained configuration
    fn default() -> Self {
        Self {
            sequence_length: SEQUENCE_LENGTH,
            vocab_size: VOCAB_SIZE,
            embed_dim: 128,
            num_heads: 4,
            key_dim: 128,
            num_numeric_features: NUM_NUMERIC_FEATURES,
            dense_units: 256,
            dropout_rate: 0.4,
            norm_eps: 1e-3,
            num_outputs: NUM_TARGETS,
        }
    }
}

impl ArchitectureSpec {
    /// Width after concatenating pooled text and numeric features
    pub fn concat_dim(&self) -> usize {
        self.embed_dim + self.num_numeric_features
    }

    pub fn attention_dim(&self) -> usize {
        self.num_heads * self.key_dim
    }

    /// Every parameter the network restores, with its shape
    pub fn parameter_shapes(&self) -> Vec<(String, Vec<usize>)> {
        let d = self.embed_dim;
        let inner = self.attention_dim();
        let mut shapes = vec![("embedding.weight".to_string(), vec![self.vocab_size, d])];
        for proj in ["query", "key", "value"] {
            shapes.push((format!("attention.{proj}.weight"), vec![inner, d]));
            shapes.push((format!("attention.{proj}.bias"), vec![inner]));
        }
        shapes.push(("attention.output.weight".to_string(), vec![d, inner]));
        shapes.push(("attention.output.bias".to_string(), vec![d]));
        for stat in ["weight", "bias", "running_mean", "running_var"] {
            shapes.push((format!("norm.{stat}"), vec![d]));
        }
        shapes.push(("dense.weight".to_string(), vec![self.dense_units, self.concat_dim()]));
        shapes.push(("dense.bias".to_string(), vec![self.dense_units]));
        shapes.push(("head.weight".to_string(), vec![self.num_outputs, self.dense_units]));
        shapes.push(("head.bias".to_string(), vec![self.num_outputs]));
        shapes
    }
}

/// The engagement prediction network
#[derive(Debug, Clone)]
pub struct EngagementModel {
    embedding: Embedding,
    attention: SelfAttention,
    norm: BatchNorm,
    dense: Linear,
    dropout: Dropout,
    head: Linear,
    spec: ArchitectureSpec,
    device: CandleDevice,
}

impl EngagementModel {
    /// Construct the graph, pulling parameters from `vb`.
    ///
    /// Deterministic: the same spec always produces the same parameter
    /// names and shapes.
    pub fn build(spec: ArchitectureSpec, vb: VarBuilder) -> Result<Self> {
        let device = vb.device().clone();
        let norm_config = BatchNormConfig {
            eps: spec.norm_eps,
            remove_mean: true,
            affine: true,
            momentum: 0.01,
        };

        let model = (|| -> candle_core::Result<Self> {
            Ok(Self {
                embedding: embedding(spec.vocab_size, spec.embed_dim, vb.pp("embedding"))?,
                attention: SelfAttention::new(
                    spec.embed_dim,
                    spec.num_heads,
                    spec.key_dim,
                    vb.pp("attention"),
                )?,
                norm: batch_norm(spec.embed_dim, norm_config, vb.pp("norm"))?,
                dense: linear(spec.concat_dim(), spec.dense_units, vb.pp("dense"))?,
                dropout: Dropout::new(spec.dropout_rate),
                head: linear(spec.dense_units, spec.num_outputs, vb.pp("head"))?,
                spec,
                device: device.clone(),
            })
        })()
        .map_err(|e| ReachError::model(format!("Failed to build network: {}", e)))?;

        debug!(
            "Network built: seq={}, vocab={}, embed={}, heads={}x{}, dense={}, outputs={}",
            spec.sequence_length,
            spec.vocab_size,
            spec.embed_dim,
            spec.num_heads,
            spec.key_dim,
            spec.dense_units,
            spec.num_outputs
        );
        Ok(model)
    }

    pub fn spec(&self) -> &ArchitectureSpec {
        &self.spec
    }

    pub fn device(&self) -> &CandleDevice {
        &self.device
    }

    /// `tokens`: `(b, seq)` u32; `numeric`: `(b, features)` f32 → `(b, outputs)`
    pub fn forward(&self, tokens: &Tensor, numeric: &Tensor) -> candle_core::Result<Tensor> {
        let mask = tokens.ne(PAD_TOKEN_ID)?.to_dtype(DType::F32)?;

        let embedded = self.embedding.forward(tokens)?;
        let attended = self.attention.forward(&embedded, &mask)?;

        // Mean over real tokens only; an all-padding sequence pools to zeros.
        let mask3 = mask.unsqueeze(2)?;
        let summed = attended.broadcast_mul(&mask3)?.sum(1)?;
        let count = mask.sum_keepdim(1)?.clamp(1e-9f32, f32::MAX)?;
        let pooled = summed.broadcast_div(&count)?;

        let normed = self.norm.forward_t(&pooled, false)?;
        let joined = Tensor::cat(&[&normed, numeric], 1)?;

        let hidden = self.dense.forward(&joined)?.relu()?;
        let hidden = self.dropout.forward(&hidden, false)?;
        self.head.forward(&hidden)
    }

    /// Run one all-zero example through the graph to check every layer
    /// accepts the contract shapes.
    pub fn materialize(&self) -> Result<()> {
        let run = || -> candle_core::Result<Tensor> {
            let tokens = Tensor::zeros((1, self.spec.sequence_length), DType::U32, &self.device)?;
            let numeric =
                Tensor::zeros((1, self.spec.num_numeric_features), DType::F32, &self.device)?;
            self.forward(&tokens, &numeric)
        };
        let output =
            run().map_err(|e| ReachError::model(format!("Dummy forward pass failed: {}", e)))?;

        let dims = output.dims().to_vec();
        if dims != [1, self.spec.num_outputs] {
            return Err(ReachError::model(format!(
                "Unexpected output shape {:?}, expected [1, {}]",
                dims, self.spec.num_outputs
            )));
        }
        Ok(())
    }
}
