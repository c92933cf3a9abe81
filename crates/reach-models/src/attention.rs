//! Masked multi-head self-attention

use candle_core::{DType, Module, Tensor, D};
use candle_nn::{linear, Linear, VarBuilder};

/// Additive bias applied to attention scores of padded keys
const MASKED_SCORE: f64 = -1e9;

/// Self-attention with separate query/key/value projections and an output
/// projection back to the model width.
#[derive(Debug, Clone)]
pub struct SelfAttention {
    query: Linear,
    key: Linear,
    value: Linear,
    output: Linear,
    num_heads: usize,
    key_dim: usize,
    scale: f64,
}

impl SelfAttention {
    pub fn new(d_model: usize, num_heads: usize, key_dim: usize, vb: VarBuilder) -> candle_core::Result<Self> {
        let inner = num_heads * key_dim;
        Ok(Self {
            query: linear(d_model, inner, vb.pp("query"))?,
            key: linear(d_model, inner, vb.pp("key"))?,
            value: linear(d_model, inner, vb.pp("value"))?,
            output: linear(inner, d_model, vb.pp("output"))?,
            num_heads,
            key_dim,
            scale: 1.0 / (key_dim as f64).sqrt(),
        })
    }

    /// `(b, l, d)` → `(b, h, l, k)`
    fn split_heads(&self, x: &Tensor) -> candle_core::Result<Tensor> {
        let (b, l, _) = x.dims3()?;
        x.reshape((b, l, self.num_heads, self.key_dim))?
            .transpose(1, 2)?
            .contiguous()
    }

    /// `x`: `(b, l, d)`; `mask`: `(b, l)` with 1.0 for real tokens, 0.0 for padding.
    ///
    /// Padded keys receive no attention weight. Rows for padded queries are
    /// still computed and must be excluded downstream.
    pub fn forward(&self, x: &Tensor, mask: &Tensor) -> candle_core::Result<Tensor> {
        let (b, l, _) = x.dims3()?;

        let q = self.split_heads(&self.query.forward(x)?)?;
        let k = self.split_heads(&self.key.forward(x)?)?;
        let v = self.split_heads(&self.value.forward(x)?)?;

        let scores = (q.matmul(&k.t()?.contiguous()?)? * self.scale)?;

        // (b, l) → (b, 1, 1, l)
        let key_bias = mask
            .to_dtype(DType::F32)?
            .affine(-MASKED_SCORE, MASKED_SCORE)?
            .reshape((b, 1, 1, l))?;
        let scores = scores.broadcast_add(&key_bias)?;
        let weights = candle_nn::ops::softmax(&scores, D::Minus1)?;

        let context = weights
            .matmul(&v)?
            .transpose(1, 2)?
            .contiguous()?
            .reshape((b, l, self.num_heads * self.key_dim))?;
        self.output.forward(&context)
    }
}
