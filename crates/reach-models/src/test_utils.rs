//! Synthetic artifact writers for tests
//!
//! Produces small, deterministic weights, tokenizers and scalers on disk so
//! both weight-restoration paths and the full pipeline can be exercised
//! without a trained model.

use std::collections::HashMap;
use std::path::Path;

use candle_core::{Device as CandleDevice, Tensor};
use reach_types::{ReachError, Result, NUM_TARGETS};
use serde_json::json;

use crate::architecture::ArchitectureSpec;
use crate::loader::{compat, primary};

/// A reduced architecture that keeps the input/output contract
pub fn small_spec() -> ArchitectureSpec {
    ArchitectureSpec {
        vocab_size: 64,
        embed_dim: 8,
        num_heads: 2,
        key_dim: 4,
        dense_units: 16,
        ..ArchitectureSpec::default()
    }
}

fn candle_err(e: candle_core::Error) -> ReachError {
    ReachError::internal(format!("fixture tensor error: {}", e))
}

fn pattern(len: usize, seed: u64) -> Vec<f32> {
    (0..len as u64)
        .map(|i| {
            let h = (i.wrapping_mul(2_654_435_761).wrapping_add(seed * 97)) % 2001;
            (h as f32 / 1000.0 - 1.0) * 0.25
        })
        .collect()
}

/// Deterministic parameters for every tensor of `spec`, keyed by graph name
pub fn synthetic_parameters(spec: &ArchitectureSpec, seed: u64) -> Result<HashMap<String, Tensor>> {
    let device = CandleDevice::Cpu;
    let mut tensors = HashMap::new();
    for (i, (name, shape)) in spec.parameter_shapes().into_iter().enumerate() {
        let len: usize = shape.iter().product();
        let mut values = pattern(len, seed + i as u64);
        if name == "norm.running_var" {
            values.iter_mut().for_each(|v| *v = v.abs() + 0.5);
        }
        let tensor = Tensor::from_vec(values, shape, &device).map_err(candle_err)?;
        tensors.insert(name, tensor);
    }
    Ok(tensors)
}

/// Write flat weights as `<dir>/model.safetensors`
pub fn write_flat_weights(dir: &Path, spec: &ArchitectureSpec, seed: u64) -> Result<()> {
    std::fs::create_dir_all(dir)?;
    let tensors = synthetic_parameters(spec, seed)?;
    candle_core::safetensors::save(&tensors, dir.join(primary::WEIGHTS_FILE)).map_err(candle_err)
}

fn saved_layout(spec: &ArchitectureSpec, flat: &HashMap<String, Tensor>) -> Result<HashMap<String, Tensor>> {
    let d = spec.embed_dim;
    let (h, k) = (spec.num_heads, spec.key_dim);
    let get = |name: &str| {
        flat.get(name)
            .cloned()
            .ok_or_else(|| ReachError::internal(format!("missing fixture tensor {name}")))
    };
    let kernel = |t: Tensor| -> Result<Tensor> { t.t().and_then(|t| t.contiguous()).map_err(candle_err) };

    let mut saved = HashMap::new();
    saved.insert("layers/embedding/vars/0".to_string(), get("embedding.weight")?);
    for proj in ["query", "key", "value"] {
        let w = kernel(get(&format!("attention.{proj}.weight"))?)?
            .reshape((d, h, k))
            .map_err(candle_err)?;
        let b = get(&format!("attention.{proj}.bias"))?.reshape((h, k)).map_err(candle_err)?;
        saved.insert(format!("layers/multi_head_attention/{proj}_dense/vars/0"), w);
        saved.insert(format!("layers/multi_head_attention/{proj}_dense/vars/1"), b);
    }
    let w = kernel(get("attention.output.weight")?)?
        .reshape((h, k, d))
        .map_err(candle_err)?;
    saved.insert("layers/multi_head_attention/output_dense/vars/0".to_string(), w);
    saved.insert(
        "layers/multi_head_attention/output_dense/vars/1".to_string(),
        get("attention.output.bias")?,
    );
    for (i, stat) in ["weight", "bias", "running_mean", "running_var"].iter().enumerate() {
        saved.insert(
            format!("layers/batch_normalization/vars/{i}"),
            get(&format!("norm.{stat}"))?,
        );
    }
    saved.insert("layers/dense/vars/0".to_string(), kernel(get("dense.weight")?)?);
    saved.insert("layers/dense/vars/1".to_string(), get("dense.bias")?);
    saved.insert("layers/dense_1/vars/0".to_string(), kernel(get("head.weight")?)?);
    saved.insert("layers/dense_1/vars/1".to_string(), get("head.bias")?);
    Ok(saved)
}

/// Saved functional-model description for `spec`
pub fn saved_model_config(spec: &ArchitectureSpec, quantization_config: bool) -> serde_json::Value {
    let mut embedding = json!({
        "name": "embedding",
        "trainable": true,
        "dtype": "float32",
        "input_dim": spec.vocab_size,
        "output_dim": spec.embed_dim,
        "embeddings_initializer": {"module": "keras.initializers", "class_name": "RandomUniform"},
        "mask_zero": true
    });
    if quantization_config {
        embedding["quantization_config"] = json!({"mode": "int8"});
    }

    json!({
        "module": "keras.src.models.functional",
        "class_name": "Functional",
        "config": {
            "name": "functional",
            "trainable": true,
            "layers": [
                {"class_name": "InputLayer", "name": "seq_input",
                 "config": {"name": "seq_input", "batch_shape": [null, spec.sequence_length]}},
                {"class_name": "InputLayer", "name": "num_input",
                 "config": {"name": "num_input", "batch_shape": [null, spec.num_numeric_features]}},
                {"class_name": "Embedding", "name": "embedding", "config": embedding},
                {"class_name": "MultiHeadAttention", "name": "multi_head_attention",
                 "config": {"name": "multi_head_attention", "num_heads": spec.num_heads,
                            "key_dim": spec.key_dim, "value_dim": spec.key_dim,
                            "dropout": 0.0, "use_bias": true}},
                {"class_name": "GlobalAveragePooling1D", "name": "global_average_pooling1d",
                 "config": {"name": "global_average_pooling1d"}},
                {"class_name": "BatchNormalization", "name": "batch_normalization",
                 "config": {"name": "batch_normalization", "epsilon": spec.norm_eps,
                            "momentum": 0.99, "center": true, "scale": true}},
                {"class_name": "Concatenate", "name": "concatenate",
                 "config": {"name": "concatenate", "axis": -1}},
                {"class_name": "Dense", "name": "dense",
                 "config": {"name": "dense", "units": spec.dense_units, "activation": "relu"}},
                {"class_name": "Dropout", "name": "dropout",
                 "config": {"name": "dropout", "rate": spec.dropout_rate}},
                {"class_name": "Dense", "name": "dense_1",
                 "config": {"name": "dense_1", "units": spec.num_outputs, "activation": "linear"}}
            ]
        }
    })
}

/// Write a saved-model bundle into `dir` holding the same parameters
/// [`write_flat_weights`] writes for `seed`
pub fn write_saved_bundle(
    dir: &Path,
    spec: &ArchitectureSpec,
    seed: u64,
    quantization_config: bool,
) -> Result<()> {
    std::fs::create_dir_all(dir)?;
    let flat = synthetic_parameters(spec, seed)?;
    let saved = saved_layout(spec, &flat)?;
    candle_core::safetensors::save(&saved, dir.join(compat::WEIGHTS_FILE)).map_err(candle_err)?;

    let config = saved_model_config(spec, quantization_config);
    std::fs::write(dir.join(compat::CONFIG_FILE), serde_json::to_string_pretty(&config)?)?;
    Ok(())
}

/// Write a word-index tokenizer document; ids follow `words` order from 2,
/// with `<OOV>` as id 1
pub fn write_word_index_tokenizer(path: &Path, words: &[&str]) -> Result<()> {
    let mut index: HashMap<String, u32> = HashMap::new();
    index.insert("<OOV>".to_string(), 1);
    for (i, w) in words.iter().enumerate() {
        index.insert(w.to_string(), i as u32 + 2);
    }
    let doc = json!({
        "class_name": "Tokenizer",
        "config": {
            "num_words": null,
            "lower": true,
            "split": " ",
            "char_level": false,
            "oov_token": "<OOV>",
            "word_index": serde_json::to_string(&index)?
        }
    });
    std::fs::write(path, serde_json::to_string(&doc)?)?;
    Ok(())
}

/// Write a `tokenizers` word-level file with ids from 1 in `words` order.
///
/// The vocabulary has no unknown token, so encoding any other word fails.
pub fn write_word_level_tokenizer(path: &Path, words: &[&str]) -> Result<()> {
    let vocab: HashMap<String, u32> = words
        .iter()
        .enumerate()
        .map(|(i, w)| (w.to_string(), i as u32 + 1))
        .collect();
    let doc = json!({
        "version": "1.0",
        "truncation": null,
        "padding": null,
        "added_tokens": [],
        "normalizer": null,
        "pre_tokenizer": {"type": "WhitespaceSplit"},
        "post_processor": null,
        "decoder": null,
        "model": {"type": "WordLevel", "vocab": vocab, "unk_token": "<unk>"}
    });
    std::fs::write(path, serde_json::to_string(&doc)?)?;
    Ok(())
}

/// Write a standard scaler document
pub fn write_standard_scaler(path: &Path, mean: [f64; NUM_TARGETS], scale: [f64; NUM_TARGETS]) -> Result<()> {
    let doc = json!({"kind": "standard", "mean": mean, "scale": scale});
    std::fs::write(path, serde_json::to_string(&doc)?)?;
    Ok(())
}
