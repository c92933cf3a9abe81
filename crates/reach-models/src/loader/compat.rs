//! Saved-model bundle restoration
//!
//! A bundle directory holds `config.json`, the saved functional-model
//! description, and `model.weights.safetensors` with tensors named
//! `layers/<layer>/[<sublayer>/]vars/<i>` in the saved layout (dense kernels
//! `[in, out]`, attention kernels split per head). Layer configs written by
//! newer runtimes may carry fields this loader does not model; the embedding
//! `quantization_config` is accepted and discarded. Every layer is checked
//! against the fixed architecture before tensors are converted.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use candle_core::{DType, Device as CandleDevice, Tensor};
use candle_nn::VarBuilder;
use reach_types::{ReachError, Result};
use serde::Deserialize;
use tracing::{debug, info};

use crate::architecture::{ArchitectureSpec, EngagementModel};

pub const CONFIG_FILE: &str = "config.json";
pub const WEIGHTS_FILE: &str = "model.weights.safetensors";

#[derive(Debug, Deserialize)]
struct SavedModel {
    class_name: String,
    config: SavedModelConfig,
}

#[derive(Debug, Deserialize)]
struct SavedModelConfig {
    #[serde(default)]
    name: Option<String>,
    layers: Vec<SavedLayer>,
}

#[derive(Debug, Deserialize)]
struct SavedLayer {
    class_name: String,
    #[serde(default)]
    name: Option<String>,
    config: serde_json::Value,
}

impl SavedLayer {
    fn parse<T: for<'de> Deserialize<'de>>(&self) -> Result<T> {
        serde_json::from_value(self.config.clone()).map_err(|e| {
            ReachError::model(format!("Invalid {} layer config: {}", self.class_name, e))
        })
    }
}

/// Embedding config that tolerates `quantization_config`
#[derive(Debug, Deserialize)]
struct CompatEmbeddingConfig {
    name: String,
    input_dim: usize,
    output_dim: usize,
    #[serde(default)]
    mask_zero: bool,
    #[serde(default)]
    quantization_config: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct AttentionConfig {
    name: String,
    num_heads: usize,
    key_dim: usize,
    #[serde(default)]
    value_dim: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct BatchNormLayerConfig {
    name: String,
    #[serde(default = "default_bn_epsilon")]
    epsilon: f64,
}

fn default_bn_epsilon() -> f64 {
    1e-3
}

#[derive(Debug, Deserialize)]
struct DenseConfig {
    name: String,
    units: usize,
    #[serde(default)]
    activation: Option<String>,
}

/// Layer names resolved from the saved description
#[derive(Debug)]
struct LayerNames {
    embedding: String,
    attention: String,
    norm: String,
    dense: String,
    head: String,
}

fn mismatch(what: &str, found: impl std::fmt::Debug, expected: impl std::fmt::Debug) -> ReachError {
    ReachError::model(format!(
        "Saved {} does not match architecture: found {:?}, expected {:?}",
        what, found, expected
    ))
}

/// Check every parameterized layer against `spec` and collect layer names
fn resolve_layers(spec: &ArchitectureSpec, saved: &SavedModel) -> Result<LayerNames> {
    let mut embedding = None;
    let mut attention = None;
    let mut norm = None;
    let mut dense_layers = Vec::new();

    for layer in &saved.config.layers {
        match layer.class_name.as_str() {
            "Embedding" => {
                let cfg: CompatEmbeddingConfig = layer.parse()?;
                if cfg.quantization_config.is_some() {
                    debug!("Discarding quantization_config on embedding '{}'", cfg.name);
                }
                if (cfg.input_dim, cfg.output_dim) != (spec.vocab_size, spec.embed_dim) {
                    return Err(mismatch(
                        "embedding",
                        (cfg.input_dim, cfg.output_dim),
                        (spec.vocab_size, spec.embed_dim),
                    ));
                }
                if !cfg.mask_zero {
                    return Err(ReachError::model("Saved embedding does not mask token 0"));
                }
                embedding = Some(cfg.name);
            }
            "MultiHeadAttention" => {
                let cfg: AttentionConfig = layer.parse()?;
                let value_dim = cfg.value_dim.unwrap_or(cfg.key_dim);
                if (cfg.num_heads, cfg.key_dim, value_dim)
                    != (spec.num_heads, spec.key_dim, spec.key_dim)
                {
                    return Err(mismatch(
                        "attention",
                        (cfg.num_heads, cfg.key_dim, value_dim),
                        (spec.num_heads, spec.key_dim, spec.key_dim),
                    ));
                }
                attention = Some(cfg.name);
            }
            "BatchNormalization" => {
                let cfg: BatchNormLayerConfig = layer.parse()?;
                if (cfg.epsilon - spec.norm_eps).abs() > f64::EPSILON {
                    return Err(mismatch("normalization epsilon", cfg.epsilon, spec.norm_eps));
                }
                norm = Some(cfg.name);
            }
            "Dense" => dense_layers.push(layer.parse::<DenseConfig>()?),
            other => {
                debug!(
                    "Skipping parameter-free layer {} ({})",
                    layer.name.as_deref().unwrap_or("unnamed"),
                    other
                );
            }
        }
    }

    let [dense, head]: [DenseConfig; 2] = dense_layers
        .try_into()
        .map_err(|v: Vec<DenseConfig>| mismatch("dense layer count", v.len(), 2))?;
    if dense.units != spec.dense_units || dense.activation.as_deref() != Some("relu") {
        return Err(mismatch(
            "hidden dense",
            (dense.units, dense.activation),
            (spec.dense_units, "relu"),
        ));
    }
    let head_activation = head.activation.as_deref().unwrap_or("linear");
    if head.units != spec.num_outputs || head_activation != "linear" {
        return Err(mismatch(
            "output dense",
            (head.units, head_activation),
            (spec.num_outputs, "linear"),
        ));
    }

    Ok(LayerNames {
        embedding: embedding.ok_or_else(|| ReachError::model("Saved model has no Embedding"))?,
        attention: attention
            .ok_or_else(|| ReachError::model("Saved model has no MultiHeadAttention"))?,
        norm: norm.ok_or_else(|| ReachError::model("Saved model has no BatchNormalization"))?,
        dense: dense.name,
        head: head.name,
    })
}

/// Tensors of one saved bundle, addressed by saved-layout name
struct SavedTensors {
    tensors: HashMap<String, Tensor>,
}

impl SavedTensors {
    fn var(&self, layer: &str, index: usize) -> Result<Tensor> {
        self.sub_var(layer, None, index)
    }

    fn sub_var(&self, layer: &str, sub: Option<&str>, index: usize) -> Result<Tensor> {
        let name = match sub {
            Some(sub) => format!("layers/{layer}/{sub}/vars/{index}"),
            None => format!("layers/{layer}/vars/{index}"),
        };
        self.tensors
            .get(&name)
            .cloned()
            .ok_or_else(|| ReachError::model(format!("Saved weights missing '{}'", name)))
    }
}

fn candle_err(e: candle_core::Error) -> ReachError {
    ReachError::model(format!("Failed to convert saved weights: {}", e))
}

/// `[in, out]` kernel → `[out, in]` weight
fn dense_weight(kernel: Tensor) -> Result<Tensor> {
    kernel.t().and_then(|t| t.contiguous()).map_err(candle_err)
}

/// Re-key saved tensors to the graph's parameter names
fn convert(spec: &ArchitectureSpec, names: &LayerNames, saved: &SavedTensors) -> Result<HashMap<String, Tensor>> {
    let d = spec.embed_dim;
    let inner = spec.attention_dim();
    let mut out = HashMap::new();

    out.insert("embedding.weight".to_string(), saved.var(&names.embedding, 0)?);

    for proj in ["query", "key", "value"] {
        let sub = format!("{proj}_dense");
        // [d, heads, key_dim] → [heads * key_dim, d]
        let kernel = saved.sub_var(&names.attention, Some(&sub), 0)?;
        let kernel = kernel.reshape((d, inner)).map_err(candle_err)?;
        let bias = saved
            .sub_var(&names.attention, Some(&sub), 1)?
            .reshape(inner)
            .map_err(candle_err)?;
        out.insert(format!("attention.{proj}.weight"), dense_weight(kernel)?);
        out.insert(format!("attention.{proj}.bias"), bias);
    }

    // [heads, key_dim, d] → [d, heads * key_dim]
    let kernel = saved
        .sub_var(&names.attention, Some("output_dense"), 0)?
        .reshape((inner, d))
        .map_err(candle_err)?;
    out.insert("attention.output.weight".to_string(), dense_weight(kernel)?);
    out.insert(
        "attention.output.bias".to_string(),
        saved.sub_var(&names.attention, Some("output_dense"), 1)?,
    );

    for (index, stat) in ["weight", "bias", "running_mean", "running_var"].iter().enumerate() {
        out.insert(format!("norm.{stat}"), saved.var(&names.norm, index)?);
    }

    out.insert("dense.weight".to_string(), dense_weight(saved.var(&names.dense, 0)?)?);
    out.insert("dense.bias".to_string(), saved.var(&names.dense, 1)?);
    out.insert("head.weight".to_string(), dense_weight(saved.var(&names.head, 0)?)?);
    out.insert("head.bias".to_string(), saved.var(&names.head, 1)?);

    Ok(out)
}

/// Bundle directory for an artifact path
pub fn bundle_dir(path: &Path) -> PathBuf {
    if path.is_dir() {
        path.to_path_buf()
    } else {
        path.parent().map(Path::to_path_buf).unwrap_or_default()
    }
}

/// Load the whole network from a saved-model bundle
pub fn load(spec: ArchitectureSpec, path: &Path, device: &CandleDevice) -> Result<EngagementModel> {
    let dir = bundle_dir(path);
    let config_path = dir.join(CONFIG_FILE);
    let weights_path = dir.join(WEIGHTS_FILE);

    let content = std::fs::read_to_string(&config_path).map_err(|e| {
        ReachError::model(format!("Failed to read {}: {}", config_path.display(), e))
    })?;
    let saved: SavedModel = serde_json::from_str(&content)
        .map_err(|e| ReachError::model(format!("Invalid saved model config: {}", e)))?;
    if saved.class_name != "Functional" {
        return Err(mismatch("model class", &saved.class_name, "Functional"));
    }
    let names = resolve_layers(&spec, &saved)?;

    let tensors = candle_core::safetensors::load(&weights_path, device).map_err(|e| {
        ReachError::model(format!("Failed to read {}: {}", weights_path.display(), e))
    })?;
    let converted = convert(&spec, &names, &SavedTensors { tensors })?;

    let vb = VarBuilder::from_tensors(converted, DType::F32, device);
    let model = EngagementModel::build(spec, vb)?;
    model.materialize()?;

    info!(
        "Loaded saved model '{}' from bundle {}",
        saved.config.name.as_deref().unwrap_or("unnamed"),
        dir.display()
    );
    Ok(model)
}
