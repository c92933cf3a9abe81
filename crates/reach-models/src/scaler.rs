//! Fitted target scaler
//!
//! The targets were normalized before training; at inference time only the
//! inverse direction is needed to map network outputs back to target space.

use std::path::Path;

use reach_types::{ReachError, Result, NUM_TARGETS};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Reversible per-target linear transform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TargetScaler {
    /// `scaled = (x - mean) / scale`
    Standard { mean: Vec<f64>, scale: Vec<f64> },
    /// `scaled = x * scale + min`
    MinMax { min: Vec<f64>, scale: Vec<f64> },
}

impl TargetScaler {
    /// Parse and validate the serialized scaler
    pub fn from_json(content: &str) -> Result<Self> {
        let scaler: TargetScaler = serde_json::from_str(content)
            .map_err(|e| ReachError::scaler(format!("Invalid scaler document: {}", e)))?;
        scaler.validate()?;
        Ok(scaler)
    }

    /// Load the scaler artifact from disk
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ReachError::artifact(format!("Failed to read scaler {}: {}", path.display(), e))
        })?;
        let scaler = Self::from_json(&content)?;
        info!("Target scaler loaded ({})", scaler.kind());
        Ok(scaler)
    }

    pub fn kind(&self) -> &'static str {
        match self {
            TargetScaler::Standard { .. } => "standard",
            TargetScaler::MinMax { .. } => "min_max",
        }
    }

    fn validate(&self) -> Result<()> {
        let (offset, scale) = match self {
            TargetScaler::Standard { mean, scale } => (mean, scale),
            TargetScaler::MinMax { min, scale } => (min, scale),
        };
        if offset.len() != NUM_TARGETS || scale.len() != NUM_TARGETS {
            return Err(ReachError::scaler(format!(
                "Expected {} targets, got offset={} scale={}",
                NUM_TARGETS,
                offset.len(),
                scale.len()
            )));
        }
        if offset.iter().chain(scale).any(|v| !v.is_finite()) {
            return Err(ReachError::scaler("Scaler parameters must be finite"));
        }
        if let TargetScaler::MinMax { scale, .. } = self {
            if scale.iter().any(|&s| s == 0.0) {
                return Err(ReachError::scaler("Min-max scale cannot be zero"));
            }
        }
        Ok(())
    }

    /// Map a normalized output vector back to target space
    pub fn inverse_transform(&self, values: &[f64; NUM_TARGETS]) -> [f64; NUM_TARGETS] {
        let mut out = [0.0; NUM_TARGETS];
        for (i, v) in values.iter().enumerate() {
            out[i] = match self {
                TargetScaler::Standard { mean, scale } => v * scale[i] + mean[i],
                TargetScaler::MinMax { min, scale } => (v - min[i]) / scale[i],
            };
        }
        out
    }
}
