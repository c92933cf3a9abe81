//! Weight restoration
//!
//! Two strategies are tried in order. [`LoadStrategy::Primary`] builds the
//! graph, materializes it with a dummy pass and restores a flat safetensors
//! file by parameter name. [`LoadStrategy::Compat`] reads a saved-model
//! bundle (layer configs plus weights in saved-model layout), tolerating
//! config fields this runtime does not understand. Falling back is a
//! warning; exhausting both is fatal.

pub mod compat;
pub mod primary;

use std::fmt;
use std::path::Path;

use candle_core::Device as CandleDevice;
use reach_types::{ReachError, Result};
use tracing::{info, warn};

use crate::architecture::{ArchitectureSpec, EngagementModel};

/// How weights were (or will be) restored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStrategy {
    Primary,
    Compat,
}

impl LoadStrategy {
    /// Strategies in the order they are attempted
    pub const SEQUENCE: [LoadStrategy; 2] = [LoadStrategy::Primary, LoadStrategy::Compat];

    pub fn attempt(
        self,
        spec: ArchitectureSpec,
        path: &Path,
        device: &CandleDevice,
    ) -> Result<EngagementModel> {
        match self {
            LoadStrategy::Primary => primary::load(spec, path, device),
            LoadStrategy::Compat => compat::load(spec, path, device),
        }
    }
}

impl fmt::Display for LoadStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadStrategy::Primary => f.write_str("primary"),
            LoadStrategy::Compat => f.write_str("compat"),
        }
    }
}

/// A restored network and the strategy that produced it
#[derive(Debug, Clone)]
pub struct LoadedModel {
    pub model: EngagementModel,
    pub strategy: LoadStrategy,
}

/// Restore trained weights into the fixed architecture
pub fn load_model(spec: ArchitectureSpec, path: &Path, device: &CandleDevice) -> Result<LoadedModel> {
    if !path.exists() {
        return Err(ReachError::artifact(format!(
            "Model artifact not found: {}",
            path.display()
        )));
    }

    let mut failures = Vec::new();
    for strategy in LoadStrategy::SEQUENCE {
        match strategy.attempt(spec, path, device) {
            Ok(model) => {
                info!("Weights restored from {} via {} load", path.display(), strategy);
                return Ok(LoadedModel { model, strategy });
            }
            Err(e) => {
                if strategy == LoadStrategy::Primary {
                    warn!(
                        "Primary weight restoration failed ({}); attempting saved-model bundle load",
                        e
                    );
                }
                failures.push(format!("{}: {}", strategy, e));
            }
        }
    }

    Err(ReachError::model(format!(
        "Weight restoration failed for {} ({})",
        path.display(),
        failures.join("; ")
    )))
}
