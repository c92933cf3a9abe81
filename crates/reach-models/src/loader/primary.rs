//! Flat safetensors restoration into a built graph

use std::path::{Path, PathBuf};

use candle_core::{DType, Device as CandleDevice};
use candle_nn::{VarBuilder, VarMap};
use reach_types::{ReachError, Result};
use tracing::debug;

use crate::architecture::{ArchitectureSpec, EngagementModel};

/// File name of the flat weights inside an artifact directory
pub const WEIGHTS_FILE: &str = "model.safetensors";

/// The flat weights file for an artifact path
pub fn weights_file(path: &Path) -> PathBuf {
    if path.is_dir() {
        path.join(WEIGHTS_FILE)
    } else {
        path.to_path_buf()
    }
}

/// Build, materialize, then overwrite every parameter by name.
///
/// Fails if any parameter is missing from the file or has the wrong shape.
pub fn load(spec: ArchitectureSpec, path: &Path, device: &CandleDevice) -> Result<EngagementModel> {
    let file = weights_file(path);
    if !file.is_file() {
        return Err(ReachError::model(format!(
            "No flat weights file at {}",
            file.display()
        )));
    }

    let mut varmap = VarMap::new();
    let vb = VarBuilder::from_varmap(&varmap, DType::F32, device);
    let model = EngagementModel::build(spec, vb)?;
    model.materialize()?;

    debug!("Restoring {} parameters from {:?}", spec.parameter_shapes().len(), file);
    varmap
        .load(&file)
        .map_err(|e| ReachError::model(format!("Failed to restore weights: {}", e)))?;

    Ok(model)
}
