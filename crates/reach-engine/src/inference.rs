//! Forward pass for one request

use candle_core::Tensor;
use reach_models::EngagementModel;
use reach_types::{EncodedFeatures, ReachError, Result, NUM_TARGETS};
use tracing::trace;

fn inference_err(e: candle_core::Error) -> ReachError {
    ReachError::inference(format!("Forward pass failed: {}", e))
}

/// Raw network output (normalized / log space) for one encoded request.
///
/// Reads the shared weights only; safe to call concurrently.
pub fn run(model: &EngagementModel, features: &EncodedFeatures) -> Result<[f64; NUM_TARGETS]> {
    let spec = model.spec();
    if features.token_sequence.len() != spec.sequence_length
        || features.numeric_vector.len() != spec.num_numeric_features
    {
        return Err(ReachError::inference(format!(
            "Encoded shapes ({}, {}) do not match network inputs ({}, {})",
            features.token_sequence.len(),
            features.numeric_vector.len(),
            spec.sequence_length,
            spec.num_numeric_features
        )));
    }

    let device = model.device();
    let tokens = Tensor::from_slice(&features.token_sequence, (1, spec.sequence_length), device)
        .map_err(inference_err)?;
    let numeric = Tensor::from_slice(
        &features.numeric_vector,
        (1, spec.num_numeric_features),
        device,
    )
    .map_err(inference_err)?;

    let output = model
        .forward(&tokens, &numeric)
        .and_then(|t| t.squeeze(0))
        .and_then(|t| t.to_vec1::<f32>())
        .map_err(inference_err)?;

    let raw: [f32; NUM_TARGETS] = output.as_slice().try_into().map_err(|_| {
        ReachError::inference(format!(
            "Network produced {} outputs, expected {}",
            output.len(),
            NUM_TARGETS
        ))
    })?;
    trace!("Raw output: {:?}", raw);
    Ok(raw.map(f64::from))
}
