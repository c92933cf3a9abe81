//! Wire types for the HTTP API

use reach_types::PredictionOutput;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Successful `POST /api/predict` response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub id: Uuid,
    pub predictions: PredictionOutput,
    pub created: i64,
}

impl PredictionResponse {
    pub fn new(predictions: PredictionOutput) -> Self {
        Self {
            id: Uuid::new_v4(),
            predictions,
            created: chrono::Utc::now().timestamp(),
        }
    }
}

/// `GET /health` response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub model_loaded: bool,
}

/// Error envelope returned for every failed request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub message: String,
    #[serde(rename = "type")]
    pub error_type: String,
    pub code: String,
}
