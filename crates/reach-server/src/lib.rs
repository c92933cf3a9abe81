//! # Reach Server
//!
//! Thin HTTP surface over [`reach_engine::Predictor`]:
//!
//! - `POST /api/predict` runs one prediction
//! - `GET /health` reports liveness and whether artifacts are loaded
//! - `GET /` describes the service

pub mod axum_server;
pub mod error;
pub mod types;

pub use axum_server::{build_router, AxumServer};
pub use error::ApiError;
pub use types::{ErrorBody, ErrorDetail, HealthResponse, PredictionResponse};
