//! Axum-based HTTP server

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use reach_engine::Predictor;
use reach_types::{PredictionInput, ReachConfig, ReachError, Result, ServerConfig};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{debug, info, info_span, Instrument};

use crate::error::ApiError;
use crate::types::{HealthResponse, PredictionResponse};

/// Application state shared across handlers
#[derive(Clone)]
struct AppState {
    predictor: Arc<Predictor>,
}

/// Build the router with all routes
pub fn build_router(predictor: Arc<Predictor>, config: &ServerConfig) -> Router {
    let router = Router::new()
        .route("/api/predict", post(predict_handler))
        .route("/health", get(health_handler))
        .route("/", get(root_handler))
        .with_state(AppState { predictor });

    if config.enable_cors {
        router.layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
    } else {
        router.layer(TraceLayer::new_for_http())
    }
}

/// Axum-based server owning the shared predictor
pub struct AxumServer {
    predictor: Arc<Predictor>,
    config: ServerConfig,
}

impl AxumServer {
    pub fn new(predictor: Arc<Predictor>, config: ServerConfig) -> Self {
        Self { predictor, config }
    }

    /// Server with a predictor built from the artifact section of `config`
    pub fn from_config(config: &ReachConfig) -> Self {
        let predictor = Arc::new(Predictor::new(config.artifacts.clone()));
        Self::new(predictor, config.server.clone())
    }

    pub fn predictor(&self) -> &Arc<Predictor> {
        &self.predictor
    }

    pub fn router(&self) -> Router {
        build_router(Arc::clone(&self.predictor), &self.config)
    }

    /// Load artifacts ahead of the first request.
    ///
    /// A failure here is a deployment problem and aborts startup.
    pub async fn preload(&self) -> Result<()> {
        let predictor = Arc::clone(&self.predictor);
        tokio::task::spawn_blocking(move || predictor.load().map(|_| ()))
            .await
            .map_err(|e| ReachError::internal(format!("Preload task failed: {}", e)))?
    }

    /// Bind and serve until the process is stopped
    pub async fn start(&self) -> Result<()> {
        if self.config.preload {
            info!("Preloading model artifacts …");
            self.preload().await?;
        } else {
            info!("Preload disabled; artifacts load on first request");
        }

        let addr = format!("{}:{}", self.config.host, self.config.port);
        info!("Starting Axum server on {}", addr);

        let app = self.router();
        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| ReachError::internal(format!("Failed to bind to {}: {}", addr, e)))?;

        info!("Server listening on {}", addr);

        axum::serve(listener, app)
            .await
            .map_err(|e| ReachError::internal(format!("Server error: {}", e)))?;

        Ok(())
    }
}

async fn predict_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Json<PredictionInput>, JsonRejection>,
) -> std::result::Result<Response, ApiError> {
    let Json(input) = payload?;
    input.validate()?;

    debug!("Request: {:?}", input);
    let span = info_span!("predict", platform = %input.platform);

    let predictor = Arc::clone(&state.predictor);
    let predictions = tokio::task::spawn_blocking(move || predictor.predict(&input))
        .instrument(span)
        .await
        .map_err(|e| ReachError::internal(format!("Prediction task failed: {}", e)))??;

    let response = PredictionResponse::new(predictions);
    info!("Prediction {} served", response.id);
    Ok(Json(response).into_response())
}

async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        model_loaded: state.predictor.is_loaded(),
    })
}

async fn root_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "name": "Reach Prediction Server",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running",
        "endpoints": ["POST /api/predict", "GET /health"]
    }))
}
