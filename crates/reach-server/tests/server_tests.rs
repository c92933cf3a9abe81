use std::path::Path;
use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use reach_engine::Predictor;
use reach_models::test_utils::{
    small_spec, write_flat_weights, write_standard_scaler, write_word_index_tokenizer,
    write_word_level_tokenizer,
};
use reach_server::{build_router, AxumServer, PredictionResponse};
use reach_types::{ArtifactConfig, ServerConfig};
use serde_json::{json, Value};
use tower::ServiceExt;

fn write_artifacts(dir: &Path) {
    let model_dir = dir.join("transformer");
    std::fs::create_dir_all(&model_dir).unwrap();
    write_flat_weights(&model_dir, &small_spec(), 5).unwrap();
    write_word_index_tokenizer(&dir.join("tokenizer.json"), &["summer", "sale"]).unwrap();
    write_standard_scaler(&dir.join("y_scaler.json"), [0.5; 5], [1.0; 5]).unwrap();
}

fn predictor(dir: &Path) -> Arc<Predictor> {
    Arc::new(Predictor::new(ArtifactConfig::in_dir(dir)).with_spec(small_spec()))
}

fn app(predictor: &Arc<Predictor>) -> Router {
    build_router(Arc::clone(predictor), &ServerConfig::default())
}

fn request_body() -> Value {
    json!({
        "caption": "Summer sale",
        "content": "Everything must go",
        "platform": "Instagram",
        "post_date": "2024-07-15",
        "post_time": "14:30",
        "followers": 1000,
        "ad_boost": 1
    })
}

fn post(body: String) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/predict")
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap()
}

async fn send(app: Router, req: Request<Body>) -> (StatusCode, Value) {
    let res = app.oneshot(req).await.unwrap();
    let status = res.status();
    let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn predict_returns_all_metrics() {
    let dir = tempfile::tempdir().unwrap();
    write_artifacts(dir.path());
    let p = predictor(dir.path());

    let (status, body) = send(app(&p), post(request_body().to_string())).await;
    assert_eq!(status, StatusCode::OK, "{body}");

    let response: PredictionResponse = serde_json::from_value(body.clone()).unwrap();
    for (target, value) in response.predictions.iter() {
        assert!(value >= 0.0, "{target} = {value}");
    }
    for key in ["likes", "comments", "shares", "clicks", "timing_quality_score"] {
        assert!(body["predictions"].get(key).is_some(), "missing {key}");
    }
}

#[tokio::test]
async fn health_reports_load_state() {
    let dir = tempfile::tempdir().unwrap();
    write_artifacts(dir.path());
    let p = predictor(dir.path());

    let (status, body) = send(app(&p), get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok", "model_loaded": false}));

    let (status, _) = send(app(&p), post(request_body().to_string())).await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(app(&p), get("/health")).await;
    assert_eq!(body["model_loaded"], json!(true));
}

#[tokio::test]
async fn negative_followers_is_rejected_before_inference() {
    let dir = tempfile::tempdir().unwrap();
    write_artifacts(dir.path());
    let p = predictor(dir.path());

    let mut req = request_body();
    req["followers"] = json!(-5);
    let (status, body) = send(app(&p), post(req.to_string())).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["code"], json!("INVALID_REQUEST"));
    assert_eq!(body["error"]["type"], json!("invalid_request_error"));
    assert!(!p.is_loaded());
}

#[tokio::test]
async fn ad_boost_must_be_binary() {
    let dir = tempfile::tempdir().unwrap();
    write_artifacts(dir.path());
    let p = predictor(dir.path());

    let mut req = request_body();
    req["ad_boost"] = json!(3);
    let (status, _) = send(app(&p), post(req.to_string())).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn malformed_json_is_a_client_error() {
    let dir = tempfile::tempdir().unwrap();
    let p = predictor(dir.path());

    let (status, body) = send(app(&p), post("{not json".to_string())).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["code"], json!("INVALID_REQUEST"));
}

#[tokio::test]
async fn missing_artifacts_are_service_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    let p = predictor(dir.path());

    let (status, body) = send(app(&p), post(request_body().to_string())).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"]["code"], json!("ARTIFACT_ERROR"));
}

#[tokio::test]
async fn root_describes_service() {
    let dir = tempfile::tempdir().unwrap();
    let p = predictor(dir.path());

    let (status, body) = send(app(&p), get("/")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], json!("running"));
}

#[tokio::test]
async fn preload_loads_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    write_artifacts(dir.path());
    let server = AxumServer::new(predictor(dir.path()), ServerConfig::default());

    server.preload().await.unwrap();
    assert!(server.predictor().is_loaded());
}

#[tokio::test]
async fn preload_failure_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let server = AxumServer::new(predictor(dir.path()), ServerConfig::default());

    let err = server.preload().await.unwrap_err();
    assert!(err.is_fatal());
}

#[tokio::test]
async fn tokenization_failure_is_a_server_error_not_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    write_artifacts(dir.path());
    write_word_level_tokenizer(&dir.path().join("tokenizer.json"), &["Summer", "sale"]).unwrap();
    let p = predictor(dir.path());

    let mut req = request_body();
    req["content"] = json!("");
    let (status, _) = send(app(&p), post(req.to_string())).await;
    assert_eq!(status, StatusCode::OK);

    req["content"] = json!("unheard");
    let (status, body) = send(app(&p), post(req.to_string())).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"]["code"], json!("INFERENCE_ERROR"));
    assert_eq!(body["error"]["type"], json!("server_error"));

    let (_, health) = send(app(&p), get("/health")).await;
    assert_eq!(health["model_loaded"], json!(true));
}
