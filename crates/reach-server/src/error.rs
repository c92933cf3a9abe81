//! Mapping from [`ReachError`] to HTTP responses

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use reach_types::ReachError;
use tracing::{error, warn};

use crate::types::{ErrorBody, ErrorDetail};

/// Error returned by handlers
#[derive(Debug)]
pub struct ApiError(pub ReachError);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        if self.0.is_client_error() {
            StatusCode::UNPROCESSABLE_ENTITY
        } else if self.0.is_fatal() {
            StatusCode::SERVICE_UNAVAILABLE
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }

    fn error_type(&self) -> &'static str {
        if self.0.is_client_error() {
            "invalid_request_error"
        } else if self.0.is_fatal() {
            "service_unavailable"
        } else {
            "server_error"
        }
    }
}

impl From<ReachError> for ApiError {
    fn from(err: ReachError) -> Self {
        Self(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(ReachError::request_validation(rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Request failed ({}): {}", status, self.0);
        } else {
            warn!("Rejected request: {}", self.0);
        }

        let body = ErrorBody {
            error: ErrorDetail {
                message: self.0.to_string(),
                error_type: self.error_type().to_string(),
                code: self.0.code().to_string(),
            },
        };
        (status, Json(body)).into_response()
    }
}
