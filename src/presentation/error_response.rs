// Mapping of dashboard errors to HTTP responses
use crate::application::error::{AuthError, DashboardError};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

impl IntoResponse for DashboardError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            DashboardError::Auth(AuthError::Provider(_)) => {
                (StatusCode::BAD_GATEWAY, "AUTH_PROVIDER_ERROR")
            }
            DashboardError::Auth(_) => (StatusCode::UNAUTHORIZED, "AUTH_REQUIRED"),
            DashboardError::Fetch(_) => (StatusCode::BAD_GATEWAY, "FETCH_FAILED"),
        };

        tracing::warn!(error_code = code, error_message = %self, "Request failed");

        let body = ErrorResponse {
            error: ErrorBody {
                code,
                message: self.to_string(),
            },
        };

        (status, Json(body)).into_response()
    }
}
