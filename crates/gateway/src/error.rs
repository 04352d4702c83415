//! Gateway error types and handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Gateway error type
///
/// Routing itself never surfaces an error to the client (every failure path
/// resolves to a redirect); these are the errors of the handlers behind the
/// router.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("Missing tenant context")]
    MissingTenantContext,
    #[error("Invalid request: {0}")]
    BadRequest(String),
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            GatewayError::MissingTenantContext => (
                StatusCode::BAD_REQUEST,
                "MISSING_TENANT_CONTEXT",
                self.to_string(),
            ),
            GatewayError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

/// Result type alias for gateway handlers
pub type GatewayResult<T> = Result<T, GatewayError>;
