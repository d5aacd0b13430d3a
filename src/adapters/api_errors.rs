use crate::domain::error::SyncError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// Newtype over the domain error so the HTTP mapping lives in the adapter
/// layer. Internal detail is logged, never echoed to callers.
pub struct ApiError(pub SyncError);

impl From<SyncError> for ApiError {
    fn from(err: SyncError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match &self.0 {
            SyncError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg.clone()),
            SyncError::Validation(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "validation_error",
                msg.clone(),
            ),
            SyncError::Signature(_) => (
                StatusCode::UNAUTHORIZED,
                "signature_error",
                "invalid webhook signature".to_string(),
            ),
            SyncError::Provider(err) => {
                tracing::error!("provider error: {err}");
                (
                    StatusCode::BAD_GATEWAY,
                    "provider_error",
                    "payment provider unavailable".to_string(),
                )
            }
            SyncError::Database(err) => {
                tracing::error!("database error: {err}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "internal error".to_string(),
                )
            }
            SyncError::Serialization(err) => {
                tracing::error!("serialization error: {err}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "internal error".to_string(),
                )
            }
        };

        let body = serde_json::json!({
            "error_code": error_code,
            "message": message,
        });

        (status, Json(body)).into_response()
    }
}
