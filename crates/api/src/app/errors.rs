use axum::extract::rejection::QueryRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;
use thiserror::Error;

use ecovision_core::DomainError;
use ecovision_infra::StoreError;

/// Failure of a request handler.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Store(#[from] StoreError),

    /// Query string that does not deserialize (e.g. a repeated key).
    #[error(transparent)]
    Query(#[from] QueryRejection),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        match self {
            ApiError::Domain(DomainError::UnknownQuality(level)) => json_error(
                StatusCode::BAD_REQUEST,
                "invalid_quality_threshold",
                format!(
                    "quality_threshold must be one of: poor, questionable, good, excellent (got {level:?})"
                ),
            ),
            ApiError::Domain(DomainError::Validation(msg)) => {
                json_error(StatusCode::BAD_REQUEST, "validation_error", msg)
            }
            ApiError::Query(rejection) => json_error(
                StatusCode::BAD_REQUEST,
                "validation_error",
                rejection.body_text(),
            ),
            ApiError::Store(e) => {
                tracing::error!(error = %e, "store failure");
                json_error(StatusCode::INTERNAL_SERVER_ERROR, "store_error", e.to_string())
            }
        }
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
