use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::ai_gateway::{ExtractError, GatewayError};

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Not-found and not-owned are deliberately merged into `AccessDenied` so that
/// record existence is never discoverable through the response status.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Authentication error: {0}")]
    Unauthorized(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("CV not found or access denied")]
    AccessDenied,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Unauthorized(msg) => {
                (StatusCode::UNAUTHORIZED, format!("Authentication error: {msg}"))
            }
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::AccessDenied => (StatusCode::NOT_FOUND, self.to_string()),
            AppError::Database(e) => {
                tracing::error!("Database error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "A database error occurred".to_string(),
                )
            }
            // Rate-limit and payment statuses pass through verbatim; everything
            // else from the gateway collapses to a generic 500 so the upstream
            // body is never forwarded to the client.
            AppError::Gateway(GatewayError::RateLimited) => {
                (StatusCode::TOO_MANY_REQUESTS, self.to_string())
            }
            AppError::Gateway(GatewayError::PaymentRequired) => {
                (StatusCode::PAYMENT_REQUIRED, self.to_string())
            }
            AppError::Gateway(e) => {
                tracing::error!("AI gateway error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "AI gateway error".to_string(),
                )
            }
            AppError::Extract(e) => {
                tracing::error!(raw_len = e.raw().len(), "Failed to parse AI response: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to parse AI response".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({ "error": message }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_auth_error_maps_to_401() {
        assert_eq!(
            status_of(AppError::Unauthorized("bad token".into())),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn test_validation_error_maps_to_400() {
        assert_eq!(
            status_of(AppError::Validation("missing field".into())),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_access_denied_maps_to_404() {
        assert_eq!(status_of(AppError::AccessDenied), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_rate_limit_passes_through_as_429() {
        assert_eq!(
            status_of(AppError::Gateway(GatewayError::RateLimited)),
            StatusCode::TOO_MANY_REQUESTS
        );
    }

    #[test]
    fn test_payment_required_passes_through_as_402() {
        assert_eq!(
            status_of(AppError::Gateway(GatewayError::PaymentRequired)),
            StatusCode::PAYMENT_REQUIRED
        );
    }

    #[test]
    fn test_other_upstream_statuses_collapse_to_500() {
        assert_eq!(
            status_of(AppError::Gateway(GatewayError::Upstream { status: 503 })),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status_of(AppError::Gateway(GatewayError::EmptyContent)),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
