use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::analysis::AnalysisError;
use crate::llm_client::LlmError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Suggestion service error: {0}")]
    SuggestionService(#[from] LlmError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<AnalysisError> for AppError {
    fn from(e: AnalysisError) -> Self {
        match e {
            AnalysisError::Input(msg) => AppError::Validation(msg),
            AnalysisError::SuggestionService(e) => AppError::SuggestionService(e),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::SuggestionService(LlmError::Timeout(_)) => {
                tracing::error!("Suggestion service error: {self}");
                (
                    StatusCode::GATEWAY_TIMEOUT,
                    "SUGGESTION_SERVICE_TIMEOUT",
                    "The suggestion service did not respond in time".to_string(),
                )
            }
            AppError::SuggestionService(e) => {
                tracing::error!("Suggestion service error: {e}");
                (
                    StatusCode::BAD_GATEWAY,
                    "SUGGESTION_SERVICE_ERROR",
                    "The suggestion service failed".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn test_input_error_maps_to_bad_request() {
        let err: AppError = AnalysisError::Input("resume text cannot be empty".to_string()).into();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_service_errors_map_to_gateway_statuses() {
        let timeout: AppError =
            AnalysisError::SuggestionService(LlmError::Timeout(Duration::from_secs(30))).into();
        assert_eq!(timeout.into_response().status(), StatusCode::GATEWAY_TIMEOUT);

        let auth: AppError = LlmError::Auth("bad key".to_string()).into();
        assert_eq!(auth.into_response().status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_internal_error_hides_details() {
        let err = AppError::Internal(anyhow::anyhow!("secret detail"));
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
