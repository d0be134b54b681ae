//! API error responses

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// Stable, non-leaking message for unexpected failures
pub const INTERNAL_ERROR_MESSAGE: &str =
    "Terjadi kesalahan internal server yang tidak terduga. Mohon coba lagi nanti.";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Question is required.")]
    QuestionRequired,

    #[error("GEMINI_API_KEY is missing in environment.")]
    MissingCredentials,

    #[error("{}", INTERNAL_ERROR_MESSAGE)]
    Internal { stack: Option<String> },
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stack: Option<String>,
}

impl ApiError {
    /// Log an unexpected failure; its debug chain is exposed only on request
    pub fn internal<E: std::fmt::Debug + std::fmt::Display>(err: E, expose_stack: bool) -> Self {
        error!("Unhandled error in chatbot handler: {}", err);
        ApiError::Internal {
            stack: expose_stack.then(|| format!("{:?}", err)),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::QuestionRequired => StatusCode::BAD_REQUEST,
            ApiError::MissingCredentials | ApiError::Internal { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let text = self.to_string();
        let body = match self {
            ApiError::QuestionRequired => ErrorBody {
                error: text,
                message: None,
                stack: None,
            },
            ApiError::MissingCredentials => ErrorBody {
                error: text.clone(),
                message: Some(text),
                stack: None,
            },
            ApiError::Internal { stack } => ErrorBody {
                error: text.clone(),
                message: Some(text),
                stack,
            },
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ApiError::QuestionRequired.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::MissingCredentials.status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_internal_stack_only_when_exposed() {
        let hidden = ApiError::internal(anyhow::anyhow!("boom"), false);
        assert!(matches!(hidden, ApiError::Internal { stack: None }));

        let shown = ApiError::internal(anyhow::anyhow!("boom"), true);
        match shown {
            ApiError::Internal { stack: Some(stack) } => assert!(stack.contains("boom")),
            other => panic!("unexpected {:?}", other),
        }
    }
}
