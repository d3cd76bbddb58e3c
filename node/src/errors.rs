// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use scorekeeper_kernel::catalog::CatalogQueryError;
use scorekeeper_kernel::error::{SubmissionError, ValidationError};
use serde_json::json;
use thiserror::Error;

use crate::config::ConfigError;

/// Request-level failure. The display text is the `error` field of the response body.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{message}")]
    Internal {
        message: String,
        details: Option<String>,
    },
    #[error("Request timed out")]
    Timeout,
}

impl ApiError {
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::Internal {
            message: message.into(),
            details: None,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Timeout => StatusCode::GATEWAY_TIMEOUT,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            ApiError::Internal {
                message,
                details: Some(details),
            } => json!({ "error": message, "details": details }),
            other => json!({ "error": other.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        ApiError::BadRequest(e.to_string())
    }
}

impl From<CatalogQueryError> for ApiError {
    fn from(e: CatalogQueryError) -> Self {
        ApiError::BadRequest(e.to_string())
    }
}

impl From<SubmissionError> for ApiError {
    fn from(e: SubmissionError) -> Self {
        match e {
            SubmissionError::Invalid(v) => v.into(),
            SubmissionError::Ledger(source) => ApiError::Internal {
                message: "Failed to save score".to_string(),
                details: Some(source.to_string()),
            },
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(e: JsonRejection) -> Self {
        ApiError::BadRequest(e.body_text())
    }
}

/// Startup failure of the node binary.
#[derive(Error, Debug)]
pub enum NodeError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("storage error: {0}")]
    Storage(#[from] scorekeeper_persistence::PersistenceError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("telemetry error: {0}")]
    Telemetry(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use scorekeeper_kernel::StoreError;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError::BadRequest("x".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::NotFound("x".into()).status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::internal("x").status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(ApiError::Timeout.status(), StatusCode::GATEWAY_TIMEOUT);
    }

    #[test]
    fn test_submission_errors() {
        let invalid: ApiError = SubmissionError::Invalid(ValidationError::ScoreOutOfRange(-1)).into();
        assert_eq!(invalid.to_string(), "Invalid score range");
        assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);

        let ledger: ApiError = SubmissionError::Ledger(StoreError::Backend("disk full".into())).into();
        match ledger {
            ApiError::Internal { message, details } => {
                assert_eq!(message, "Failed to save score");
                assert_eq!(details.as_deref(), Some("backend error: disk full"));
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
