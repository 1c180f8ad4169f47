//! HTTP error handling and response types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use super::dto::ConflictDetailDto;
use crate::db::repository::RepositoryError;
use crate::services::{ConflictDetail, ConflictError, ScheduleWriteError, Suggestion};

/// API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional structured details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

/// Application error type for HTTP handlers.
#[derive(Debug)]
pub enum AppError {
    /// Invalid request field
    BadRequest {
        field: &'static str,
        message: String,
    },
    /// The assignment collides with existing schedules
    Conflict {
        conflicts: Vec<ConflictDetail>,
        suggestions: Vec<Suggestion>,
    },
    /// Repository error
    Repository(RepositoryError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            AppError::BadRequest { field, message } => (
                StatusCode::BAD_REQUEST,
                ApiError::new("BAD_REQUEST", message)
                    .with_details(serde_json::json!({ "field": field })),
            ),
            AppError::Conflict {
                conflicts,
                suggestions,
            } => {
                let message = format!(
                    "Assignment conflicts with {} existing schedule(s)",
                    conflicts.len()
                );
                let conflicts: Vec<ConflictDetailDto> =
                    conflicts.into_iter().map(Into::into).collect();
                let details = serde_json::json!({
                    "conflicts": conflicts,
                    "suggestions": suggestions,
                });
                (
                    StatusCode::CONFLICT,
                    ApiError::new("SCHEDULE_CONFLICT", message).with_details(details),
                )
            }
            AppError::Repository(e) => {
                let msg = e.to_string();
                if e.is_not_found() {
                    (StatusCode::NOT_FOUND, ApiError::new("NOT_FOUND", msg))
                } else if e.is_retryable() {
                    (
                        StatusCode::SERVICE_UNAVAILABLE,
                        ApiError::new("STORE_UNAVAILABLE", msg),
                    )
                } else {
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        ApiError::new("REPOSITORY_ERROR", msg),
                    )
                }
            }
        };

        (status, Json(error)).into_response()
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        AppError::Repository(err)
    }
}

impl From<ConflictError> for AppError {
    fn from(err: ConflictError) -> Self {
        match err {
            ConflictError::InvalidInput { field, message } => AppError::BadRequest {
                field,
                message: format!("invalid {}: {}", field, message),
            },
            ConflictError::StoreUnavailable(e) => AppError::Repository(e),
        }
    }
}

impl From<ScheduleWriteError> for AppError {
    fn from(err: ScheduleWriteError) -> Self {
        match err {
            ScheduleWriteError::Conflict {
                conflicts,
                suggestions,
            } => AppError::Conflict {
                conflicts,
                suggestions,
            },
            ScheduleWriteError::Check(e) => e.into(),
            ScheduleWriteError::Store(e) => e.into(),
        }
    }
}
