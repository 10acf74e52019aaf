//! HTTP error handling and response types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::db::repository::RepositoryError;
use crate::scheduler::conflict::ConflictError;
use crate::scheduler::planner::PlanError;
use crate::services::error::ServiceError;

/// API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// Application error type for HTTP handlers.
#[derive(Debug)]
pub enum AppError {
    /// Resource not found
    NotFound(String),
    /// Invalid request (parse or validation error)
    BadRequest(String),
    /// Internal server error
    Internal(String),
    /// Service-layer error carrying the engine taxonomy
    Service(ServiceError),
}

fn service_error_response(err: ServiceError) -> (StatusCode, ApiError) {
    match err {
        ServiceError::NotFound { .. } => {
            (StatusCode::NOT_FOUND, ApiError::new("NOT_FOUND", err.to_string()))
        }
        ServiceError::Conflict(ref conflict) => {
            let code = match conflict {
                ConflictError::DuplicatePeriod(_) => "DUPLICATE_PERIOD",
                ConflictError::Overlap(_) => "OVERLAP",
            };
            (StatusCode::CONFLICT, ApiError::new(code, err.to_string()))
        }
        ServiceError::Plan(ref plan) => match plan {
            PlanError::NoCapacity => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ApiError::new("NO_CAPACITY", err.to_string()),
            ),
            PlanError::Collision { .. } => {
                (StatusCode::CONFLICT, ApiError::new("OVERLAP", err.to_string()))
            }
            PlanError::InvalidSettings(_) => (
                StatusCode::BAD_REQUEST,
                ApiError::new("BAD_REQUEST", err.to_string()),
            ),
        },
        ServiceError::Validation(_) => (
            StatusCode::BAD_REQUEST,
            ApiError::new("BAD_REQUEST", err.to_string()),
        ),
        ServiceError::InvalidTransition { .. } => (
            StatusCode::CONFLICT,
            ApiError::new("INVALID_TRANSITION", err.to_string()),
        ),
        ServiceError::Repository(repo_err) => repository_error_response(repo_err),
    }
}

fn repository_error_response(err: RepositoryError) -> (StatusCode, ApiError) {
    if err.is_not_found() {
        (StatusCode::NOT_FOUND, ApiError::new("NOT_FOUND", err.to_string()))
    } else if err.is_conflict() {
        // The store-level uniqueness backstop caught a racing save.
        (StatusCode::CONFLICT, ApiError::new("SLOT_TAKEN", err.to_string()))
    } else if matches!(err, RepositoryError::Validation { .. }) {
        (StatusCode::BAD_REQUEST, ApiError::new("BAD_REQUEST", err.to_string()))
    } else {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::new("REPOSITORY_ERROR", err.to_string()),
        )
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, ApiError::new("NOT_FOUND", msg)),
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, ApiError::new("BAD_REQUEST", msg))
            }
            AppError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::new("INTERNAL_ERROR", msg),
            ),
            AppError::Service(err) => service_error_response(err),
        };

        (status, Json(error)).into_response()
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        AppError::Service(err)
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        AppError::Service(ServiceError::Repository(err))
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}
