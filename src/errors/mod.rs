//! Error handling module for the PitCrew backend.
//!
//! Provides centralized error types with mapping to HTTP status codes and response envelopes.
//! Every kind here is an expected business outcome; callers branch on the code,
//! nothing is thrown across the API boundary.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::composition::CompositionError;

/// Error codes as constants to avoid stringly-typed errors.
#[allow(dead_code)]
pub mod codes {
    pub const UNAUTHORIZED: &str = "UNAUTHORIZED";
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
    pub const CAPACITY_EXCEEDED: &str = "CAPACITY_EXCEEDED";
    pub const ROLE_ALREADY_TAKEN: &str = "ROLE_ALREADY_TAKEN";
    pub const REPEATABLE_ROLE_FULL: &str = "REPEATABLE_ROLE_FULL";
    pub const CORE_INCOMPLETE: &str = "CORE_INCOMPLETE";
    pub const INVALID_ROLE: &str = "INVALID_ROLE";
    pub const ALREADY_ON_A_TEAM: &str = "ALREADY_ON_A_TEAM";
    pub const DUPLICATE_LEADERSHIP: &str = "DUPLICATE_LEADERSHIP";
    pub const DUPLICATE_PENDING: &str = "DUPLICATE_PENDING";
    pub const ALREADY_REJECTED: &str = "ALREADY_REJECTED";
    pub const ALREADY_APPROVED: &str = "ALREADY_APPROVED";
    pub const NOT_PENDING: &str = "NOT_PENDING";
    pub const INTERNAL_ERROR: &str = "INTERNAL_ERROR";
    pub const DATABASE_ERROR: &str = "DATABASE_ERROR";
    pub const BAD_REQUEST: &str = "BAD_REQUEST";
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    /// Authentication required
    Unauthorized(String),
    /// Resource not found
    NotFound(String),
    /// Input-shape validation error
    Validation(String),
    /// Composition rule rejected the admission
    Composition(CompositionError),
    /// The user already belongs to a team (global one-team-per-user rule)
    AlreadyOnATeam(String),
    /// The user already leads another team
    DuplicateLeadership(String),
    /// An outstanding pending request already exists for this (team, user) pair
    DuplicatePending(String),
    /// A rejected request already exists for this pair; no resubmission
    AlreadyRejected(String),
    /// An approved request already exists for this pair
    AlreadyApproved(String),
    /// The request has already been decided
    NotPending(String),
    /// Persistence-layer failure; always retriable by the caller
    Database(String),
    /// Internal server error
    Internal(String),
    /// Bad request
    BadRequest(String),
}

impl AppError {
    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Composition(CompositionError::InvalidRole(_)) => StatusCode::BAD_REQUEST,
            AppError::Composition(_) => StatusCode::CONFLICT,
            AppError::AlreadyOnATeam(_) => StatusCode::CONFLICT,
            AppError::DuplicateLeadership(_) => StatusCode::CONFLICT,
            AppError::DuplicatePending(_) => StatusCode::CONFLICT,
            AppError::AlreadyRejected(_) => StatusCode::CONFLICT,
            AppError::AlreadyApproved(_) => StatusCode::CONFLICT,
            AppError::NotPending(_) => StatusCode::CONFLICT,
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Unauthorized(_) => codes::UNAUTHORIZED,
            AppError::NotFound(_) => codes::NOT_FOUND,
            AppError::Validation(_) => codes::VALIDATION_ERROR,
            AppError::Composition(CompositionError::CapacityExceeded) => codes::CAPACITY_EXCEEDED,
            AppError::Composition(CompositionError::RoleAlreadyTaken(_)) => {
                codes::ROLE_ALREADY_TAKEN
            }
            AppError::Composition(CompositionError::RepeatableRoleFull) => {
                codes::REPEATABLE_ROLE_FULL
            }
            AppError::Composition(CompositionError::CoreIncomplete) => codes::CORE_INCOMPLETE,
            AppError::Composition(CompositionError::InvalidRole(_)) => codes::INVALID_ROLE,
            AppError::AlreadyOnATeam(_) => codes::ALREADY_ON_A_TEAM,
            AppError::DuplicateLeadership(_) => codes::DUPLICATE_LEADERSHIP,
            AppError::DuplicatePending(_) => codes::DUPLICATE_PENDING,
            AppError::AlreadyRejected(_) => codes::ALREADY_REJECTED,
            AppError::AlreadyApproved(_) => codes::ALREADY_APPROVED,
            AppError::NotPending(_) => codes::NOT_PENDING,
            AppError::Database(_) => codes::DATABASE_ERROR,
            AppError::Internal(_) => codes::INTERNAL_ERROR,
            AppError::BadRequest(_) => codes::BAD_REQUEST,
        }
    }

    /// Get the error message.
    pub fn message(&self) -> String {
        match self {
            AppError::Unauthorized(msg) => msg.clone(),
            AppError::NotFound(msg) => msg.clone(),
            AppError::Validation(msg) => msg.clone(),
            AppError::Composition(err) => err.to_string(),
            AppError::AlreadyOnATeam(msg) => msg.clone(),
            AppError::DuplicateLeadership(msg) => msg.clone(),
            AppError::DuplicatePending(msg) => msg.clone(),
            AppError::AlreadyRejected(msg) => msg.clone(),
            AppError::AlreadyApproved(msg) => msg.clone(),
            AppError::NotPending(msg) => msg.clone(),
            AppError::Database(msg) => msg.clone(),
            AppError::Internal(msg) => msg.clone(),
            AppError::BadRequest(msg) => msg.clone(),
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error_code(), self.message())
    }
}

impl std::error::Error for AppError {}

impl From<CompositionError> for AppError {
    fn from(err: CompositionError) -> Self {
        AppError::Composition(err)
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        tracing::error!("Database error: {:?}", err);
        AppError::Database(format!("Database error: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        tracing::error!("JSON error: {:?}", err);
        AppError::BadRequest(format!("JSON error: {}", err))
    }
}

/// Error details in the response envelope.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetails {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Error response envelope.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub success: bool,
    pub error: ErrorDetails,
    pub revision_id: i64,
}

impl ErrorResponse {
    pub fn new(error: &AppError, revision_id: i64) -> Self {
        let details = match error {
            AppError::Composition(err) => err
                .role_tag()
                .map(|tag| serde_json::json!({ "role": tag })),
            _ => None,
        };

        Self {
            success: false,
            error: ErrorDetails {
                code: error.error_code().to_string(),
                message: error.message(),
                details,
            },
            revision_id,
        }
    }
}

/// Wrapper type for errors that carry revision_id context.
pub struct AppErrorWithRevision {
    pub error: AppError,
    pub revision_id: i64,
}

impl IntoResponse for AppErrorWithRevision {
    fn into_response(self) -> Response {
        let status = self.error.status_code();
        let body = ErrorResponse::new(&self.error, self.revision_id);
        (status, Json(body)).into_response()
    }
}
