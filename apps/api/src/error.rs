//! # API Error Type
//!
//! Unified error type for HTTP handlers.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                  Error Flow in Teddy Mobile                             │
//! │                                                                         │
//! │  Frontend                     Rust Backend                              │
//! │  ────────                     ────────────                              │
//! │                                                                         │
//! │  POST /api/reports                                                      │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Handler: Result<Json<T>, ApiError>                              │  │
//! │  │                                                                  │  │
//! │  │  ValidationError ──► 400 VALIDATION_ERROR (operation refused)   │  │
//! │  │  DbError::NotFound ► 404 NOT_FOUND (typed business outcome)     │  │
//! │  │  TransitionFailure ► 500 TRANSITION_FAILED (saga context,       │  │
//! │  │                          message surfaced verbatim)             │  │
//! │  │  other DbError ────► 500 DATABASE_ERROR                         │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  { "code": "NOT_FOUND", "message": "Stock item not found: TDY-0042" }  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing here retries; every failure leaves the UI usable and retry is a
//! manual user re-action.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use teddy_core::error::{CoreError, ValidationError};
use teddy_db::DbError;
use teddy_ledger::{LedgerError, TransitionFailure};

/// API error returned from handlers.
///
/// ## Serialization
/// ```json
/// { "code": "NOT_FOUND", "message": "Stock item not found: TDY-0042" }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Resource not found (404)
    NotFound,

    /// Input validation failed (400)
    ValidationError,

    /// Missing or invalid credentials (401)
    Unauthorized,

    /// Authenticated but not allowed - role gate (403)
    Forbidden,

    /// Business rule refused the operation (422)
    BusinessLogic,

    /// A multi-step ledger transition failed partway (500); the message
    /// carries the failed step and compensation outcome verbatim
    TransitionFailed,

    /// Database operation failed (500)
    DatabaseError,

    /// Internal server error (500)
    Internal,
}

impl ErrorCode {
    fn status(self) -> StatusCode {
        match self {
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::ValidationError => StatusCode::BAD_REQUEST,
            ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorCode::Forbidden => StatusCode::FORBIDDEN,
            ErrorCode::BusinessLogic => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorCode::TransitionFailed | ErrorCode::DatabaseError | ErrorCode::Internal => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates an unauthorized error.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Unauthorized, message)
    }

    /// Creates a forbidden error.
    pub fn forbidden(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Forbidden, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.code.status(), Json(self)).into_response()
    }
}

/// Converts database errors to API errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => ApiError::not_found(&entity, &id),
            DbError::UniqueViolation { field, value } => ApiError::new(
                ErrorCode::ValidationError,
                format!("{} '{}' already exists", field, value),
            ),
            DbError::ConnectionFailed(_) => {
                ApiError::new(ErrorCode::DatabaseError, "Database connection failed")
            }
            DbError::MigrationFailed(_) => {
                ApiError::new(ErrorCode::DatabaseError, "Database migration failed")
            }
            DbError::QueryFailed(e) => {
                // Log the actual error but return a generic message
                tracing::error!("Database query failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
            DbError::DecodeFailed(e) => {
                tracing::error!("Stored row decode failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Stored record is corrupt")
            }
            DbError::PoolExhausted => {
                ApiError::new(ErrorCode::DatabaseError, "Database pool exhausted")
            }
            DbError::Internal(e) => {
                tracing::error!("Internal database error: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
        }
    }
}

/// Converts validation errors (refused operations) to API errors.
impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

/// Converts core domain errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(e) => ApiError::validation(e.to_string()),
            other => ApiError::new(ErrorCode::BusinessLogic, other.to_string()),
        }
    }
}

/// Converts saga failures to API errors.
///
/// The message keeps the full saga context (failed step + compensation
/// outcome) - this is the one error the user may need to read carefully,
/// because a `compensation failed` means manual cleanup.
impl From<TransitionFailure> for ApiError {
    fn from(err: TransitionFailure) -> Self {
        tracing::error!(inconsistent = err.left_inconsistent(), "{}", err);
        ApiError::new(ErrorCode::TransitionFailed, err.to_string())
    }
}

/// Converts ledger errors to API errors.
impl From<LedgerError> for ApiError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::Validation(e) => e.into(),
            LedgerError::Core(e) => e.into(),
            LedgerError::Transition(e) => e.into(),
            LedgerError::Db(e) => e.into(),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_maps_to_404() {
        let err: ApiError = DbError::not_found("Stock item", "TDY-0042").into();
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.code.status(), StatusCode::NOT_FOUND);
        assert!(err.message.contains("TDY-0042"));
    }

    #[test]
    fn test_validation_maps_to_400() {
        let err: ApiError = ValidationError::Required { field: "model" }.into();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(err.code.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_transition_failure_keeps_saga_context() {
        use teddy_ledger::{CompensationOutcome, TransitionStep};

        let failure = TransitionFailure {
            transition: "sell",
            step: TransitionStep::DeleteSource,
            source: DbError::QueryFailed("disk I/O error".into()),
            compensation: CompensationOutcome::Failed(DbError::QueryFailed("still broken".into())),
        };
        let err: ApiError = failure.into();
        assert_eq!(err.code, ErrorCode::TransitionFailed);
        assert!(err.message.contains("delete source"));
        assert!(err.message.contains("compensation failed"));
    }
}
