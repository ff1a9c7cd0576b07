/**
 * API Error Types
 *
 * This module defines the error type returned by HTTP handlers.
 * Handler errors are converted to HTTP responses in `conversion.rs`.
 *
 * # Error Sources
 *
 * `ApiError` wraps the subsystem errors so handlers can use `?` on all of them:
 *
 * - `TokenError` - bearer token validation failures
 * - `PolicyError` - authorization decisions
 * - `EnrollmentError` - enrollment lifecycle failures
 * - `sqlx::Error` - database failures
 *
 * # Error Disclosure
 *
 * Domain errors (bad input, conflicts, missing resources) return their
 * message to the client. Storage errors never do: the client receives a
 * generic message and the underlying error is logged server-side.
 */

use axum::http::StatusCode;
use thiserror::Error;

use crate::auth::tokens::TokenError;
use crate::enrollment::engine::EnrollmentError;
use crate::policy::PolicyError;

/// Generic message returned for any 500-class failure.
const INTERNAL_MESSAGE: &str = "An internal error occurred";

/// Unified handler error type
///
/// This enum represents all possible errors that can be returned from an
/// HTTP handler. Each variant maps to an HTTP status code and a client-safe
/// message via `status_code()` and `message()`.
///
/// # Usage
///
/// ```rust
/// use learnhub::error::ApiError;
///
/// let err = ApiError::bad_request("Course name is required");
/// assert_eq!(err.status_code().as_u16(), 400);
/// ```
#[derive(Debug, Error)]
pub enum ApiError {
    /// Token validation failure (401)
    ///
    /// The request carried a bearer token that did not validate. The
    /// message states which check failed (malformed, bad signature,
    /// expired) so clients can distinguish "log in again" from "bug".
    #[error(transparent)]
    Token(#[from] TokenError),

    /// Authorization failure (404 or 403)
    ///
    /// Owner-only access checks report a missing resource before a
    /// foreign-owned one, so the two cases keep distinct status codes.
    #[error(transparent)]
    Policy(#[from] PolicyError),

    /// Enrollment lifecycle failure (400, storage failures 500)
    ///
    /// Domain failures (already enrolled, unknown course, ...) are client
    /// errors and return their message. Storage failures inside the engine
    /// are reported as internal errors.
    #[error(transparent)]
    Enrollment(#[from] EnrollmentError),

    /// Invalid request input (400)
    #[error("Bad request: {message}")]
    BadRequest {
        /// Human-readable error message
        message: String,
    },

    /// Authentication required or rejected (401)
    #[error("Unauthorized: {message}")]
    Unauthorized {
        /// Human-readable error message
        message: String,
    },

    /// Resource does not exist (404)
    #[error("Not found: {message}")]
    NotFound {
        /// Human-readable error message
        message: String,
    },

    /// Uniqueness conflict (409)
    ///
    /// Returned when an insert collides with a unique index, e.g.
    /// registering an email that is already taken.
    #[error("Conflict: {message}")]
    Conflict {
        /// Human-readable error message
        message: String,
    },

    /// Dependent service not configured or unreachable (503)
    #[error("Service unavailable: {message}")]
    ServiceUnavailable {
        /// Human-readable error message
        message: String,
    },

    /// Database error (500)
    ///
    /// The client receives a generic message; the query error is logged.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal server error (500)
    #[error("Internal error: {message}")]
    Internal {
        /// Human-readable error message
        message: String,
    },
}

impl ApiError {
    /// Create a new bad request error
    ///
    /// # Arguments
    ///
    /// * `message` - Error message returned to the client
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    /// Create a new unauthorized error
    ///
    /// # Arguments
    ///
    /// * `message` - Error message returned to the client
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    /// Create a new not found error
    ///
    /// # Arguments
    ///
    /// * `message` - Error message returned to the client
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Create a new conflict error
    ///
    /// # Arguments
    ///
    /// * `message` - Error message returned to the client
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    /// Create a new service unavailable error
    ///
    /// # Arguments
    ///
    /// * `message` - Error message returned to the client
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::ServiceUnavailable {
            message: message.into(),
        }
    }

    /// Create a new internal error
    ///
    /// # Arguments
    ///
    /// * `message` - Error message returned to the client
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Get the HTTP status code for this error
    ///
    /// # Status Code Mapping
    ///
    /// - `Token` - 401 Unauthorized
    /// - `Policy` - 404 Not Found / 403 Forbidden
    /// - `Enrollment` - 400 Bad Request (storage failures 500)
    /// - `BadRequest` - 400 Bad Request
    /// - `Unauthorized` - 401 Unauthorized
    /// - `NotFound` - 404 Not Found
    /// - `Conflict` - 409 Conflict
    /// - `ServiceUnavailable` - 503 Service Unavailable
    /// - `Database` / `Internal` - 500 Internal Server Error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Token(_) => StatusCode::UNAUTHORIZED,
            Self::Policy(PolicyError::NotFound) => StatusCode::NOT_FOUND,
            Self::Policy(PolicyError::Forbidden) => StatusCode::FORBIDDEN,
            Self::Enrollment(EnrollmentError::Storage(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Enrollment(_) => StatusCode::BAD_REQUEST,
            Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Conflict { .. } => StatusCode::CONFLICT,
            Self::ServiceUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the client-facing error message
    ///
    /// # Returns
    ///
    /// A human-readable error message safe to send to the client. Storage
    /// errors return a generic message; their details stay in the logs.
    pub fn message(&self) -> String {
        match self {
            Self::Token(err) => err.to_string(),
            Self::Policy(err) => err.to_string(),
            Self::Enrollment(EnrollmentError::Storage(_)) => INTERNAL_MESSAGE.to_string(),
            Self::Enrollment(err) => err.to_string(),
            Self::BadRequest { message } => message.clone(),
            Self::Unauthorized { message } => message.clone(),
            Self::NotFound { message } => message.clone(),
            Self::Conflict { message } => message.clone(),
            Self::ServiceUnavailable { message } => message.clone(),
            Self::Database(_) => INTERNAL_MESSAGE.to_string(),
            Self::Internal { message } => message.clone(),
        }
    }
}

/// Check whether a database error is a unique constraint violation
///
/// Used by insert paths that treat a duplicate key as a domain signal
/// (duplicate registration, duplicate enrollment, concurrent federated
/// first-login) rather than as a storage failure.
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .map(|db_err| db_err.is_unique_violation())
        .unwrap_or(false)
}
