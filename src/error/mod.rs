//! API Error Module
//!
//! This module defines the error type returned by HTTP handlers and its
//! conversion into HTTP responses.
//!
//! # Architecture
//!
//! The error module is organized into focused submodules:
//!
//! - **`types`** - Error type definitions and constructors
//! - **`conversion`** - Error conversion implementations (IntoResponse, etc.)
//!
//! # Error Sources
//!
//! `ApiError` aggregates the subsystem error types so handlers can use `?`
//! on any of them:
//!
//! - `TokenError` - bearer token validation failures (401)
//! - `PolicyError` - authorization decisions (404 / 403)
//! - `EnrollmentError` - enrollment lifecycle failures (400, storage 500)
//! - `sqlx::Error` - database failures (500, details logged not returned)
//!
//! # HTTP Response Conversion
//!
//! `ApiError` implements `IntoResponse`, producing a JSON body of the form
//! `{"error": "message", "status": 400}` with the matching status code.

/// Error type definitions
pub mod types;

/// Error conversion implementations
pub mod conversion;

// Re-export commonly used types
pub use types::{is_unique_violation, ApiError};
