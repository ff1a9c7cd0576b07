//! Middleware Module
//!
//! This module contains the HTTP middleware for the server.
//!
//! # Architecture
//!
//! The middleware module currently provides:
//!
//! - **`auth`** - The authentication gate applied to every API route
//!
//! The gate never decides *authorization*: it only establishes who the
//! caller is (or that they are anonymous) and leaves access decisions to
//! route-level extractors and the policy module.

pub mod auth;

pub use auth::{auth_gate, AuthUser, AuthenticatedUser};
