//! LearnHub - Learning Platform Backend
//!
//! LearnHub is a learning-platform backend built with Rust, exposing a
//! JSON API for user accounts, a course catalog, and enrollment progress
//! tracking, with stateless token authentication and federated login.
//!
//! # Overview
//!
//! This library provides the core functionality for LearnHub, including:
//! - Stateless bearer-token authentication with HMAC-signed tokens
//! - Federated identity linking against an external provider
//! - A course catalog with modules and lessons embedded per course
//! - Enrollment tracking with per-lesson completion and derived progress
//! - SQLite persistence via sqlx with embedded migrations
//!
//! # Module Structure
//!
//! The library is organized into focused modules:
//!
//! - **`auth`** - Token service, login handlers, federated identity linking
//! - **`middleware`** - The authentication gate and identity extractors
//! - **`policy`** - Resource ownership checks
//! - **`users`** - User rows and profile handlers
//! - **`courses`** - Course rows and catalog handlers
//! - **`enrollment`** - Enrollment engine, storage port, and handlers
//! - **`routes`** - Route registration and middleware assembly
//! - **`server`** - Configuration, state, and app initialization
//! - **`error`** - The unified handler error type
//!
//! # Usage
//!
//! ```rust,no_run
//! use learnhub::server::{create_app, ServerConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ServerConfig::from_env()?;
//! let app = create_app(config).await?;
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! Handlers stay thin: they extract an identity, call into the database
//! modules or the enrollment engine, and map domain errors onto HTTP
//! statuses through `error::ApiError`. All mutation of enrollment state
//! goes through the engine, which serializes writes per user/course key.

/// Token service, login handlers, federated identity linking
pub mod auth;

/// Course rows and catalog handlers
pub mod courses;

/// Enrollment engine, storage port, and handlers
pub mod enrollment;

/// Unified handler error type
pub mod error;

/// Authentication gate and identity extractors
pub mod middleware;

/// Resource ownership checks
pub mod policy;

/// Route registration and middleware assembly
pub mod routes;

/// Configuration, state, and app initialization
pub mod server;

/// User rows and profile handlers
pub mod users;
