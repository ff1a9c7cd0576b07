//! Route Configuration Module
//!
//! This module configures all HTTP routes for the backend server.
//! Routes are organized by functionality into focused submodules.
//!
//! # Architecture
//!
//! The routes module is organized into focused submodules:
//!
//! - **`router`** - Main router creation and middleware assembly
//! - **`api_routes`** - API endpoints (auth, users, courses, enrollments)
//!
//! # Module Structure
//!
//! ```text
//! routes/
//! ├── mod.rs          - Module exports and documentation
//! ├── router.rs       - Main router creation
//! └── api_routes.rs   - API endpoint registration
//! ```
//!
//! # Route Organization
//!
//! Routes are assembled in a specific order so middleware covers them:
//!
//! 1. **API Routes** - All `/api` endpoints
//! 2. **Authentication Gate** - Resolves bearer tokens to identities
//! 3. **CORS** - Allows the configured frontend origin
//! 4. **Fallback Handler** - 404 for unknown paths
//!
//! # Route Types
//!
//! ## Authentication
//!
//! - `POST /api/auth/login` - Password login
//! - `GET /api/auth/federated/callback` - Federated provider callback
//! - `GET /api/auth/me` - Get current user
//!
//! ## Users
//!
//! - `POST /api/users` - Register a user
//! - `GET /api/users` - List users
//! - `GET /api/users/{id}` - Get a user
//! - `PUT /api/users/{id}` - Update a user (owner only)
//!
//! ## Courses
//!
//! - `POST /api/courses` - Create a course (requires authentication)
//! - `GET /api/courses` - List courses
//! - `GET /api/courses/{id}` - Get a course
//!
//! ## Enrollments
//!
//! - `POST /api/enrollments/{course_id}` - Enroll in a course
//! - `GET /api/enrollments/user` - List own enrollments
//! - `POST /api/enrollments/{course_id}/lessons/{lesson_id}/toggle` - Toggle lesson completion
//! - `GET /api/enrollments/{course_id}/status` - Enrollment status
//! - `DELETE /api/enrollments/{course_id}` - Unenroll from a course

/// Main router creation
pub mod router;

/// API endpoint registration
pub mod api_routes;

// Re-export commonly used functions
pub use router::create_router;
