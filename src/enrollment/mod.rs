//! Enrollment Module
//!
//! This module owns the enrollment lifecycle: the per-(user, course) state
//! machine, lesson completion tracking and the progress computation.
//!
//! # Architecture
//!
//! The enrollment module is organized into focused submodules:
//!
//! - **`store`** - Storage port: exactly the queries the engine needs
//! - **`engine`** - The enrollment state machine and progress rules
//! - **`handlers`** - HTTP handlers for enrollment endpoints
//!
//! # Module Structure
//!
//! ```text
//! enrollment/
//! ├── mod.rs          - Module exports and documentation
//! ├── store.rs        - Enrollment model and database operations
//! ├── engine.rs       - Enroll / toggle / unenroll semantics
//! └── handlers.rs     - HTTP handlers
//! ```
//!
//! # Consistency Rules
//!
//! One enrollment row exists per (user_email, course_id) key, enforced by
//! a unique index rather than application pre-checks. Mutating operations
//! are serialized per key by an in-process lock registry, so concurrent
//! lesson toggles cannot lose updates to the completed-lesson set.

/// Enrollment model and database operations
pub mod store;

/// Enrollment state machine
pub mod engine;

/// HTTP handlers for enrollment endpoints
pub mod handlers;

// Re-export commonly used types
pub use engine::{EnrollmentEngine, EnrollmentError};
pub use store::Enrollment;
