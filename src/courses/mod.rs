//! Courses Module
//!
//! This module owns the course catalog: course metadata plus the embedded
//! module/lesson tree that enrollment progress is computed against.
//!
//! # Module Structure
//!
//! ```text
//! courses/
//! ├── mod.rs          - Module exports and documentation
//! ├── db.rs           - Course model and database operations
//! └── handlers.rs     - Course creation and catalog read handlers
//! ```
//!
//! # Content Shape
//!
//! A course embeds its modules and lessons as one JSON document column,
//! not as separate tables. The enrollment engine only ever needs the
//! total lesson count and lesson ids, both served by `Course` directly.
//! Course content is write-once here: there is no update or delete.

/// Course model and database operations
pub mod db;

/// HTTP handlers for course endpoints
pub mod handlers;

// Re-export commonly used types
pub use db::{Course, CourseModule, Lesson, NewCourse};
pub use handlers::{create_course, get_course, list_courses};
