//! Users Module
//!
//! This module owns the identity records behind authentication, authorization
//! and enrollment. Users are looked up by email (the token subject) and are
//! never hard-deleted.
//!
//! # Architecture
//!
//! The users module is organized into focused submodules:
//!
//! - **`db`** - User model and database operations
//! - **`handlers`** - HTTP handlers for registration and profile routes
//!
//! # Module Structure
//!
//! ```text
//! users/
//! ├── mod.rs          - Module exports and documentation
//! ├── db.rs           - User model and database operations
//! └── handlers.rs     - Registration, listing and profile update handlers
//! ```
//!
//! # Identity Shape
//!
//! A user row carries credentials (`password_hash`, NULL for accounts that
//! only ever logged in through the federated provider), profile fields, a
//! JSON `roles` list (default `["USER"]`) and a JSON `enrolled_courses`
//! list maintained by the enrollment engine.

/// User model and database operations
pub mod db;

/// HTTP handlers for user endpoints
pub mod handlers;

// Re-export commonly used types
pub use db::{NewUser, User, UserUpdate};
pub use handlers::{create_user, get_user, list_users, update_user};
