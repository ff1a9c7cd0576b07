//! Authentication Handlers Module
//!
//! This module contains all HTTP handlers for authentication endpoints.
//!
//! # Module Structure
//!
//! ```text
//! handlers/
//! ├── mod.rs       - Module exports and documentation
//! ├── types.rs     - Request and response types
//! ├── login.rs     - Password login handler
//! ├── me.rs        - Current user handler
//! └── federated.rs - Federated callback handler
//! ```
//!
//! # Handlers
//!
//! - **`login`** - POST /api/auth/login - Password authentication
//! - **`get_me`** - GET /api/auth/me - Current user info
//! - **`federated_callback`** - GET /api/auth/federated/callback -
//!   Provider redirect target

/// Request and response types
pub mod types;

/// Login handler
pub mod login;

/// Current user handler
pub mod me;

/// Federated callback handler
pub mod federated;

// Re-export commonly used types
pub use types::{AuthResponse, LoginRequest};

// Re-export handlers
pub use federated::federated_callback;
pub use login::login;
pub use me::get_me;
