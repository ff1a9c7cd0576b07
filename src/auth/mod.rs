//! Authentication Module
//!
//! This module handles credential verification, token issuance and the
//! federated login flow.
//!
//! # Architecture
//!
//! The auth module is organized into focused submodules:
//!
//! - **`tokens`** - Bearer token issuance and validation
//! - **`federated`** - External identity provider client and identity linking
//! - **`handlers`** - HTTP handlers for authentication endpoints
//!
//! # Module Structure
//!
//! ```text
//! auth/
//! ├── mod.rs          - Module exports and documentation
//! ├── tokens.rs       - Token service
//! ├── federated.rs    - Provider client and identity linking
//! └── handlers/       - HTTP handlers
//!     ├── mod.rs      - Handler exports
//!     ├── types.rs    - Request/response types
//!     ├── login.rs    - Password login handler
//!     ├── me.rs       - Current user handler
//!     └── federated.rs - Federated callback handler
//! ```
//!
//! # Authentication Flow
//!
//! 1. **Login**: email and password verified → signed token returned
//! 2. **Federated**: provider callback code exchanged for claims → local
//!    identity linked by email → token issued → browser redirected to the
//!    frontend with the token
//! 3. **Requests**: the authentication gate validates the bearer token and
//!    attaches the caller's identity (see `crate::middleware`)
//!
//! # Security
//!
//! - Passwords are hashed using bcrypt before storage
//! - Tokens are stateless and signed; no session store
//! - Expired or tampered tokens are rejected with the reason
//! - Login failures return one message for unknown email and wrong
//!   password alike

/// Bearer token issuance and validation
pub mod tokens;

/// Federated identity provider client and identity linking
pub mod federated;

/// HTTP handlers for authentication endpoints
pub mod handlers;

// Re-export commonly used types and handlers
pub use federated::{link_identity, FederatedClaims, FederatedProvider};
pub use handlers::types::{AuthResponse, LoginRequest};
pub use handlers::{federated_callback, get_me, login};
pub use tokens::{Claims, TokenError, TokenService};
