/**
 * Authentication Handler Types
 *
 * This module defines the request and response types used by the
 * authentication handlers.
 */

use serde::{Deserialize, Serialize};

use crate::users::db::User;

/// Login request
///
/// Contains the email and password for password authentication.
#[derive(Deserialize, Serialize, Debug)]
pub struct LoginRequest {
    /// User's email address
    pub email: String,
    /// User's password (verified against the stored hash)
    pub password: String,
}

/// Auth response
///
/// Returned by the login handler. The user's password hash is never
/// serialized.
#[derive(Serialize, Debug)]
pub struct AuthResponse {
    /// Signed bearer token
    pub token: String,
    /// The authenticated user
    pub user: User,
}
