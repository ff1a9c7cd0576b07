/**
 * Login Handler
 *
 * This module implements the password authentication handler for
 * POST /api/auth/login.
 *
 * # Authentication Process
 *
 * 1. Look up user by email
 * 2. Verify password using bcrypt
 * 3. Issue a signed token carrying the email and roles
 * 4. Return token and user info
 *
 * # Security
 *
 * - Unknown email, missing password hash (federation-only account) and
 *   wrong password all return the same 401 message, so responses do not
 *   reveal which emails are registered
 * - Passwords are never logged or returned in responses
 */

use axum::{extract::State, response::Json};
use bcrypt::verify;
use sqlx::SqlitePool;

use crate::auth::handlers::types::{AuthResponse, LoginRequest};
use crate::auth::tokens::TokenService;
use crate::error::ApiError;
use crate::users::db;

const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Login handler
///
/// # Arguments
///
/// * `State(pool)` - Database connection pool
/// * `State(tokens)` - Token service
/// * `Json(request)` - Login request containing email and password
///
/// # Returns
///
/// JSON response with the bearer token and user info
///
/// # Errors
///
/// * `401 Unauthorized` - Unknown email, federation-only account, or
///   wrong password (same message for all three)
///
/// # Example Response
///
/// ```json
/// {
///   "token": "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...",
///   "user": {
///     "id": "123e4567-e89b-12d3-a456-426614174000",
///     "email": "user@example.com",
///     "roles": ["USER"]
///   }
/// }
/// ```
pub async fn login(
    State(pool): State<SqlitePool>,
    State(tokens): State<TokenService>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    tracing::info!("Login request for: {}", request.email);

    let user = db::find_by_email(&pool, &request.email)
        .await?
        .ok_or_else(|| {
            tracing::warn!("Login failed: unknown email");
            ApiError::unauthorized(INVALID_CREDENTIALS)
        })?;

    // Federation-only accounts have no password to verify against.
    let password_hash = user.password_hash.as_deref().ok_or_else(|| {
        tracing::warn!("Login failed: account has no password: {}", user.email);
        ApiError::unauthorized(INVALID_CREDENTIALS)
    })?;

    let valid = verify(&request.password, password_hash)
        .map_err(|_| ApiError::internal("Password verification failed"))?;

    if !valid {
        tracing::warn!("Login failed: wrong password for: {}", user.email);
        return Err(ApiError::unauthorized(INVALID_CREDENTIALS));
    }

    let token = tokens
        .issue(&user.email, user.roles.clone())
        .map_err(|_| ApiError::internal("Failed to issue token"))?;

    tracing::info!("User logged in successfully: {}", user.email);

    Ok(Json(AuthResponse { token, user }))
}
