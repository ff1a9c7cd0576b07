/**
 * Current User Handler
 *
 * This module implements the handler for GET /api/auth/me, which returns
 * the currently authenticated user's profile.
 *
 * The authentication gate has already validated the token and confirmed
 * the subject exists; this handler just serves the full row.
 */

use axum::{extract::State, response::Json};
use sqlx::SqlitePool;

use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::users::db::{self, User};

/// Get current user handler
///
/// # Arguments
///
/// * `State(pool)` - Database connection pool
/// * `auth` - The authenticated caller
///
/// # Errors
///
/// * `401 Unauthorized` - No valid token
/// * `404 Not Found` - Subject row vanished between the gate and here
pub async fn get_me(
    State(pool): State<SqlitePool>,
    auth: AuthUser,
) -> Result<Json<User>, ApiError> {
    let user = db::find_by_email(&pool, &auth.0.email)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    Ok(Json(user))
}
