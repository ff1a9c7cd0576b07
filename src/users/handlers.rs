/**
 * User Handlers
 *
 * This module implements the HTTP handlers for user registration and
 * profile routes.
 *
 * # Registration Process
 *
 * 1. Validate name, email format and password length
 * 2. Hash password using bcrypt
 * 3. Insert the user; a duplicate email surfaces as a unique violation
 *    and is reported as 409 (no look-before-insert race)
 * 4. Return the created user
 *
 * # Access Levels
 *
 * - `POST /api/users` and the read endpoints are public
 * - `PUT /api/users/{id}` is owner-only: the authenticated email must
 *   match the target user's email, checked after existence
 */

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use bcrypt::{hash, DEFAULT_COST};
use serde::Deserialize;
use sqlx::SqlitePool;

use crate::error::{is_unique_violation, ApiError};
use crate::middleware::auth::AuthUser;
use crate::policy::require_owner;
use crate::users::db::{self, NewUser, User, UserUpdate};

/// Registration request body
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    #[serde(default)]
    pub username: Option<String>,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub age: Option<i64>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
}

/// Profile update request body
///
/// Every field is optional; absent fields are left unchanged.
#[derive(Debug, Deserialize, Default)]
pub struct UpdateUserRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub age: Option<i64>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
}

/// Register a new user
///
/// # Arguments
///
/// * `State(pool)` - Database connection pool
/// * `Json(request)` - Registration request
///
/// # Returns
///
/// `201 Created` with the new user as JSON
///
/// # Errors
///
/// * `400 Bad Request` - Blank name, invalid email format, or short password
/// * `409 Conflict` - Email already registered
pub async fn create_user(
    State(pool): State<SqlitePool>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    tracing::info!("Registration request for email: {}", request.email);

    if request.name.trim().is_empty() {
        return Err(ApiError::bad_request("Name is required"));
    }
    if !request.email.contains('@') {
        tracing::warn!("Invalid email format: {}", request.email);
        return Err(ApiError::bad_request("Invalid email format"));
    }
    if request.password.len() < 8 {
        tracing::warn!("Password too short for email: {}", request.email);
        return Err(ApiError::bad_request(
            "Password must be at least 8 characters",
        ));
    }

    let password_hash = hash(&request.password, DEFAULT_COST)
        .map_err(|_| ApiError::internal("Failed to hash password"))?;

    let new_user = NewUser {
        name: request.name,
        username: request.username,
        email: request.email,
        password_hash: Some(password_hash),
        age: request.age,
        location: request.location,
        bio: request.bio,
        roles: vec!["USER".to_string()],
    };

    let user = db::create_user(&pool, new_user).await.map_err(|err| {
        if is_unique_violation(&err) {
            tracing::warn!("Registration conflict: email already registered");
            ApiError::conflict("Email already registered")
        } else {
            ApiError::Database(err)
        }
    })?;

    tracing::info!("User created successfully: {}", user.email);

    Ok((StatusCode::CREATED, Json(user)))
}

/// List all users
pub async fn list_users(State(pool): State<SqlitePool>) -> Result<Json<Vec<User>>, ApiError> {
    let users = db::list_users(&pool).await?;
    Ok(Json(users))
}

/// Get a single user by id
///
/// # Errors
///
/// * `404 Not Found` - No user with this id
pub async fn get_user(
    State(pool): State<SqlitePool>,
    Path(id): Path<String>,
) -> Result<Json<User>, ApiError> {
    let user = db::find_by_id(&pool, &id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    Ok(Json(user))
}

/// Update a user's profile
///
/// Owner-only: the caller must be the user being updated. Existence is
/// checked before ownership, so an unknown id is 404 for everyone while a
/// foreign id is 403.
///
/// # Arguments
///
/// * `State(pool)` - Database connection pool
/// * `Path(id)` - Target user id
/// * `auth` - The authenticated caller
/// * `Json(request)` - Fields to change
///
/// # Errors
///
/// * `401 Unauthorized` - No valid token
/// * `404 Not Found` - No user with this id
/// * `403 Forbidden` - Caller is not the target user
/// * `409 Conflict` - New email already registered
pub async fn update_user(
    State(pool): State<SqlitePool>,
    Path(id): Path<String>,
    auth: AuthUser,
    Json(request): Json<UpdateUserRequest>,
) -> Result<Json<User>, ApiError> {
    tracing::info!("Profile update request for user id: {}", id);

    let existing = db::find_by_id(&pool, &id).await?;
    require_owner(existing.as_ref().map(|user| user.email.as_str()), &auth.0)?;

    let password_hash = match &request.password {
        Some(password) => {
            if password.len() < 8 {
                return Err(ApiError::bad_request(
                    "Password must be at least 8 characters",
                ));
            }
            Some(hash(password, DEFAULT_COST).map_err(|_| {
                ApiError::internal("Failed to hash password")
            })?)
        }
        None => None,
    };

    if let Some(email) = &request.email {
        if !email.contains('@') {
            return Err(ApiError::bad_request("Invalid email format"));
        }
    }

    let update = UserUpdate {
        name: request.name,
        username: request.username,
        email: request.email,
        password_hash,
        age: request.age,
        location: request.location,
        bio: request.bio,
    };

    let user = db::update_user(&pool, &id, update).await.map_err(|err| {
        if is_unique_violation(&err) {
            tracing::warn!("Profile update conflict: email already registered");
            ApiError::conflict("Email already registered")
        } else {
            ApiError::Database(err)
        }
    })?;

    tracing::info!("User updated: {}", user.id);

    Ok(Json(user))
}
