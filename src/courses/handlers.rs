/**
 * Course Handlers
 *
 * This module implements the HTTP handlers for the course catalog.
 *
 * # Access Levels
 *
 * - Reads (`GET /api/courses`, `GET /api/courses/{id}`) are public: the
 *   catalog is browsable without an account.
 * - Creation (`POST /api/courses`) requires authentication; the caller
 *   becomes the course owner.
 */

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use serde::Deserialize;
use sqlx::SqlitePool;

use crate::courses::db::{self, Course, NewCourse};
use crate::error::ApiError;
use crate::middleware::auth::AuthUser;

/// Query parameters for the course listing
#[derive(Debug, Deserialize, Default)]
pub struct ListCoursesParams {
    /// Restrict the listing to one owner's courses
    #[serde(default)]
    pub owner: Option<String>,
}

/// Create a new course
///
/// # Arguments
///
/// * `State(pool)` - Database connection pool
/// * `auth` - The authenticated caller, recorded as owner
/// * `Json(request)` - Course payload; module and lesson ids are assigned
///   server-side
///
/// # Returns
///
/// `201 Created` with the stored course as JSON
///
/// # Errors
///
/// * `400 Bad Request` - Blank course name
/// * `401 Unauthorized` - No valid token
pub async fn create_course(
    State(pool): State<SqlitePool>,
    auth: AuthUser,
    Json(request): Json<NewCourse>,
) -> Result<(StatusCode, Json<Course>), ApiError> {
    tracing::info!("Course creation request from: {}", auth.0.email);

    if request.course_name.trim().is_empty() {
        return Err(ApiError::bad_request("Course name is required"));
    }

    let course = db::create_course(&pool, request, &auth.0.email).await?;

    tracing::info!("Course created: {} ({})", course.course_name, course.id);

    Ok((StatusCode::CREATED, Json(course)))
}

/// List courses
///
/// Public. Pass `?owner=<email>` to list one user's courses.
pub async fn list_courses(
    State(pool): State<SqlitePool>,
    Query(params): Query<ListCoursesParams>,
) -> Result<Json<Vec<Course>>, ApiError> {
    let courses = db::list_courses(&pool, params.owner.as_deref()).await?;
    Ok(Json(courses))
}

/// Get a single course by id
///
/// # Errors
///
/// * `404 Not Found` - No course with this id
pub async fn get_course(
    State(pool): State<SqlitePool>,
    Path(id): Path<String>,
) -> Result<Json<Course>, ApiError> {
    let course = db::find_by_id(&pool, &id)
        .await?
        .ok_or_else(|| ApiError::not_found("Course not found"))?;

    Ok(Json(course))
}
