/**
 * Enrollment Handlers
 *
 * This module implements the HTTP handlers for the enrollment endpoints.
 * All domain decisions live in the engine; handlers only bind the
 * authenticated caller and the path parameters to engine calls.
 *
 * # Access Levels
 *
 * Every mutating endpoint requires authentication and always acts on the
 * caller's own enrollments; there is no way to enroll someone else. The
 * status endpoint is public and reports `false` for anonymous callers.
 */

use axum::{
    extract::{Path, State},
    response::Json,
};

use crate::enrollment::engine::EnrollmentEngine;
use crate::enrollment::store::Enrollment;
use crate::error::ApiError;
use crate::middleware::auth::AuthUser;

/// Enroll the caller in a course
///
/// `POST /api/enrollments/{course_id}`
///
/// # Errors
///
/// * `401 Unauthorized` - No valid token
/// * `400 Bad Request` - Unknown user/course or already enrolled
pub async fn enroll_in_course(
    State(engine): State<EnrollmentEngine>,
    auth: AuthUser,
    Path(course_id): Path<String>,
) -> Result<Json<Enrollment>, ApiError> {
    let enrollment = engine.enroll(&auth.0.email, &course_id).await?;
    Ok(Json(enrollment))
}

/// List the caller's enrollments
///
/// `GET /api/enrollments/user`
pub async fn get_user_enrollments(
    State(engine): State<EnrollmentEngine>,
    auth: AuthUser,
) -> Result<Json<Vec<Enrollment>>, ApiError> {
    let enrollments = engine.enrollments_for_user(&auth.0.email).await?;
    Ok(Json(enrollments))
}

/// Flip a lesson's completion state for the caller
///
/// `POST /api/enrollments/{course_id}/lessons/{lesson_id}/toggle`
///
/// Returns the updated enrollment, including the recomputed progress.
///
/// # Errors
///
/// * `401 Unauthorized` - No valid token
/// * `400 Bad Request` - Caller is not enrolled in the course
pub async fn toggle_lesson_completion(
    State(engine): State<EnrollmentEngine>,
    auth: AuthUser,
    Path((course_id, lesson_id)): Path<(String, String)>,
) -> Result<Json<Enrollment>, ApiError> {
    let enrollment = engine
        .toggle_lesson(&auth.0.email, &course_id, &lesson_id)
        .await?;
    Ok(Json(enrollment))
}

/// Report whether the caller is enrolled in a course
///
/// `GET /api/enrollments/{course_id}/status`
///
/// Anonymous callers get `false` rather than 401: the frontend asks this
/// on course pages before the user has logged in.
pub async fn enrollment_status(
    State(engine): State<EnrollmentEngine>,
    user: Option<AuthUser>,
    Path(course_id): Path<String>,
) -> Result<Json<bool>, ApiError> {
    let enrolled = match user {
        Some(auth) => engine.is_enrolled(&auth.0.email, &course_id).await?,
        None => false,
    };
    Ok(Json(enrolled))
}

/// Remove the caller's enrollment in a course
///
/// `DELETE /api/enrollments/{course_id}`
///
/// # Errors
///
/// * `401 Unauthorized` - No valid token
/// * `400 Bad Request` - Caller is not enrolled in the course
pub async fn unenroll_from_course(
    State(engine): State<EnrollmentEngine>,
    auth: AuthUser,
    Path(course_id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    engine.unenroll(&auth.0.email, &course_id).await?;

    Ok(Json(serde_json::json!({
        "message": "Successfully unenrolled from course"
    })))
}
