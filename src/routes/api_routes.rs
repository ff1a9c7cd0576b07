/**
 * API Route Handlers
 *
 * This module registers the route handlers for API endpoints, including:
 * - Authentication endpoints (login, federated callback, current user)
 * - User endpoints (register, read, update)
 * - Course endpoints (create, read)
 * - Enrollment endpoints (enroll, progress, status, unenroll)
 *
 * # Routes
 *
 * ## Authentication
 * - `POST /api/auth/login` - Password login, returns a bearer token
 * - `GET /api/auth/federated/callback` - Federated provider callback
 * - `GET /api/auth/me` - Get current user info
 *
 * ## Users
 * - `POST /api/users` - Register a new user
 * - `GET /api/users` - List users
 * - `GET /api/users/{id}` - Get a user by id
 * - `PUT /api/users/{id}` - Update a user (owner only)
 *
 * ## Courses
 * - `POST /api/courses` - Create a course (requires authentication)
 * - `GET /api/courses` - List courses, optionally filtered by owner
 * - `GET /api/courses/{id}` - Get a course by id
 *
 * ## Enrollments
 * - `POST /api/enrollments/{course_id}` - Enroll in a course
 * - `GET /api/enrollments/user` - List own enrollments
 * - `POST /api/enrollments/{course_id}/lessons/{lesson_id}/toggle` - Toggle a lesson
 * - `GET /api/enrollments/{course_id}/status` - Enrollment status
 * - `DELETE /api/enrollments/{course_id}` - Unenroll from a course
 */

use axum::Router;

use crate::auth::{federated_callback, get_me, login};
use crate::courses::{create_course, get_course, list_courses};
use crate::enrollment::handlers::{
    enroll_in_course, enrollment_status, get_user_enrollments, toggle_lesson_completion,
    unenroll_from_course,
};
use crate::server::state::AppState;
use crate::users::{create_user, get_user, list_users, update_user};

/// Configure API routes
///
/// This function adds the following routes to the router:
///
/// ## Authentication Routes
/// - `POST /api/auth/login` - Public (returns a bearer token)
/// - `GET /api/auth/federated/callback` - Public (provider redirects here)
/// - `GET /api/auth/me` - Requires authentication
///
/// ## User Routes
/// - `POST /api/users` - Public (registration)
/// - `GET /api/users`, `GET /api/users/{id}` - Public reads
/// - `PUT /api/users/{id}` - Requires authentication, owner only
///
/// ## Course Routes
/// - `POST /api/courses` - Requires authentication
/// - `GET /api/courses`, `GET /api/courses/{id}` - Public reads
///
/// ## Enrollment Routes
/// - `GET /api/enrollments/{course_id}/status` - Public (anonymous answers false)
/// - All other enrollment routes require authentication
///
/// # Arguments
///
/// * `router` - The router to add routes to
///
/// # Returns
///
/// Router with API routes configured
///
/// # Authentication
///
/// The gate resolves tokens for every route here. Which routes reject
/// anonymous requests is decided by each handler's extractors, not by
/// the route table.
pub fn configure_api_routes(router: Router<AppState>) -> Router<AppState> {
    router
        // Authentication endpoints
        .route(
            "/api/auth/login",
            axum::routing::post(login),
        )
        .route(
            "/api/auth/federated/callback",
            axum::routing::get(federated_callback),
        )
        .route(
            "/api/auth/me",
            axum::routing::get(get_me),
        )
        // User endpoints
        .route(
            "/api/users",
            axum::routing::post(create_user).get(list_users),
        )
        .route(
            "/api/users/{id}",
            axum::routing::get(get_user).put(update_user),
        )
        // Course endpoints
        .route(
            "/api/courses",
            axum::routing::post(create_course).get(list_courses),
        )
        .route(
            "/api/courses/{id}",
            axum::routing::get(get_course),
        )
        // Enrollment endpoints
        .route(
            "/api/enrollments/user",
            axum::routing::get(get_user_enrollments),
        )
        .route(
            "/api/enrollments/{course_id}",
            axum::routing::post(enroll_in_course).delete(unenroll_from_course),
        )
        .route(
            "/api/enrollments/{course_id}/lessons/{lesson_id}/toggle",
            axum::routing::post(toggle_lesson_completion),
        )
        .route(
            "/api/enrollments/{course_id}/status",
            axum::routing::get(enrollment_status),
        )
}
