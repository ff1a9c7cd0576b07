//! Authentication test helpers
//!
//! Provides utilities for creating test users, issuing tokens, seeding
//! courses, and standing up a test server around the real router.

use axum::http::HeaderValue;
use axum_test::TestServer;
use sqlx::SqlitePool;
use uuid::Uuid;

use learnhub::auth::federated::FederatedProvider;
use learnhub::auth::tokens::TokenService;
use learnhub::courses::db::{self as courses_db, Course, NewCourse, NewCourseModule, NewLesson};
use learnhub::enrollment::engine::EnrollmentEngine;
use learnhub::routes::create_router;
use learnhub::server::state::AppState;
use learnhub::users::db::{self as users_db, NewUser};

/// Signing secret used by every test token service.
pub const TEST_JWT_SECRET: &str = "test-signing-secret-0123456789abcdef0123456789";

/// Low bcrypt cost so user creation does not dominate test time.
pub const TEST_BCRYPT_COST: u32 = 4;

/// Test user credentials
pub struct TestUser {
    pub id: String,
    pub email: String,
    pub password: String,
    pub token: String,
}

/// Token service wired with the test signing secret
pub fn test_token_service() -> TokenService {
    TokenService::new(TEST_JWT_SECRET, 3600)
}

/// Application state over a test pool
pub fn test_state(pool: &SqlitePool, provider: Option<FederatedProvider>) -> AppState {
    AppState {
        pool: pool.clone(),
        tokens: test_token_service(),
        engine: EnrollmentEngine::new(pool.clone()),
        provider,
        frontend_url: "http://localhost:8081".to_string(),
    }
}

/// Test server around the real router
pub fn test_server(state: AppState) -> TestServer {
    TestServer::new(create_router(state)).expect("Failed to start test server")
}

/// Create a test user in the database with a ready bearer token
pub async fn create_test_user(pool: &SqlitePool, email: &str, password: &str) -> TestUser {
    let password_hash = bcrypt::hash(password, TEST_BCRYPT_COST).expect("Failed to hash password");

    let user = users_db::create_user(
        pool,
        NewUser {
            name: "Test User".to_string(),
            username: None,
            email: email.to_string(),
            password_hash: Some(password_hash),
            age: None,
            location: None,
            bio: None,
            roles: vec!["USER".to_string()],
        },
    )
    .await
    .expect("Failed to create test user");

    let token = test_token_service()
        .issue(&user.email, user.roles.clone())
        .expect("Failed to issue test token");

    TestUser {
        id: user.id,
        email: user.email,
        password: password.to_string(),
        token,
    }
}

/// Create a test user with a unique email
pub async fn create_unique_test_user(pool: &SqlitePool) -> TestUser {
    let email = format!("test_{}@example.com", Uuid::new_v4());
    create_test_user(pool, &email, "test_password_123").await
}

/// Create authorization header value
pub fn auth_header(token: &str) -> String {
    format!("Bearer {}", token)
}

/// Authorization header as a typed header value
pub fn bearer(token: &str) -> HeaderValue {
    HeaderValue::from_str(&auth_header(token)).expect("Failed to build header value")
}

/// Seed a course with the given number of lessons in each module
///
/// Returns the stored course, including the server-assigned module and
/// lesson ids tests need for toggle calls.
pub async fn seed_course(
    pool: &SqlitePool,
    owner_email: &str,
    name: &str,
    lessons_per_module: &[usize],
) -> Course {
    let modules = lessons_per_module
        .iter()
        .enumerate()
        .map(|(m, count)| NewCourseModule {
            title: format!("Module {}", m + 1),
            description: None,
            lessons: (0..*count)
                .map(|l| NewLesson {
                    title: format!("Lesson {}", l + 1),
                    content: None,
                })
                .collect(),
        })
        .collect();

    courses_db::create_course(
        pool,
        NewCourse {
            course_name: name.to_string(),
            course_level: "Beginner".to_string(),
            institute: "Test Institute".to_string(),
            course_type: "Online".to_string(),
            duration: 6,
            start_date: None,
            modules,
        },
        owner_email,
    )
    .await
    .expect("Failed to seed course")
}
