//! Authentication integration tests
//!
//! Tests for password login, the bearer-token gate, and the federated
//! login callback flow (with the provider stubbed by wiremock).

mod common;

use axum::http::header::AUTHORIZATION;
use axum::http::StatusCode;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use learnhub::auth::federated::{link_identity, FederatedClaims, FederatedProvider};
use learnhub::auth::tokens::TokenService;
use learnhub::server::config::FederatedProviderConfig;
use learnhub::users::db::{self as users_db, NewUser};

use common::auth_helpers::{
    bearer, create_test_user, test_server, test_state, test_token_service, TEST_JWT_SECRET,
};
use common::database::TestDatabase;

#[tokio::test]
async fn test_login_success() {
    let db = TestDatabase::new().await;
    let server = test_server(test_state(db.pool(), None));

    create_test_user(db.pool(), "alice@example.com", "password123").await;

    let response = server
        .post("/api/auth/login")
        .json(&serde_json::json!({
            "email": "alice@example.com",
            "password": "password123"
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: serde_json::Value = response.json();

    // The token must validate against the same secret the server signs with
    let token = body["token"].as_str().expect("token field");
    let claims = test_token_service().validate(token).unwrap();
    assert_eq!(claims.sub, "alice@example.com");
    assert_eq!(claims.roles, vec!["USER".to_string()]);

    assert_eq!(body["user"]["email"], "alice@example.com");
    assert!(body["user"].get("password_hash").is_none());
}

#[tokio::test]
async fn test_login_failures_share_one_message() {
    let db = TestDatabase::new().await;
    let server = test_server(test_state(db.pool(), None));

    create_test_user(db.pool(), "alice@example.com", "password123").await;

    // A federation-only account has no password at all
    users_db::create_user(
        db.pool(),
        NewUser {
            name: "Fed Only".to_string(),
            username: None,
            email: "fed@example.com".to_string(),
            password_hash: None,
            age: None,
            location: None,
            bio: None,
            roles: vec!["USER".to_string()],
        },
    )
    .await
    .unwrap();

    let attempts = [
        ("alice@example.com", "wrong-password"),
        ("nobody@example.com", "password123"),
        ("fed@example.com", "password123"),
    ];

    for (email, password) in attempts {
        let response = server
            .post("/api/auth/login")
            .json(&serde_json::json!({ "email": email, "password": password }))
            .await;

        assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
        let body: serde_json::Value = response.json();
        assert_eq!(body["error"], "Invalid email or password");
    }
}

#[tokio::test]
async fn test_me_returns_current_user() {
    let db = TestDatabase::new().await;
    let server = test_server(test_state(db.pool(), None));

    let user = create_test_user(db.pool(), "alice@example.com", "password123").await;

    let response = server
        .get("/api/auth/me")
        .add_header(AUTHORIZATION, bearer(&user.token))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert_eq!(body["email"], "alice@example.com");
    assert_eq!(body["id"], user.id.as_str());
}

#[tokio::test]
async fn test_me_requires_authentication() {
    let db = TestDatabase::new().await;
    let server = test_server(test_state(db.pool(), None));

    let response = server.get("/api/auth/me").await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Authentication required");
}

#[tokio::test]
async fn test_gate_rejects_malformed_token() {
    let db = TestDatabase::new().await;
    let server = test_server(test_state(db.pool(), None));

    let response = server
        .get("/api/auth/me")
        .add_header(AUTHORIZATION, bearer("not-a-token"))
        .await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Malformed token");
}

#[tokio::test]
async fn test_gate_rejects_foreign_signature() {
    let db = TestDatabase::new().await;
    let server = test_server(test_state(db.pool(), None));

    let user = create_test_user(db.pool(), "alice@example.com", "password123").await;

    // Same claims, different signing secret
    let foreign = TokenService::new("another-secret-entirely-0123456789abcdef", 3600);
    let forged = foreign
        .issue(&user.email, vec!["USER".to_string()])
        .unwrap();

    let response = server
        .get("/api/auth/me")
        .add_header(AUTHORIZATION, bearer(&forged))
        .await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Invalid token signature");
}

#[tokio::test]
async fn test_gate_rejects_expired_token() {
    let db = TestDatabase::new().await;
    let server = test_server(test_state(db.pool(), None));

    let user = create_test_user(db.pool(), "alice@example.com", "password123").await;

    // Zero lifetime expires the token in the same second it is issued
    let short_lived = TokenService::new(TEST_JWT_SECRET, 0);
    let stale = short_lived
        .issue(&user.email, vec!["USER".to_string()])
        .unwrap();

    let response = server
        .get("/api/auth/me")
        .add_header(AUTHORIZATION, bearer(&stale))
        .await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Token expired");
}

#[tokio::test]
async fn test_gate_rejects_token_for_deleted_user() {
    let db = TestDatabase::new().await;
    let server = test_server(test_state(db.pool(), None));

    let user = create_test_user(db.pool(), "alice@example.com", "password123").await;

    sqlx::query("DELETE FROM users WHERE email = $1")
        .bind(&user.email)
        .execute(db.pool())
        .await
        .unwrap();

    let response = server
        .get("/api/auth/me")
        .add_header(AUTHORIZATION, bearer(&user.token))
        .await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Unknown token subject");
}

#[tokio::test]
async fn test_gate_treats_non_bearer_header_as_anonymous() {
    let db = TestDatabase::new().await;
    let server = test_server(test_state(db.pool(), None));

    let basic = axum::http::HeaderValue::from_static("Basic YWxpY2U6cGFzc3dvcmQ=");

    // Public endpoint: request goes through fine
    let response = server
        .get("/api/courses")
        .add_header(AUTHORIZATION, basic.clone())
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    // Protected endpoint: rejected as missing credentials, not as malformed
    let response = server
        .get("/api/auth/me")
        .add_header(AUTHORIZATION, basic)
        .await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Authentication required");
}

/// Stand up a wiremock provider answering both OAuth endpoints.
async fn mock_provider(claims: serde_json::Value) -> (MockServer, FederatedProvider) {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .and(body_string_contains("grant_type=authorization_code"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "provider-access-token",
            "token_type": "Bearer"
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/oauth/userinfo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(claims))
        .mount(&mock_server)
        .await;

    let provider = FederatedProvider::new(FederatedProviderConfig {
        token_url: format!("{}/oauth/token", mock_server.uri()),
        userinfo_url: format!("{}/oauth/userinfo", mock_server.uri()),
        client_id: "test-client".to_string(),
        client_secret: "test-secret".to_string(),
        redirect_url: "http://localhost:3000/api/auth/federated/callback".to_string(),
    });

    (mock_server, provider)
}

#[tokio::test]
async fn test_federated_callback_links_and_redirects() {
    let db = TestDatabase::new().await;
    let (_mock_server, provider) = mock_provider(serde_json::json!({
        "email": "alice@example.com",
        "name": "Alice",
        "sub": "provider-id-1"
    }))
    .await;
    let server = test_server(test_state(db.pool(), Some(provider)));

    let response = server
        .get("/api/auth/federated/callback")
        .add_query_param("code", "test-code")
        .await;

    assert_eq!(response.status_code(), StatusCode::SEE_OTHER);

    let location = response.header("location");
    let location = location.to_str().unwrap();
    assert!(location.starts_with("http://localhost:8081/oauth2/callback"));

    let url = reqwest::Url::parse(location).unwrap();
    let params: std::collections::HashMap<String, String> =
        url.query_pairs().into_owned().collect();

    // The redirect carries a token signed by this server
    let claims = test_token_service().validate(&params["token"]).unwrap();
    assert_eq!(claims.sub, "alice@example.com");

    let user_data: serde_json::Value = serde_json::from_str(&params["userData"]).unwrap();
    assert_eq!(user_data["email"], "alice@example.com");
    assert_eq!(user_data["name"], "Alice");

    // A local identity now exists with the default role
    let user = users_db::find_by_email(db.pool(), "alice@example.com")
        .await
        .unwrap()
        .expect("linked identity");
    assert_eq!(user.roles, vec!["USER".to_string()]);
    assert!(user.password_hash.is_none());
}

#[tokio::test]
async fn test_federated_callback_reuses_existing_identity() {
    let db = TestDatabase::new().await;
    let (_mock_server, provider) = mock_provider(serde_json::json!({
        "email": "alice@example.com",
        "name": "Alice"
    }))
    .await;
    let server = test_server(test_state(db.pool(), Some(provider)));

    for _ in 0..2 {
        let response = server
            .get("/api/auth/federated/callback")
            .add_query_param("code", "test-code")
            .await;
        assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
    }

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE email = $1")
        .bind("alice@example.com")
        .fetch_one(db.pool())
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn test_federated_callback_redirects_to_login_on_provider_failure() {
    let db = TestDatabase::new().await;

    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let provider = FederatedProvider::new(FederatedProviderConfig {
        token_url: format!("{}/oauth/token", mock_server.uri()),
        userinfo_url: format!("{}/oauth/userinfo", mock_server.uri()),
        client_id: "test-client".to_string(),
        client_secret: "test-secret".to_string(),
        redirect_url: "http://localhost:3000/api/auth/federated/callback".to_string(),
    });
    let server = test_server(test_state(db.pool(), Some(provider)));

    let response = server
        .get("/api/auth/federated/callback")
        .add_query_param("code", "bad-code")
        .await;

    assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
    let location = response.header("location");
    assert_eq!(location.to_str().unwrap(), "http://localhost:8081/login?error=true");

    // The failed exchange must not have created an identity
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(db.pool())
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
async fn test_federated_callback_unconfigured_returns_503() {
    let db = TestDatabase::new().await;
    let server = test_server(test_state(db.pool(), None));

    let response = server
        .get("/api/auth/federated/callback")
        .add_query_param("code", "test-code")
        .await;

    assert_eq!(response.status_code(), StatusCode::SERVICE_UNAVAILABLE);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Federated login is not configured");
}

#[tokio::test]
async fn test_link_identity_survives_concurrent_first_logins() {
    let db = TestDatabase::new().await;

    let claims = || FederatedClaims {
        email: "race@example.com".to_string(),
        name: Some("Racer".to_string()),
    };

    let (a, b) = tokio::join!(
        link_identity(db.pool(), claims()),
        link_identity(db.pool(), claims()),
    );

    let user_a = a.unwrap();
    let user_b = b.unwrap();
    assert_eq!(user_a.id, user_b.id);

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE email = $1")
        .bind("race@example.com")
        .fetch_one(db.pool())
        .await
        .unwrap();
    assert_eq!(count, 1);
}
