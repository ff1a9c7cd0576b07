/**
 * Authentication Gate
 *
 * This middleware runs on every API request. It inspects the Authorization
 * header and establishes the caller's identity before any handler runs.
 *
 * # Behavior
 *
 * 1. No Authorization header, or one without the `Bearer ` scheme:
 *    the request proceeds anonymous. Public routes serve it; protected
 *    routes reject it through the `AuthUser` extractor.
 * 2. `Bearer <token>` with an invalid token: the request is rejected with
 *    401 and the validation failure as the reason. It never reaches a
 *    handler.
 * 3. `Bearer <token>` with a valid token: the subject is looked up in the
 *    users table and an `AuthenticatedUser` is attached to the request
 *    extensions. A subject that no longer exists is rejected with 401.
 *
 * The identity is request-scoped and immutable: handlers receive it
 * through extractors, never through shared mutable state.
 */

use axum::{
    extract::{FromRequestParts, OptionalFromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};
use std::convert::Infallible;

use crate::error::ApiError;
use crate::server::state::AppState;
use crate::users::db;

/// Authenticated caller identity, attached to request extensions
#[derive(Clone, Debug)]
pub struct AuthenticatedUser {
    /// Email address, the token subject
    pub email: String,
    /// Current role names from the user row
    pub roles: Vec<String>,
}

/// Authentication gate middleware
///
/// Applied once to the whole API router via
/// `axum::middleware::from_fn_with_state`.
///
/// Roles are read from the user row at request time rather than trusted
/// from the token, so role changes apply to tokens issued earlier.
pub async fn auth_gate(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    // Anything that is not a bearer credential counts as anonymous.
    let token = match header.and_then(|value| value.strip_prefix("Bearer ")) {
        Some(token) => token,
        None => return Ok(next.run(request).await),
    };

    let claims = state.tokens.validate(token).map_err(|err| {
        tracing::warn!("Rejected bearer token: {}", err);
        ApiError::from(err)
    })?;

    let user = db::find_by_email(&state.pool, &claims.sub)
        .await?
        .ok_or_else(|| {
            tracing::warn!("Token subject no longer exists: {}", claims.sub);
            ApiError::unauthorized("Unknown token subject")
        })?;

    request.extensions_mut().insert(AuthenticatedUser {
        email: user.email,
        roles: user.roles,
    });

    Ok(next.run(request).await)
}

/// Axum extractor for the authenticated caller
///
/// Use `AuthUser` as a handler parameter on routes that require a valid
/// identity; anonymous requests are rejected with 401. Use
/// `Option<AuthUser>` on routes that degrade gracefully for anonymous
/// callers.
#[derive(Clone, Debug)]
pub struct AuthUser(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .map(AuthUser)
            .ok_or_else(|| ApiError::unauthorized("Authentication required"))
    }
}

impl<S> OptionalFromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Option<Self>, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .map(AuthUser))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts_with_identity() -> Parts {
        let mut request = Request::builder().uri("/").body(()).unwrap();
        request.extensions_mut().insert(AuthenticatedUser {
            email: "alice@example.com".to_string(),
            roles: vec!["USER".to_string()],
        });
        request.into_parts().0
    }

    fn anonymous_parts() -> Parts {
        Request::builder().uri("/").body(()).unwrap().into_parts().0
    }

    #[tokio::test]
    async fn test_extractor_reads_identity_from_extensions() {
        let mut parts = parts_with_identity();
        let user = <AuthUser as FromRequestParts<()>>::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        assert_eq!(user.0.email, "alice@example.com");
        assert_eq!(user.0.roles, vec!["USER".to_string()]);
    }

    #[tokio::test]
    async fn test_extractor_rejects_anonymous_requests() {
        let mut parts = anonymous_parts();
        let result = <AuthUser as FromRequestParts<()>>::from_request_parts(&mut parts, &()).await;
        let err = result.unwrap_err();
        assert_eq!(err.status_code(), axum::http::StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_optional_extractor_degrades_to_none() {
        let mut parts = anonymous_parts();
        let user =
            <AuthUser as OptionalFromRequestParts<()>>::from_request_parts(&mut parts, &())
                .await
                .unwrap();
        assert!(user.is_none());
    }
}
