/**
 * Federated Callback Handler
 *
 * This module implements the browser-facing half of the federated login
 * flow: the provider redirects the user here with an authorization code,
 * and this handler turns that code into a local identity and a token.
 *
 * # Flow
 *
 * 1. Exchange the code for claims at the provider
 * 2. Link the claims to a local identity (created on first login)
 * 3. Issue a token for the identity
 * 4. Redirect the browser to the frontend callback with `token` and a
 *    URL-encoded JSON `userData` object as query parameters
 *
 * A failed exchange redirects to the frontend login page with
 * `?error=true` instead of rendering an API error, because the caller is
 * a browser mid-redirect rather than an API client.
 */

use axum::{
    extract::{Query, State},
    response::Redirect,
};
use serde::Deserialize;

use crate::auth::federated::link_identity;
use crate::error::ApiError;
use crate::server::state::AppState;

/// Query parameters on the provider's redirect back to us
#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    /// Authorization code to exchange
    pub code: String,
}

/// Federated callback handler
///
/// # Arguments
///
/// * `State(state)` - Application state (provider, pool, token service)
/// * `Query(params)` - The provider's callback parameters
///
/// # Returns
///
/// A redirect to `{frontend}/oauth2/callback?token=..&userData=..` on
/// success, or to `{frontend}/login?error=true` when the provider
/// exchange fails
///
/// # Errors
///
/// * `503 Service Unavailable` - No federated provider is configured
pub async fn federated_callback(
    State(state): State<AppState>,
    Query(params): Query<CallbackParams>,
) -> Result<Redirect, ApiError> {
    let provider = state.provider.as_ref().ok_or_else(|| {
        tracing::error!("Federated callback received but no provider is configured");
        ApiError::service_unavailable("Federated login is not configured")
    })?;

    let claims = match provider.exchange_code(&params.code).await {
        Ok(claims) => claims,
        Err(err) => {
            tracing::warn!("Federated code exchange failed: {}", err);
            let url = format!("{}/login?error=true", state.frontend_url);
            return Ok(Redirect::to(&url));
        }
    };

    let user = link_identity(&state.pool, claims).await?;

    let token = state
        .tokens
        .issue(&user.email, user.roles.clone())
        .map_err(|_| ApiError::internal("Failed to issue token"))?;

    let user_data = serde_json::json!({
        "id": user.id,
        "email": user.email,
        "name": user.name,
    })
    .to_string();

    let url = reqwest::Url::parse_with_params(
        &format!("{}/oauth2/callback", state.frontend_url),
        [("token", token.as_str()), ("userData", user_data.as_str())],
    )
    .map_err(|_| ApiError::internal("Invalid frontend URL"))?;

    tracing::info!("Federated login completed for: {}", user.email);

    Ok(Redirect::to(url.as_str()))
}
