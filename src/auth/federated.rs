/**
 * Federated Identity Provider
 *
 * This module handles logins that authenticate against an external
 * identity provider. The provider does the password handling; this side
 * exchanges the callback code for the user's claims and links them to a
 * local identity by email.
 *
 * # Code Exchange
 *
 * 1. POST the token endpoint with an authorization_code grant
 * 2. GET the userinfo endpoint with the returned access token
 * 3. Deserialize `{email, name}` claims; unknown provider fields ignored
 *
 * # Identity Linking
 *
 * An existing identity with the claimed email is reused with its current
 * roles. A first login creates one with role USER and no password. Two
 * concurrent first logins race on the email unique index; the loser
 * re-fetches and returns the winner's row instead of failing.
 */

use serde::Deserialize;
use sqlx::SqlitePool;

use crate::error::is_unique_violation;
use crate::server::config::FederatedProviderConfig;
use crate::users::db::{self, NewUser, User};

/// Claims returned by the provider's userinfo endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct FederatedClaims {
    /// Verified email address, the linking key
    pub email: String,
    /// Display name, when the provider supplies one
    #[serde(default)]
    pub name: Option<String>,
}

/// Client for the external identity provider
#[derive(Clone)]
pub struct FederatedProvider {
    client: reqwest::Client,
    token_url: String,
    userinfo_url: String,
    client_id: String,
    client_secret: String,
    redirect_url: String,
}

#[derive(Debug, Deserialize)]
struct TokenEndpointResponse {
    access_token: String,
}

impl FederatedProvider {
    /// Build a provider client from configuration
    pub fn new(config: FederatedProviderConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            token_url: config.token_url,
            userinfo_url: config.userinfo_url,
            client_id: config.client_id,
            client_secret: config.client_secret,
            redirect_url: config.redirect_url,
        }
    }

    /// Exchange a callback code for the user's claims
    ///
    /// # Arguments
    /// * `code` - The authorization code from the provider's callback
    ///
    /// # Returns
    /// The provider's claims about the user, or the transport/decode error
    pub async fn exchange_code(&self, code: &str) -> Result<FederatedClaims, reqwest::Error> {
        let token: TokenEndpointResponse = self
            .client
            .post(&self.token_url)
            .form(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("redirect_uri", self.redirect_url.as_str()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let claims: FederatedClaims = self
            .client
            .get(&self.userinfo_url)
            .bearer_auth(&token.access_token)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(claims)
    }
}

/// Link federated claims to a local identity
///
/// Idempotent under concurrent first logins for the same email: the
/// create step treats a unique-index conflict as a lost race and returns
/// the existing row.
///
/// # Arguments
/// * `pool` - Database connection pool
/// * `claims` - Claims from the provider
///
/// # Returns
/// The linked identity with its current roles
pub async fn link_identity(
    pool: &SqlitePool,
    claims: FederatedClaims,
) -> Result<User, sqlx::Error> {
    if let Some(user) = db::find_by_email(pool, &claims.email).await? {
        tracing::info!("Federated login matched existing identity: {}", user.email);
        return Ok(user);
    }

    let new_user = NewUser {
        name: claims.name.unwrap_or_else(|| claims.email.clone()),
        username: None,
        email: claims.email.clone(),
        password_hash: None,
        age: None,
        location: None,
        bio: None,
        roles: vec!["USER".to_string()],
    };

    match db::create_user(pool, new_user).await {
        Ok(user) => {
            tracing::info!("Federated first login created identity: {}", user.email);
            Ok(user)
        }
        Err(err) if is_unique_violation(&err) => {
            // Lost the race to a concurrent first login for the same email.
            db::find_by_email(pool, &claims.email)
                .await?
                .ok_or(sqlx::Error::RowNotFound)
        }
        Err(err) => Err(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claims_tolerate_extra_provider_fields() {
        let json = r#"{"email":"alice@example.com","name":"Alice","picture":"https://cdn/p.png","sub":"12345"}"#;
        let claims: FederatedClaims = serde_json::from_str(json).unwrap();
        assert_eq!(claims.email, "alice@example.com");
        assert_eq!(claims.name.as_deref(), Some("Alice"));
    }

    #[test]
    fn test_claims_name_is_optional() {
        let claims: FederatedClaims =
            serde_json::from_str(r#"{"email":"alice@example.com"}"#).unwrap();
        assert!(claims.name.is_none());
    }
}
