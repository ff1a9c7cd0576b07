/**
 * Token Issuance and Validation
 *
 * This module handles signed bearer tokens for stateless authentication.
 * Tokens are self-contained: the server keeps no session state, and any
 * instance configured with the same signing secret can validate a token
 * issued by another.
 */

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

/// Token claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user's email address
    pub sub: String,
    /// Role names granted to the subject
    pub roles: Vec<String>,
    /// Issued at time (Unix timestamp)
    pub iat: u64,
    /// Expiration time (Unix timestamp)
    pub exp: u64,
}

/// Why a token failed validation
///
/// The three cases are kept distinct so the authentication gate can tell
/// the client which check failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    /// The token structure could not be parsed
    #[error("Malformed token")]
    Malformed,
    /// The signature does not verify against the configured secret
    #[error("Invalid token signature")]
    SignatureInvalid,
    /// The token's expiry time has passed
    #[error("Token expired")]
    Expired,
}

/// Issues and validates signed bearer tokens
///
/// Holds the derived signing keys and the token lifetime. Cheap to clone;
/// both operations take `&self` and are safe to call concurrently.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl_secs: u64,
}

impl TokenService {
    /// Create a token service from a signing secret
    ///
    /// # Arguments
    /// * `secret` - HMAC signing secret shared by all server instances
    /// * `ttl_secs` - Lifetime of issued tokens in seconds
    pub fn new(secret: &str, ttl_secs: u64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_ref()),
            decoding: DecodingKey::from_secret(secret.as_ref()),
            ttl_secs,
        }
    }

    /// Issue a signed token for a subject
    ///
    /// # Arguments
    /// * `subject` - User email embedded as the `sub` claim
    /// * `roles` - Role names embedded in the token
    ///
    /// # Returns
    /// Signed token string
    pub fn issue(
        &self,
        subject: &str,
        roles: Vec<String>,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let now = unix_now();

        let claims = Claims {
            sub: subject.to_string(),
            roles,
            iat: now,
            exp: now + self.ttl_secs,
        };

        encode(&Header::default(), &claims, &self.encoding)
    }

    /// Verify and decode a token
    ///
    /// Expiry is checked against the current time with no clock-skew
    /// allowance: a token is rejected from the moment `exp` is reached.
    ///
    /// # Arguments
    /// * `token` - Token string as presented by the client
    ///
    /// # Returns
    /// Decoded claims, or the reason validation failed
    pub fn validate(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::default();
        // Expiry is enforced manually below; the library check keeps a
        // leeway window we do not want.
        validation.validate_exp = false;

        let token_data =
            decode::<Claims>(token, &self.decoding, &validation).map_err(|err| {
                match err.kind() {
                    jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                        TokenError::SignatureInvalid
                    }
                    _ => TokenError::Malformed,
                }
            })?;

        if unix_now() >= token_data.claims.exp {
            return Err(TokenError::Expired);
        }

        Ok(token_data.claims)
    }
}

/// Current Unix timestamp in seconds
fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs()
}
