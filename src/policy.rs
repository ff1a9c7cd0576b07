/**
 * Authorization Policy
 *
 * Route access comes in three levels:
 *
 * - **public**: no identity required; the handler takes no extractor.
 * - **authenticated**: any valid identity; the handler takes `AuthUser`.
 * - **owner-only**: the caller must own the resource; the handler fetches
 *   the resource and calls `require_owner`.
 *
 * # Check Ordering
 *
 * Owner-only checks verify existence before ownership. An absent resource
 * is `NotFound` no matter who asks; a present resource owned by someone
 * else is `Forbidden`. Checking ownership first would answer "does this
 * resource exist?" differently depending on the caller.
 */

use thiserror::Error;

use crate::middleware::auth::AuthenticatedUser;

/// Authorization decision failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PolicyError {
    /// The resource does not exist
    #[error("Resource not found")]
    NotFound,
    /// The resource exists but belongs to someone else
    #[error("Access denied")]
    Forbidden,
}

/// Require that the caller owns the resource
///
/// # Arguments
///
/// * `owner` - The owning user's email, or `None` when the resource does
///   not exist
/// * `who` - The authenticated caller
///
/// # Errors
///
/// * `PolicyError::NotFound` - The resource does not exist
/// * `PolicyError::Forbidden` - The resource is owned by another user
pub fn require_owner(owner: Option<&str>, who: &AuthenticatedUser) -> Result<(), PolicyError> {
    let owner = owner.ok_or(PolicyError::NotFound)?;

    if owner != who.email {
        return Err(PolicyError::Forbidden);
    }

    Ok(())
}
