/**
 * Application State Management
 *
 * This module defines the application state structure and implements
 * the necessary `FromRef` traits for Axum state extraction.
 *
 * # Architecture
 *
 * The `AppState` struct serves as the central state container for the
 * application, holding:
 * - The SQLite connection pool
 * - The token service (signing and validation keys)
 * - The enrollment engine
 * - The optional federated identity provider
 * - The frontend origin for redirects
 *
 * # Thread Safety
 *
 * Every field is cheaply cloneable and safe to share across handlers:
 * the pool and the engine clone handles to shared internals, the token
 * service clones its keys, and the provider clones a reqwest client
 * handle.
 *
 * # State Extraction
 *
 * The `FromRef` implementations allow Axum handlers to extract specific
 * parts of the state without needing the entire `AppState`. This follows
 * Axum's recommended pattern for state management.
 */

use axum::extract::FromRef;
use sqlx::SqlitePool;

use crate::auth::federated::FederatedProvider;
use crate::auth::tokens::TokenService;
use crate::enrollment::engine::EnrollmentEngine;

/// Application state shared across all request handlers
///
/// # Fields
///
/// * `pool` - SQLite connection pool
/// * `tokens` - Token signing and validation service
/// * `engine` - Enrollment consistency engine
/// * `provider` - Federated identity provider, `None` when not configured
/// * `frontend_url` - Frontend origin used for CORS and federated redirects
#[derive(Clone)]
pub struct AppState {
    /// SQLite connection pool
    pub pool: SqlitePool,

    /// Token signing and validation service
    pub tokens: TokenService,

    /// Enrollment consistency engine
    ///
    /// Owns the per-key locks that serialize enrollment writes. Handlers
    /// go through the engine for writes, never through the store.
    pub engine: EnrollmentEngine,

    /// Federated identity provider
    ///
    /// This is `None` when the `OAUTH_*` variables are not set. The
    /// callback handler answers 503 in that case; password login is
    /// unaffected.
    pub provider: Option<FederatedProvider>,

    /// Frontend origin, the target of federated login redirects
    pub frontend_url: String,
}

/// Implement FromRef for SqlitePool
///
/// This allows handlers that only touch rows to take `State(SqlitePool)`
/// directly instead of the whole `AppState`.
///
/// # Example
///
/// ```rust
/// use axum::extract::State;
/// use sqlx::SqlitePool;
///
/// async fn handler(State(pool): State<SqlitePool>) {
///     // Query the pool
/// }
/// ```
impl FromRef<AppState> for SqlitePool {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.pool.clone()
    }
}

/// Implement FromRef for TokenService
///
/// This allows the login handler to extract the token service directly.
impl FromRef<AppState> for TokenService {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.tokens.clone()
    }
}

/// Implement FromRef for EnrollmentEngine
///
/// This allows enrollment handlers to extract the engine directly.
impl FromRef<AppState> for EnrollmentEngine {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.engine.clone()
    }
}
