/**
 * Server Initialization
 *
 * This module handles the initialization and setup of the Axum HTTP
 * server: configuration intake, database loading, service construction,
 * and route configuration.
 *
 * # Initialization Process
 *
 * The server initialization follows these steps:
 * 1. Open the database pool and run migrations
 * 2. Build the token service from the signing secret
 * 3. Build the enrollment engine over the pool
 * 4. Build the federated provider client if configured
 * 5. Create and configure the router
 *
 * # Background Tasks
 *
 * A periodic task releases idle enrollment key locks so the lock map
 * does not grow with every user/course pair ever written.
 */

use axum::Router;

use crate::auth::federated::FederatedProvider;
use crate::auth::tokens::TokenService;
use crate::enrollment::engine::EnrollmentEngine;
use crate::routes::router::create_router;
use crate::server::config::{load_database, ServerConfig};
use crate::server::state::AppState;

/// Create and configure the Axum application
///
/// # Arguments
///
/// * `config` - Validated server configuration
///
/// # Returns
///
/// Configured Axum Router ready to serve requests, or the database
/// error that prevented startup
///
/// # Initialization Steps
///
/// 1. **Database**: Opens the pool and runs migrations
/// 2. **Token Service**: Builds signing/validation keys from the secret
/// 3. **Enrollment Engine**: Wraps the pool with per-key write locks
/// 4. **Federated Provider**: Built only when configured
/// 5. **Router**: Configures all routes, the auth gate, and CORS
///
/// # Error Handling
///
/// The database is required: a connection or migration failure aborts
/// startup. The federated provider is optional and its absence only
/// disables the callback endpoint.
pub async fn create_app(config: ServerConfig) -> Result<Router, sqlx::Error> {
    tracing::info!("Initializing learnhub backend server");

    // Step 1: Open the database pool and run migrations
    let pool = load_database(&config.database_url).await?;

    // Step 2: Token service shared by login and the auth gate
    let tokens = TokenService::new(&config.jwt_secret, config.token_ttl_secs);

    // Step 3: Enrollment engine over the same pool
    let engine = EnrollmentEngine::new(pool.clone());

    // Step 4: Federated provider, only when configured
    let provider = config.provider.map(FederatedProvider::new);
    if provider.is_none() {
        tracing::warn!("No federated provider configured. Federated login will answer 503.");
    }

    tracing::info!("Services initialized");

    // Step 5: Create app state
    let app_state = AppState {
        pool,
        tokens,
        engine,
        provider,
        frontend_url: config.frontend_url,
    };

    // Step 6: Create router with all routes
    let app = create_router(app_state.clone());

    // Step 7: Start periodic cleanup task for idle enrollment locks
    let cleanup_engine = app_state.engine.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(std::time::Duration::from_secs(300)); // 5 minutes
        loop {
            interval.tick().await;
            cleanup_engine.release_idle_locks();
            tracing::debug!("Released idle enrollment key locks");
        }
    });

    tracing::info!("Router configured with periodic cleanup task");

    Ok(app)
}
