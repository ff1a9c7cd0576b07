/**
 * Router Configuration
 *
 * This module provides the main router creation function that combines
 * all route configurations into a single Axum router.
 *
 * # Assembly Order
 *
 * Layers wrap the routes registered before them, so the order matters:
 * 1. API routes (auth, users, courses, enrollments)
 * 2. Authentication gate (resolves bearer tokens to identities)
 * 3. CORS layer (answers preflight before the gate runs)
 * 4. Fallback handler (404)
 *
 * # Gate Placement
 *
 * The gate covers every API route but rejects nothing on its own except
 * invalid tokens: requests without credentials pass through anonymous,
 * and each handler decides through its extractors whether anonymous
 * access is allowed.
 */

use axum::http::{header, HeaderValue, Method};
use axum::Router;
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::middleware::auth::auth_gate;
use crate::routes::api_routes::configure_api_routes;
use crate::server::state::AppState;

/// Create the Axum router with all routes configured
///
/// This function sets up all HTTP routes for the application in the
/// following order:
///
/// 1. **API Routes**: Authentication, users, courses, enrollments
/// 2. **Authentication Gate**: Token resolution for every API route
/// 3. **CORS Layer**: Allows the configured frontend origin
/// 4. **Fallback Handler**: 404 errors
///
/// # Arguments
///
/// * `app_state` - Application state containing the pool and services
///
/// # Returns
///
/// Configured Axum Router ready to serve requests
pub fn create_router(app_state: AppState) -> Router<()> {
    // Start with the API routes
    let router = configure_api_routes(Router::new());

    // Resolve bearer tokens before any handler runs
    let router = router.layer(axum::middleware::from_fn_with_state(
        app_state.clone(),
        auth_gate,
    ));

    // Allow the browser frontend to call the API cross-origin
    let router = router.layer(cors_layer(&app_state.frontend_url));

    // Fallback handler for 404
    let router = router.fallback(|| async { "404 Not Found" });

    // Use AppState as router state
    router.with_state(app_state)
}

/// Build the CORS layer for the frontend origin
///
/// Allows exactly the configured origin with the methods and headers the
/// frontend uses. The `Authorization` header must be allowed or the
/// browser strips bearer tokens from cross-origin requests.
fn cors_layer(frontend_url: &str) -> CorsLayer {
    let origin = match HeaderValue::from_str(frontend_url) {
        Ok(value) => AllowOrigin::exact(value),
        Err(_) => {
            tracing::warn!(
                "FRONTEND_URL is not a valid origin value. Cross-origin requests will be denied."
            );
            AllowOrigin::list(Vec::new())
        }
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
}
