//! HTTP router.

use axum::{Router, middleware as axum_middleware, routing::get};
use tower_http::trace::TraceLayer;

use crate::{handlers, middleware, state::AppState};

/// Build the application router.
///
/// Handlers read the peer address through `ConnectInfo<SocketAddr>`, so the
/// router must be served with `into_make_service_with_connect_info`.
pub fn build_router(state: AppState) -> Router {
    // Catalog routes, guarded by the API key in the path
    let protected_routes = Router::new()
        .route("/api/{key}/movies", get(handlers::catalog::list_movies))
        .route("/api/{key}/mangas", get(handlers::catalog::list_mangas))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::require_api_key,
        ));

    Router::new()
        // Public routes
        .route("/", get(handlers::docs::documentation))
        .route("/health", get(handlers::health::health_check))
        .route("/keys", get(handlers::keys::issue_key))
        .route("/keys/mine", get(handlers::keys::list_keys))
        .merge(protected_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
