//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /{short_url}` - Redirect to the long URL
//! - `GET  /health`      - Storage health check
//! - `/api/*`            - URL record REST API
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Rate limiting** - Per-IP token bucket (proxy-aware when configured)
//! - **Path normalization** - Trailing slashes are trimmed, so `/api/urls/`
//!   and `/api/urls` reach the same handler

use crate::api;
use crate::api::handlers::{health_handler, redirect_handler};
use crate::api::middleware::{rate_limit, tracing};
use crate::state::AppState;
use axum::Router;
use axum::routing::get;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/{short_url}", get(redirect_handler))
        .route("/health", get(health_handler))
}

/// Routes and state without rate limiting or path normalization.
///
/// Used directly by handler tests, which have no peer address to key
/// rate limits on.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(public_routes())
        .nest("/api", api::routes::url_routes())
        .with_state(state)
}

/// Constructs the production router with all middleware.
///
/// # Arguments
///
/// - `state` - shared application state injected into all handlers
/// - `behind_proxy` - when `true`, rate limiting reads the client IP from
///   forwarding headers instead of the peer socket address; enable only
///   behind a trusted reverse proxy
pub fn app_router(state: AppState, behind_proxy: bool) -> NormalizePath<Router> {
    let (public, api) = if behind_proxy {
        (
            public_routes().layer(rate_limit::proxied_layer()),
            api::routes::url_routes().layer(rate_limit::proxied_secure_layer()),
        )
    } else {
        (
            public_routes().layer(rate_limit::layer()),
            api::routes::url_routes().layer(rate_limit::secure_layer()),
        )
    };

    let router = Router::new()
        .merge(public)
        .nest("/api", api)
        .with_state(state)
        .layer(tracing::layer());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}
