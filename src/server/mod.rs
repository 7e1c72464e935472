//! HTTP front end.
//!
//! Provides these endpoints:
//! - `/` and `/resolve` - resolve a URL (GET `?url=`, POST `{"url": ...}`)
//! - `/fetch` - fetch a URL's raw content
//! - `/health` - liveness check
//!
//! Every response, preflights included, carries permissive CORS headers.

mod handlers;
mod types;

use axum::http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
};
use axum::http::HeaderValue;
use axum::routing::get;
use axum::Router;
use tower_http::set_header::SetResponseHeaderLayer;

use crate::config::{CORS_ALLOW_HEADERS, CORS_ALLOW_METHODS, CORS_ALLOW_ORIGIN};
use handlers::{fetch_get, fetch_post, health, preflight, resolve_get, resolve_post};
pub use types::{ApiError, ErrorResponse, ServerState};

/// Builds the router with CORS headers on every response.
pub fn create_router(state: ServerState) -> Router {
    let resolve = get(resolve_get).post(resolve_post).options(preflight);

    Router::new()
        .route("/", resolve.clone())
        .route("/resolve", resolve)
        .route(
            "/fetch",
            get(fetch_get).post(fetch_post).options(preflight),
        )
        .route("/health", get(health))
        .layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static(CORS_ALLOW_ORIGIN),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(CORS_ALLOW_METHODS),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(CORS_ALLOW_HEADERS),
        ))
        .with_state(state)
}

/// Serves the router on `listen` until Ctrl-C.
pub async fn start_server(listen: &str, state: ServerState) -> Result<(), anyhow::Error> {
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(listen)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind server to {}: {}", listen, e))?;

    log::info!("Listening on http://{}/", listen);
    log::info!("  - Resolve: http://{}/?url=...", listen);
    log::info!("  - Fetch: http://{}/fetch?url=...", listen);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                log::error!("Failed to listen for Ctrl-C: {}", e);
            }
            log::info!("Shutting down");
        })
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    Ok(())
}
