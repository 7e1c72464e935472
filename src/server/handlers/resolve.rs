//! Resolve endpoint.

use axum::body::Bytes;
use axum::extract::{RawQuery, State};
use axum::response::{IntoResponse, Response};
use axum::Json;

use super::super::types::{ApiError, ServerState};
use super::{url_from_body, url_from_query};
use crate::error_handling::InputError;

/// `GET /?url=...`
pub async fn resolve_get(State(state): State<ServerState>, RawQuery(query): RawQuery) -> Response {
    resolve(&state, url_from_query(query.as_deref())).await
}

/// `POST /` with `{"url": "..."}`
pub async fn resolve_post(State(state): State<ServerState>, body: Bytes) -> Response {
    match url_from_body(&body) {
        Ok(url) => resolve(&state, url).await,
        Err(e) => ApiError::from(e).into_response(),
    }
}

async fn resolve(state: &ServerState, url: Option<String>) -> Response {
    let Some(url) = url else {
        return ApiError::from(InputError::MissingUrl).into_response();
    };

    match state.resolver.resolve(&url).await {
        Ok(result) => {
            log::info!(
                "Resolved {} -> {} ({}, {} hops)",
                result.original_url,
                result.final_url,
                result.method,
                result.redirect_count
            );
            Json(result).into_response()
        }
        Err(e) => {
            if e.is_client_error() {
                log::debug!("Rejected resolve request for {}: {}", url, e);
            } else {
                log::error!("Failed to resolve {}: {}", url, e);
            }
            ApiError::from(e).into_response()
        }
    }
}
