//! Raw content fetch endpoint.

use axum::body::Bytes;
use axum::extract::{RawQuery, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use super::super::types::{ApiError, ServerState};
use super::{url_from_body, url_from_query};
use crate::app::validate_url;
use crate::config::HTTP_STATUS_NOT_FOUND;
use crate::error_handling::InputError;
use crate::fetch::process_content;

/// `GET /fetch?url=...`
pub async fn fetch_get(State(state): State<ServerState>, RawQuery(query): RawQuery) -> Response {
    fetch(&state, url_from_query(query.as_deref())).await
}

/// `POST /fetch` with `{"url": "..."}`
pub async fn fetch_post(State(state): State<ServerState>, body: Bytes) -> Response {
    match url_from_body(&body) {
        Ok(url) => fetch(&state, url).await,
        Err(e) => ApiError::from(e).into_response(),
    }
}

async fn fetch(state: &ServerState, url: Option<String>) -> Response {
    let Some(url) = url else {
        return ApiError::from(InputError::MissingUrl).into_response();
    };
    let target = match validate_url(&url) {
        Ok(target) => target,
        Err(e) => return ApiError::from(e).into_response(),
    };

    let response = match state.fetcher.fetch(&target).await {
        Ok(response) => response,
        Err(e) => {
            return ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
                .with_url(target.as_str())
                .into_response();
        }
    };

    let status = response.status();
    if !status.is_success() && status.as_u16() != HTTP_STATUS_NOT_FOUND {
        log::info!("Upstream refused {}: {}", target, status);
        let message = match status.canonical_reason() {
            Some(reason) => format!("HTTP {}: {}", status.as_u16(), reason),
            None => format!("HTTP {}", status.as_u16()),
        };
        return ApiError::new(status, message)
            .with_url(target.as_str())
            .with_upstream_status(status.as_u16())
            .into_response();
    }

    Json(process_content(response, target.as_str()).await).into_response()
}
