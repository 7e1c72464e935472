//! Integration tests for the HTTP front end, driven through `tower::ServiceExt::oneshot`.

mod helpers;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use helpers::{article_url, test_config};
use link_resolver::fetch::{ContentFetcher, FixedHeaders};
use link_resolver::initialization::init_client;
use link_resolver::{create_router, Resolver, ServerState};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const DEST: &str = "https://publisher.example/2024/05/story.html";

/// Router with a 1ms retry factor so fetch retries don't slow the suite down.
fn app() -> Router {
    let config = test_config();
    let resolver = Resolver::from_config(&config).unwrap();
    let fetcher = ContentFetcher::new(
        init_client(&config).unwrap(),
        Arc::new(FixedHeaders::new("link_resolver_test/1.0")),
        1,
    );
    create_router(ServerState::new(resolver, fetcher))
}

fn encode(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

async fn send(request: Request<Body>) -> (StatusCode, axum::http::HeaderMap, Value) {
    let response = app().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    (status, headers, json)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn assert_cors(headers: &axum::http::HeaderMap) {
    assert_eq!(headers.get("access-control-allow-origin").unwrap(), "*");
    assert_eq!(
        headers.get("access-control-allow-methods").unwrap(),
        "GET, POST, OPTIONS"
    );
    assert_eq!(
        headers.get("access-control-allow-headers").unwrap(),
        "Content-Type"
    );
}

#[tokio::test]
async fn test_missing_url_is_bad_request() {
    let (status, headers, body) = send(get("/")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("Missing 'url' parameter"));
    assert_cors(&headers);

    let (status, _, _) = send(post_json("/resolve", "{}")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unsupported_scheme_is_bad_request() {
    let (status, _, body) = send(get(&format!("/?url={}", encode("ftp://example.com")))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("ftp"));
}

#[tokio::test]
async fn test_invalid_url_is_bad_request() {
    let (status, _, _) = send(get(&format!("/?url={}", encode("not a url")))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_invalid_json_is_bad_request() {
    let (status, headers, body) = send(post_json("/", "{not json")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid JSON in request body");
    assert_cors(&headers);
}

#[tokio::test]
async fn test_preflight_carries_cors_headers() {
    for uri in ["/", "/resolve", "/fetch"] {
        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        let (status, headers, _) = send(request).await;
        assert!(status.is_success(), "preflight for {uri} returned {status}");
        assert_cors(&headers);
    }
}

#[tokio::test]
async fn test_article_resolves_via_get() {
    let input = article_url(DEST.as_bytes());
    let (status, headers, body) = send(get(&format!("/?url={}", encode(&input)))).await;

    assert_eq!(status, StatusCode::OK);
    assert_cors(&headers);
    assert_eq!(body["original_url"], input);
    assert_eq!(body["final_url"], DEST);
    assert_eq!(body["method"], "google_news_decode");
    assert_eq!(body["redirect_count"], 1);
    assert_eq!(body["status_code"], 200);
    assert_eq!(body["redirected"], true);
}

#[tokio::test]
async fn test_redirect_resolves_via_post() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/short"))
        .respond_with(
            ResponseTemplate::new(301).insert_header("Location", format!("{}/page", server.uri())),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/page"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let payload = serde_json::json!({ "url": format!("{}/short", server.uri()) }).to_string();
    let (status, _, body) = send(post_json("/resolve", &payload)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["final_url"], format!("{}/page", server.uri()));
    assert_eq!(body["method"], "standard_redirect");
    assert_eq!(body["redirect_count"], 1);
}

#[tokio::test]
async fn test_unreachable_target_is_server_error() {
    let (status, _, body) = send(get(&format!("/?url={}", encode("http://127.0.0.1:1/")))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().contains("127.0.0.1:1"));
}

#[tokio::test]
async fn test_health() {
    let (status, headers, body) = send(get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::String("ok".to_string()));
    assert_cors(&headers);
}

#[tokio::test]
async fn test_fetch_json_content() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/data"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(r#"{"a":1}"#, "application/json"))
        .mount(&server)
        .await;

    let target = format!("{}/data", server.uri());
    let (status, _, body) = send(get(&format!("/fetch?url={}", encode(&target)))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["content_type"], "application/json");
    assert_eq!(body["content"], serde_json::json!({ "a": 1 }));
    assert_eq!(body["status"], 200);
    assert!(body.get("encoding").is_none());
}

#[tokio::test]
async fn test_fetch_text_and_binary_content() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/page"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("<p>hi</p>", "text/html"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/image"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(vec![0u8, 1, 2, 255], "image/png"))
        .mount(&server)
        .await;

    let page = format!("{}/page", server.uri());
    let (_, _, body) = send(post_json("/fetch", &serde_json::json!({ "url": page }).to_string())).await;
    assert_eq!(body["content"], "<p>hi</p>");
    assert_eq!(body["content_type"], "text/html");

    let image = format!("{}/image", server.uri());
    let (_, _, body) = send(get(&format!("/fetch?url={}", encode(&image)))).await;
    assert_eq!(body["encoding"], "base64");
    assert_eq!(body["content"], "AAEC/w==");
}

#[tokio::test]
async fn test_fetch_malformed_json_reports_processing_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("{oops", "application/json"))
        .mount(&server)
        .await;

    let target = format!("{}/broken", server.uri());
    let (status, _, body) = send(get(&format!("/fetch?url={}", encode(&target)))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], false);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("Failed to process content: "));
}

#[tokio::test]
async fn test_fetch_retries_blocked_responses() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/guarded"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .with_priority(1)
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/guarded"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("let in", "text/plain"))
        .expect(1)
        .mount(&server)
        .await;

    let target = format!("{}/guarded", server.uri());
    let (status, _, body) = send(get(&format!("/fetch?url={}", encode(&target)))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["content"], "let in");
}

#[tokio::test]
async fn test_fetch_persistent_block_reports_upstream_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/wall"))
        .respond_with(ResponseTemplate::new(403))
        .expect(3)
        .mount(&server)
        .await;

    let target = format!("{}/wall", server.uri());
    let (status, _, body) = send(get(&format!("/fetch?url={}", encode(&target)))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "HTTP 403: Forbidden");
    assert_eq!(body["status"], 403);
    assert_eq!(body["url"], target);
}

#[tokio::test]
async fn test_fetch_not_found_is_passed_through() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_raw("nope", "text/plain"))
        .expect(1)
        .mount(&server)
        .await;

    let target = format!("{}/missing", server.uri());
    let (status, _, body) = send(get(&format!("/fetch?url={}", encode(&target)))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], 404);
    assert_eq!(body["content"], "nope");
}

#[tokio::test]
async fn test_fetch_rejects_bad_input() {
    let (status, _, _) = send(get("/fetch")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _, _) = send(get(&format!("/fetch?url={}", encode("ftp://example.com")))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
