//! Integration tests for redirect chasing against a mock upstream.

mod helpers;

use std::time::Duration;

use helpers::test_config;
use link_resolver::{Config, ResolutionMethod, ResolveError, Resolver};
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

/// Answers `/hop/<n>` with a 301 to `/hop/<n+1>` until `last`, then 200.
struct HopResponder {
    base: String,
    last: usize,
}

impl Respond for HopResponder {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let n: usize = request
            .url
            .path()
            .trim_start_matches("/hop/")
            .parse()
            .unwrap_or(0);
        if n >= self.last {
            ResponseTemplate::new(200).set_body_string("end of chain")
        } else {
            ResponseTemplate::new(301).insert_header("Location", format!("{}/hop/{}", self.base, n + 1))
        }
    }
}

fn resolver(config: &Config) -> Resolver {
    Resolver::from_config(config).expect("resolver should build")
}

#[tokio::test]
async fn test_no_redirect_returns_input() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("hello"))
        .mount(&server)
        .await;

    let input = format!("{}/", server.uri());
    let result = resolver(&test_config()).resolve(&input).await.unwrap();

    assert_eq!(result.original_url, input);
    assert_eq!(result.final_url, input);
    assert!(!result.redirected);
    assert_eq!(result.redirect_count, 0);
    assert_eq!(result.status_code, 200);
    assert_eq!(result.method, ResolutionMethod::StandardRedirect);
}

#[tokio::test]
async fn test_single_301_is_followed() {
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
        .respond_with(ResponseTemplate::new(200).set_body_string("page"))
        .mount(&server)
        .await;

    let result = resolver(&test_config())
        .resolve(&format!("{}/short", server.uri()))
        .await
        .unwrap();

    assert_eq!(result.final_url, format!("{}/page", server.uri()));
    assert!(result.redirected);
    assert_eq!(result.redirect_count, 1);
    assert_eq!(result.status_code, 200);
}

#[tokio::test]
async fn test_relative_location_is_resolved_against_current_url() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/a/b"))
        .respond_with(ResponseTemplate::new(302).insert_header("Location", "../c?x=1"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/c"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let result = resolver(&test_config())
        .resolve(&format!("{}/a/b", server.uri()))
        .await
        .unwrap();

    assert_eq!(result.final_url, format!("{}/c?x=1", server.uri()));
    assert_eq!(result.redirect_count, 1);
}

#[tokio::test]
async fn test_chain_longer_than_max_hops_stops_at_limit() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path_regex(r"^/hop/\d+$"))
        .respond_with(HopResponder {
            base: server.uri(),
            last: 11,
        })
        .mount(&server)
        .await;

    let result = resolver(&test_config())
        .resolve(&format!("{}/hop/0", server.uri()))
        .await
        .unwrap();

    assert_eq!(result.final_url, format!("{}/hop/10", server.uri()));
    assert_eq!(result.redirect_count, 10);
    assert_eq!(result.status_code, 301);
    assert!(result.redirected);
}

#[tokio::test]
async fn test_custom_max_hops() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path_regex(r"^/hop/\d+$"))
        .respond_with(HopResponder {
            base: server.uri(),
            last: 5,
        })
        .mount(&server)
        .await;

    let config = Config {
        max_hops: 2,
        ..test_config()
    };
    let result = resolver(&config)
        .resolve(&format!("{}/hop/0", server.uri()))
        .await
        .unwrap();
    assert_eq!(result.final_url, format!("{}/hop/2", server.uri()));
    assert_eq!(result.redirect_count, 2);
}

#[tokio::test]
async fn test_redirect_without_location_stops() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(302))
        .mount(&server)
        .await;

    let input = format!("{}/broken", server.uri());
    let result = resolver(&test_config()).resolve(&input).await.unwrap();
    assert_eq!(result.final_url, input);
    assert_eq!(result.status_code, 302);
    assert_eq!(result.redirect_count, 0);
    assert!(!result.redirected);
}

#[tokio::test]
async fn test_meta_refresh_interstitial_is_scraped() {
    let server = MockServer::start().await;
    let body = format!(
        r#"<html><head><meta http-equiv="refresh" content="0;url={}/dest"></head><body>Redirecting</body></html>"#,
        server.uri()
    );
    Mock::given(method("GET"))
        .and(path("/interstitial"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/html; charset=utf-8"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/dest"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("<html>final</html>", "text/html"))
        .mount(&server)
        .await;

    let input = format!("{}/interstitial", server.uri());
    let result = resolver(&test_config()).resolve(&input).await.unwrap();
    assert_eq!(result.final_url, format!("{}/dest", server.uri()));
    assert_eq!(result.redirect_count, 1);
    assert_eq!(result.status_code, 200);

    let no_scrape = Config {
        scrape: false,
        ..test_config()
    };
    let result = resolver(&no_scrape).resolve(&input).await.unwrap();
    assert_eq!(result.final_url, input);
    assert_eq!(result.redirect_count, 0);
}

#[tokio::test]
async fn test_script_redirect_is_scraped() {
    let server = MockServer::start().await;
    let body = format!(
        r#"<html><script>window.location.href = "{}/dest";</script></html>"#,
        server.uri()
    );
    Mock::given(method("GET"))
        .and(path("/js"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/html"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/dest"))
        .respond_with(ResponseTemplate::new(200).set_body_string("final"))
        .mount(&server)
        .await;

    let result = resolver(&test_config())
        .resolve(&format!("{}/js", server.uri()))
        .await
        .unwrap();
    assert_eq!(result.final_url, format!("{}/dest", server.uri()));
    assert_eq!(result.redirect_count, 1);
}

#[tokio::test]
async fn test_non_html_200_is_not_scraped() {
    let server = MockServer::start().await;
    let body = format!(r#"{{"url":"{}/dest"}}"#, server.uri());
    Mock::given(method("GET"))
        .and(path("/api"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "application/json"))
        .mount(&server)
        .await;

    let input = format!("{}/api", server.uri());
    let result = resolver(&test_config()).resolve(&input).await.unwrap();
    assert_eq!(result.final_url, input);
    assert_eq!(result.redirect_count, 0);
}

#[tokio::test]
async fn test_failure_on_first_hop_is_an_error() {
    // Port 1 is reserved and nothing listens on it
    let err = resolver(&test_config())
        .resolve("http://127.0.0.1:1/")
        .await
        .unwrap_err();
    assert!(matches!(err, ResolveError::Network(_)));
    assert!(!err.is_client_error());
}

#[tokio::test]
async fn test_failure_after_progress_returns_partial_chain() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/start"))
        .respond_with(ResponseTemplate::new(301).insert_header("Location", "http://127.0.0.1:1/gone"))
        .mount(&server)
        .await;

    let result = resolver(&test_config())
        .resolve(&format!("{}/start", server.uri()))
        .await
        .unwrap();
    assert_eq!(result.final_url, "http://127.0.0.1:1/gone");
    assert_eq!(result.redirect_count, 1);
    assert_eq!(result.status_code, 301);
}

#[tokio::test]
async fn test_requests_carry_configured_user_agent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .and(wiremock::matchers::header("user-agent", "link_resolver_test/1.0"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    resolver(&test_config())
        .resolve(&format!("{}/", server.uri()))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_slow_final_hop_completes_within_request_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/a"))
        .respond_with(ResponseTemplate::new(301).insert_header("Location", format!("{}/b", server.uri())))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/b"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("slow page")
                .set_delay(Duration::from_millis(1500)),
        )
        .mount(&server)
        .await;

    let config = Config {
        timeout_seconds: 3,
        ..test_config()
    };
    let result = resolver(&config)
        .resolve(&format!("{}/a", server.uri()))
        .await
        .unwrap();

    assert_eq!(result.final_url, format!("{}/b", server.uri()));
    assert_eq!(result.redirect_count, 1);
    assert_eq!(result.status_code, 200);
}

#[tokio::test]
async fn test_hop_timeout_after_progress_keeps_partial_chain() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/a"))
        .respond_with(ResponseTemplate::new(301).insert_header("Location", format!("{}/b", server.uri())))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/b"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
        .mount(&server)
        .await;

    let config = Config {
        timeout_seconds: 1,
        ..test_config()
    };
    let result = resolver(&config)
        .resolve(&format!("{}/a", server.uri()))
        .await
        .expect("a timed out hop after progress still yields the chain");

    assert_eq!(result.final_url, format!("{}/b", server.uri()));
    assert_eq!(result.redirect_count, 1);
    assert_eq!(result.status_code, 301);
    assert!(result.redirected);
}

#[tokio::test]
async fn test_cycle_mixing_redirects_and_scrapes_stops_at_hop_limit() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/a"))
        .respond_with(ResponseTemplate::new(302).insert_header("Location", format!("{}/b", server.uri())))
        .mount(&server)
        .await;
    let body = format!(
        r#"<html><head><meta http-equiv="refresh" content="0;url={}/a"></head></html>"#,
        server.uri()
    );
    Mock::given(method("GET"))
        .and(path("/b"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/html"))
        .mount(&server)
        .await;

    let input = format!("{}/a", server.uri());
    let result = tokio::time::timeout(Duration::from_secs(30), resolver(&test_config()).resolve(&input))
        .await
        .expect("cyclic chain should terminate")
        .unwrap();

    assert_eq!(result.redirect_count, 10);
    assert_eq!(result.final_url, input);
    assert_eq!(result.status_code, 302);
    assert_eq!(result.redirected, result.final_url != result.original_url);
    assert!(!result.redirected);
}
