//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: CORS preflight, route matching,
//! dispatching, and access logging.

use crate::config::AppState;
use crate::handler::{lookup, static_files};
use crate::http::{self, cors};
use crate::logger::{self, AccessLogEntry};
use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::header::{HeaderName, IF_NONE_MATCH, REFERER, USER_AGENT};
use hyper::http::request::Parts;
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// Path prefix of the static logo route
pub const LOGO_PREFIX: &str = "/logo/";

/// Request context encapsulating information needed for request processing
#[derive(Debug)]
pub struct RequestContext<'a> {
    pub path: &'a str,
    pub query: Option<&'a str>,
    pub is_head: bool,
    pub if_none_match: Option<&'a str>,
}

impl<'a> RequestContext<'a> {
    fn from_parts(parts: &'a Parts) -> Self {
        Self {
            path: parts.uri.path(),
            query: parts.uri.query(),
            is_head: parts.method == Method::HEAD,
            if_none_match: parts
                .headers
                .get(IF_NONE_MATCH)
                .and_then(|v| v.to_str().ok()),
        }
    }
}

/// Main entry point for HTTP request handling
///
/// Request bodies are never read, so any body type is accepted.
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();
    let (parts, _) = req.into_parts();

    let mut response = if cors::is_preflight(&parts.method, &parts.headers) {
        cors::build_preflight_response(&parts.headers)
    } else {
        route_request(&RequestContext::from_parts(&parts), &state).await
    };
    cors::apply_cors(&mut response);

    if state.config.logging.access_log {
        log_access(&parts, &response, peer_addr, started, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Route request based on path
async fn route_request(ctx: &RequestContext<'_>, state: &AppState) -> Response<Full<Bytes>> {
    if ctx.path == "/" {
        return lookup::serve_lookup(ctx, state).await;
    }

    if let Some(requested) = ctx.path.strip_prefix(LOGO_PREFIX) {
        return static_files::serve_logo(ctx, state.logos.dir(), requested).await;
    }

    http::build_not_found_json()
}

fn log_access(
    parts: &Parts,
    response: &Response<Full<Bytes>>,
    peer_addr: SocketAddr,
    started: Instant,
    format: &str,
) {
    let header = |name: HeaderName| {
        parts
            .headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string)
    };

    let mut entry = AccessLogEntry::new(
        peer_addr.ip().to_string(),
        parts.method.to_string(),
        parts.uri.path().to_string(),
    );
    entry.query = parts.uri.query().map(ToString::to_string);
    entry.http_version = logger::version_label(parts.version);
    entry.status = response.status().as_u16();
    entry.body_bytes = response.body().size_hint().exact().unwrap_or(0);
    entry.referer = header(REFERER);
    entry.user_agent = header(USER_AGENT);
    entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);

    logger::log_access(&entry, format);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::tests::test_config;
    use crate::data::logo::LogoResolver;
    use crate::data::tests::{bank, scratch_dir};
    use crate::data::BankRecord;
    use http_body_util::{BodyExt, Empty};
    use hyper::StatusCode;
    use std::path::Path;

    fn peer() -> SocketAddr {
        "127.0.0.1:40000".parse().unwrap()
    }

    fn state_with(logo_dir: &Path, banks: Vec<BankRecord>) -> Arc<AppState> {
        Arc::new(AppState::new(test_config(), banks, LogoResolver::new(logo_dir)))
    }

    fn sample_banks() -> Vec<BankRecord> {
        vec![
            bank("Test Bank", "test-bank", "001", "*901#"),
            bank("Other Bank", "other-bank", "002", "*902#"),
        ]
    }

    fn logo_dir(name: &str) -> std::path::PathBuf {
        let dir = scratch_dir(name);
        std::fs::write(dir.join("test-bank.png"), b"test logo").unwrap();
        std::fs::write(dir.join("default-image.png"), b"default logo").unwrap();
        std::fs::write(dir.join(".DS_Store"), b"junk").unwrap();
        dir
    }

    async fn send(state: &Arc<AppState>, method: Method, uri: &str) -> Response<Full<Bytes>> {
        let req = Request::builder()
            .method(method)
            .uri(uri)
            .body(Empty::<Bytes>::new())
            .unwrap();
        handle_request(req, Arc::clone(state), peer()).await.unwrap()
    }

    async fn body_string(response: Response<Full<Bytes>>) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_lookup_by_slug() {
        let state = state_with(&logo_dir("router-slug"), sample_banks());
        let response = send(&state, Method::GET, "/?slug=test-bank").await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["Content-Type"], "application/json");
        assert_eq!(response.headers()["Access-Control-Allow-Origin"], "*");
        assert_eq!(
            body_string(response).await,
            "{\"name\":\"Test Bank\",\"slug\":\"test-bank\",\"code\":\"001\",\"ussd\":\"*901#\",\"logo\":\"http://localhost:8080/logo/test-bank.png\"}\n"
        );
    }

    #[tokio::test]
    async fn test_lookup_falls_back_to_default_logo() {
        let state = state_with(&logo_dir("router-default"), sample_banks());
        let response = send(&state, Method::GET, "/?code=002").await;

        let body: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(body["code"], "002");
        assert_eq!(body["logo"], "http://localhost:8080/logo/default-image.png");
    }

    #[tokio::test]
    async fn test_lookup_no_match_is_null() {
        let state = state_with(&logo_dir("router-null"), sample_banks());
        let response = send(&state, Method::GET, "/?code=001&slug=other-bank").await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, "null\n");
    }

    #[tokio::test]
    async fn test_lookup_undecodable_filters() {
        let state = state_with(&logo_dir("router-undecodable"), sample_banks());

        let response = send(&state, Method::GET, "/?code=%ff").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, "null\n");

        // Malformed escape: the pair is dropped, leaving no filter
        let response = send(&state, Method::GET, "/?code=%zz").await;
        let body: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(body.as_array().map(Vec::len), Some(2));
    }

    #[tokio::test]
    async fn test_lookup_all_in_load_order() {
        let state = state_with(&logo_dir("router-all"), sample_banks());
        let response = send(&state, Method::GET, "/").await;

        let body: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
        let list = body.as_array().unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0]["slug"], "test-bank");
        assert_eq!(list[1]["slug"], "other-bank");
        assert_eq!(list[1]["logo"], "http://localhost:8080/logo/default-image.png");
    }

    #[tokio::test]
    async fn test_lookup_empty_data_is_empty_array() {
        let state = state_with(&logo_dir("router-empty"), Vec::new());
        let response = send(&state, Method::GET, "/").await;
        assert_eq!(body_string(response).await, "[]\n");
    }

    #[tokio::test]
    async fn test_repeated_requests_identical() {
        let state = state_with(&logo_dir("router-idempotent"), sample_banks());
        let first = body_string(send(&state, Method::GET, "/").await).await;
        let second = body_string(send(&state, Method::GET, "/").await).await;
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_unreadable_logo_dir_fails_only_request() {
        let missing = scratch_dir("router-broken").join("gone");
        let state = state_with(&missing, sample_banks());

        let response = send(&state, Method::GET, "/?slug=test-bank").await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_string(response).await,
            "{\"message\":\"failed to resolve logo\"}\n"
        );

        // Nothing to decorate, nothing to list
        let response = send(&state, Method::GET, "/?slug=unknown").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, "null\n");
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let state = state_with(&logo_dir("router-unknown"), sample_banks());
        for uri in ["/nonexistent", "/logo", "/banks/test-bank"] {
            let response = send(&state, Method::GET, uri).await;
            assert_eq!(response.status(), StatusCode::NOT_FOUND, "{uri}");
            assert_eq!(response.headers()["Content-Type"], "application/json");
            assert_eq!(
                body_string(response).await,
                "{\"message\":\"endpoint not found\"}\n"
            );
        }
    }

    #[tokio::test]
    async fn test_serve_logo_file() {
        let state = state_with(&logo_dir("router-logo"), sample_banks());

        let response = send(&state, Method::GET, "/logo/test-bank.png").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["Content-Type"], "image/png");
        assert_eq!(response.headers()["Access-Control-Allow-Origin"], "*");
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&bytes[..], b"test logo");
    }

    #[tokio::test]
    async fn test_missing_logo_is_plain_404() {
        let state = state_with(&logo_dir("router-logo-404"), sample_banks());
        let response = send(&state, Method::GET, "/logo/zenith.png").await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            response.headers()["Content-Type"],
            "text/plain; charset=utf-8"
        );
    }

    #[tokio::test]
    async fn test_head_has_no_body() {
        let state = state_with(&logo_dir("router-head"), sample_banks());
        let response = send(&state, Method::HEAD, "/?slug=test-bank").await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_ne!(response.headers()["Content-Length"], "0");
        assert_eq!(body_string(response).await, "");
    }

    #[tokio::test]
    async fn test_preflight() {
        let state = state_with(&logo_dir("router-preflight"), sample_banks());
        let req = Request::builder()
            .method(Method::OPTIONS)
            .uri("/")
            .header("Origin", "https://example.com")
            .header("Access-Control-Request-Method", "GET")
            .body(Empty::<Bytes>::new())
            .unwrap();
        let response = handle_request(req, state, peer()).await.unwrap();

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert_eq!(response.headers()["Access-Control-Allow-Origin"], "*");
        assert_eq!(response.headers()["Access-Control-Allow-Methods"], "GET");
    }
}
