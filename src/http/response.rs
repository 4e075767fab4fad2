//! HTTP response building module
//!
//! Provides builders for the responses this service sends, decoupled from
//! the lookup logic.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use serde::Serialize;

use crate::logger;

/// JSON body of every error response
#[derive(Debug, Serialize)]
pub struct ErrorBody<'a> {
    pub message: &'a str,
}

/// Build a JSON response
///
/// Bodies are compact JSON terminated by a newline.
pub fn build_json_response<T: Serialize + ?Sized>(
    status: StatusCode,
    body: &T,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let mut json = match serde_json::to_vec(body) {
        Ok(j) => j,
        Err(e) => {
            logger::log_error(&format!("Failed to serialize response: {e}"));
            let mut response = Response::new(Full::new(Bytes::new()));
            *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
            return response;
        }
    };
    json.push(b'\n');

    let content_length = json.len();
    let body = if is_head {
        Bytes::new()
    } else {
        Bytes::from(json)
    };

    Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .header("Content-Length", content_length)
        .body(Full::new(body))
        .unwrap_or_else(|e| {
            log_build_error(status.as_str(), &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build 404 response for unknown endpoints
pub fn build_not_found_json() -> Response<Full<Bytes>> {
    build_json_response(
        StatusCode::NOT_FOUND,
        &ErrorBody {
            message: "endpoint not found",
        },
        false,
    )
}

/// Build 500 response carrying a short, client-safe message
pub fn build_500_response(message: &str) -> Response<Full<Bytes>> {
    build_json_response(StatusCode::INTERNAL_SERVER_ERROR, &ErrorBody { message }, false)
}

/// Build 404 response for missing static files
pub fn build_file_not_found_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::NOT_FOUND)
        .header("Content-Type", "text/plain; charset=utf-8")
        .body(Full::new(Bytes::from("404 page not found\n")))
        .unwrap_or_else(|e| {
            log_build_error("404", &e);
            Response::new(Full::new(Bytes::from("404 page not found\n")))
        })
}

/// Build 304 Not Modified response
pub fn build_304_response(etag: &str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::NOT_MODIFIED)
        .header("ETag", etag)
        .header("Cache-Control", "public, max-age=3600")
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| {
            log_build_error("304", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build a static file response with cache validators
pub fn build_cached_response(
    data: Bytes,
    content_type: &str,
    etag: &str,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let content_length = data.len();
    let body = if is_head { Bytes::new() } else { data };

    Response::builder()
        .status(StatusCode::OK)
        .header("Content-Type", content_type)
        .header("Content-Length", content_length)
        .header("ETag", etag)
        .header("Cache-Control", "public, max-age=3600")
        .body(Full::new(body))
        .unwrap_or_else(|e| {
            log_build_error("200", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    logger::log_error(&format!("Failed to build {status} response: {error}"));
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_string(response: Response<Full<Bytes>>) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_not_found_json() {
        let response = build_not_found_json();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(response.headers()["Content-Type"], "application/json");
        assert_eq!(
            body_string(response).await,
            "{\"message\":\"endpoint not found\"}\n"
        );
    }

    #[tokio::test]
    async fn test_json_null_body() {
        let response = build_json_response(StatusCode::OK, &Option::<u8>::None, false);
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, "null\n");
    }

    #[tokio::test]
    async fn test_head_keeps_length_drops_body() {
        let response = build_json_response(StatusCode::OK, &[1, 2, 3], true);
        assert_eq!(response.headers()["Content-Length"], "8");
        assert_eq!(body_string(response).await, "");
    }

    #[tokio::test]
    async fn test_500_message() {
        let response = build_500_response("failed to resolve logo");
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.headers()["Content-Type"], "application/json");
        assert_eq!(response.headers()["Content-Length"], "37");
        assert_eq!(
            body_string(response).await,
            "{\"message\":\"failed to resolve logo\"}\n"
        );
    }
}
