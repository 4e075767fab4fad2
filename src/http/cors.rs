//! CORS module
//!
//! Blanket policy: every origin may call every route.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{
    HeaderMap, HeaderValue, ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
    ACCESS_CONTROL_ALLOW_ORIGIN, ACCESS_CONTROL_REQUEST_HEADERS, ACCESS_CONTROL_REQUEST_METHOD,
    VARY,
};
use hyper::{Method, Response, StatusCode};

use crate::logger;

/// A preflight is an OPTIONS request announcing the method it intends to use
pub fn is_preflight(method: &Method, headers: &HeaderMap) -> bool {
    method == Method::OPTIONS && headers.contains_key(ACCESS_CONTROL_REQUEST_METHOD)
}

/// Answer a preflight request, echoing back what the client asked for
pub fn build_preflight_response(headers: &HeaderMap) -> Response<Full<Bytes>> {
    let mut builder = Response::builder()
        .status(StatusCode::NO_CONTENT)
        .header(VARY, "Origin, Access-Control-Request-Method, Access-Control-Request-Headers");

    if let Some(method) = headers.get(ACCESS_CONTROL_REQUEST_METHOD) {
        builder = builder.header(ACCESS_CONTROL_ALLOW_METHODS, method);
    }
    if let Some(requested) = headers.get(ACCESS_CONTROL_REQUEST_HEADERS) {
        builder = builder.header(ACCESS_CONTROL_ALLOW_HEADERS, requested);
    }

    builder.body(Full::new(Bytes::new())).unwrap_or_else(|e| {
        logger::log_error(&format!("Failed to build preflight response: {e}"));
        Response::new(Full::new(Bytes::new()))
    })
}

/// Stamp the allow-origin header onto an outgoing response
pub fn apply_cors<B>(response: &mut Response<B>) {
    response
        .headers_mut()
        .insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
}
