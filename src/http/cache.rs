//! HTTP cache validation
//!
//! `ETag` generation and `If-None-Match` handling for logo files.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Quoted `ETag` derived from the content length and a hash of the bytes
pub fn generate_etag(content: &[u8]) -> String {
    let mut hasher = DefaultHasher::new();
    content.hash(&mut hasher);
    format!("\"{:x}-{:x}\"", content.len(), hasher.finish())
}

/// True when the client's `If-None-Match` list contains `etag` or `*`
pub fn check_etag_match(if_none_match: Option<&str>, etag: &str) -> bool {
    if_none_match.is_some_and(|client_etags| {
        client_etags
            .split(',')
            .map(str::trim)
            .map(|e| e.strip_prefix("W/").unwrap_or(e))
            .any(|e| e == etag || e == "*")
    })
}
