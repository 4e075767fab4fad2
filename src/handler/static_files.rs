//! Static logo serving module
//!
//! Serves files from the logo directory with MIME detection and `ETag`
//! revalidation.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::path::Path;
use tokio::fs;

use crate::handler::router::RequestContext;
use crate::http::{self, cache, mime};
use crate::logger;

/// Serve a file below the logo directory; `requested` is the path after
/// the `/logo/` prefix, still percent-encoded
pub async fn serve_logo(
    ctx: &RequestContext<'_>,
    logo_dir: &Path,
    requested: &str,
) -> Response<Full<Bytes>> {
    match load_logo(logo_dir, requested).await {
        Some((content, content_type)) => {
            build_logo_response(content, content_type, ctx.if_none_match, ctx.is_head)
        }
        None => http::build_file_not_found_response(),
    }
}

/// Read a logo file, refusing anything that resolves outside `logo_dir`
pub async fn load_logo(logo_dir: &Path, requested: &str) -> Option<(Vec<u8>, &'static str)> {
    let decoded = urlencoding::decode(requested).ok()?;
    let relative = decoded.trim_start_matches('/');
    if relative.is_empty() {
        return None;
    }
    if relative.split(['/', '\\']).any(|segment| segment == "..") {
        logger::log_warning(&format!("Path traversal attempt blocked: {requested}"));
        return None;
    }

    let dir_canonical = match fs::canonicalize(logo_dir).await {
        Ok(p) => p,
        Err(e) => {
            logger::log_warning(&format!(
                "Logo directory not found or inaccessible '{}': {e}",
                logo_dir.display()
            ));
            return None;
        }
    };

    // File not found is common (404), no need to log
    let file_canonical = fs::canonicalize(logo_dir.join(relative)).await.ok()?;
    if !file_canonical.starts_with(&dir_canonical) {
        logger::log_warning(&format!(
            "Path traversal attempt blocked: {requested} -> {}",
            file_canonical.display()
        ));
        return None;
    }
    if !fs::metadata(&file_canonical).await.ok()?.is_file() {
        return None;
    }

    let content = match fs::read(&file_canonical).await {
        Ok(c) => c,
        Err(e) => {
            logger::log_error(&format!(
                "Failed to read file '{}': {e}",
                file_canonical.display()
            ));
            return None;
        }
    };

    Some((content, mime::content_type_for(Path::new(relative))))
}

fn build_logo_response(
    content: Vec<u8>,
    content_type: &str,
    if_none_match: Option<&str>,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let etag = cache::generate_etag(&content);

    if cache::check_etag_match(if_none_match, &etag) {
        return http::build_304_response(&etag);
    }

    http::build_cached_response(Bytes::from(content), content_type, &etag, is_head)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::tests::scratch_dir;

    #[tokio::test]
    async fn test_load_existing_logo() {
        let dir = scratch_dir("static-load");
        std::fs::write(dir.join("access-bank.png"), b"\x89PNG").unwrap();

        let (content, content_type) = load_logo(&dir, "access-bank.png").await.unwrap();
        assert_eq!(content, b"\x89PNG");
        assert_eq!(content_type, "image/png");
    }

    #[tokio::test]
    async fn test_load_percent_encoded_name() {
        let dir = scratch_dir("static-encoded");
        std::fs::write(dir.join("first bank.png"), b"png").unwrap();
        assert!(load_logo(&dir, "first%20bank.png").await.is_some());
    }

    #[tokio::test]
    async fn test_missing_and_directory_are_none() {
        let dir = scratch_dir("static-missing");
        std::fs::create_dir_all(dir.join("sub")).unwrap();

        assert!(load_logo(&dir, "nope.png").await.is_none());
        assert!(load_logo(&dir, "sub").await.is_none());
        assert!(load_logo(&dir, "").await.is_none());
    }

    #[tokio::test]
    async fn test_traversal_blocked() {
        let root = scratch_dir("static-traversal");
        let logos = root.join("logos");
        std::fs::create_dir_all(&logos).unwrap();
        std::fs::write(root.join("banks.json"), b"[]").unwrap();

        assert!(load_logo(&logos, "../banks.json").await.is_none());
        assert!(load_logo(&logos, "..%2Fbanks.json").await.is_none());
        let absolute = format!("{}", root.join("banks.json").display());
        assert!(load_logo(&logos, &absolute).await.is_none());
    }

    #[test]
    fn test_etag_revalidation() {
        let content = b"logo".to_vec();
        let etag = cache::generate_etag(&content);

        let fresh = build_logo_response(content.clone(), "image/png", None, false);
        assert_eq!(fresh.status(), 200);
        assert_eq!(fresh.headers()["ETag"], etag.as_str());

        let cached = build_logo_response(content, "image/png", Some(&etag), false);
        assert_eq!(cached.status(), 304);
    }
}
