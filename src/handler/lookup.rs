//! Bank lookup handler
//!
//! Filters the loaded banks by `code` and `slug`, attaches logo URLs, and
//! answers with JSON.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};

use crate::config::AppState;
use crate::data::{BankRecord, BankView};
use crate::handler::router::RequestContext;
use crate::http;
use crate::logger;

/// Query parameters of the lookup endpoint
///
/// Absent and empty parameters are treated the same.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LookupQuery {
    pub code: String,
    pub slug: String,
}

impl LookupQuery {
    /// Parse a raw query string
    ///
    /// The first occurrence of a key wins. A pair holding a malformed
    /// percent-escape is dropped whole.
    pub fn parse(query: Option<&str>) -> Self {
        let mut code: Option<String> = None;
        let mut slug: Option<String> = None;

        for pair in query.unwrap_or_default().split('&').filter(|p| !p.is_empty()) {
            let (raw_key, raw_value) = pair.split_once('=').unwrap_or((pair, ""));
            let (Some(key), Some(value)) = (decode_component(raw_key), decode_component(raw_value))
            else {
                continue;
            };

            match key.as_str() {
                "code" if code.is_none() => code = Some(value),
                "slug" if slug.is_none() => slug = Some(value),
                _ => {}
            }
        }

        Self {
            code: code.unwrap_or_default(),
            slug: slug.unwrap_or_default(),
        }
    }

    pub fn is_unfiltered(&self) -> bool {
        self.code.is_empty() && self.slug.is_empty()
    }

    /// Exact, case-sensitive match on every non-empty parameter
    pub fn matches(&self, bank: &BankRecord) -> bool {
        (self.code.is_empty() || self.code == bank.code)
            && (self.slug.is_empty() || self.slug == bank.slug)
    }
}

/// Percent-decode one query component, `+` meaning space
///
/// `None` when a `%` is not followed by two hex digits. Decoded bytes that
/// are not UTF-8 become replacement characters, so such a value still
/// filters and simply matches no bank.
fn decode_component(raw: &str) -> Option<String> {
    if !has_valid_escapes(raw) {
        return None;
    }
    let spaced = raw.replace('+', " ");
    let bytes = urlencoding::decode_binary(spaced.as_bytes());
    Some(String::from_utf8_lossy(&bytes).into_owned())
}

fn has_valid_escapes(raw: &str) -> bool {
    raw.split('%').skip(1).all(|chunk| {
        chunk
            .as_bytes()
            .get(..2)
            .is_some_and(|hex| hex.iter().all(u8::is_ascii_hexdigit))
    })
}

/// Outcome of a lookup, before decoration
#[derive(Debug, PartialEq, Eq)]
pub enum Lookup<'a> {
    /// A filter was given: the first matching bank, if any
    Single(Option<&'a BankRecord>),
    /// No filter: every bank in load order
    All(&'a [BankRecord]),
}

pub fn lookup<'a>(banks: &'a [BankRecord], query: &LookupQuery) -> Lookup<'a> {
    if query.is_unfiltered() {
        Lookup::All(banks)
    } else {
        Lookup::Single(banks.iter().find(|bank| query.matches(bank)))
    }
}

/// Serve `GET /`
pub async fn serve_lookup(ctx: &RequestContext<'_>, state: &AppState) -> Response<Full<Bytes>> {
    let query = LookupQuery::parse(ctx.query);

    let (banks, single) = match lookup(&state.banks, &query) {
        Lookup::Single(None) => {
            return http::build_json_response(StatusCode::OK, &None::<BankView>, ctx.is_head)
        }
        Lookup::Single(Some(bank)) => (std::slice::from_ref(bank), true),
        Lookup::All(banks) => (banks, false),
    };

    let mut views = match decorate(state, banks).await {
        Ok(views) => views,
        Err(e) => {
            logger::log_error(&format!(
                "Failed to list logo directory '{}': {e}",
                state.logos.dir().display()
            ));
            return http::build_500_response("failed to resolve logo");
        }
    };

    if single {
        http::build_json_response(StatusCode::OK, &views.pop(), ctx.is_head)
    } else {
        http::build_json_response(StatusCode::OK, &views, ctx.is_head)
    }
}

/// Attach a logo URL to each bank, listing the logo directory at most once
async fn decorate<'a>(
    state: &'a AppState,
    banks: &'a [BankRecord],
) -> std::io::Result<Vec<BankView<'a>>> {
    if banks.is_empty() {
        return Ok(Vec::new());
    }

    let index = state.logos.index().await?;
    Ok(banks
        .iter()
        .map(|bank| bank.to_view(state.config.logo_url(index.resolve(&bank.slug))))
        .collect())
}
