//! HTTP protocol layer module
//!
//! Response builders, CORS, cache validation and MIME detection, kept apart
//! from the lookup logic.

pub mod cache;
pub mod cors;
pub mod mime;
pub mod response;

// Re-export commonly used builders
pub use response::{
    build_304_response, build_500_response, build_cached_response, build_file_not_found_response,
    build_json_response, build_not_found_json,
};
