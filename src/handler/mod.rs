//! Request handler module
//!
//! Responsible for request routing dispatch: the bank lookup endpoint and
//! the static logo files.

pub mod lookup;
pub mod router;
pub mod static_files;

// Re-export main entry point
pub use router::handle_request;
