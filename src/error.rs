//! Error types
//!
//! Startup failures are fatal and bubble up to `main`. Request-time failures
//! never leave the handler layer; they are turned into JSON error responses.

use std::path::PathBuf;
use thiserror::Error;

/// Failure to load the bank data file
#[derive(Debug, Error)]
pub enum DataError {
    #[error("failed to read bank data from {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse bank data from {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Anything that stops the service from starting
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    Config(#[from] config::ConfigError),
    #[error("invalid listen address '{addr}': {source}")]
    Address {
        addr: String,
        #[source]
        source: std::net::AddrParseError,
    },
    #[error(transparent)]
    Data(#[from] DataError),
    #[error("failed to list logo directory {path}: {source}")]
    Logos {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to build runtime: {0}")]
    Runtime(#[source] std::io::Error),
    #[error("failed to initialize logger: {0}")]
    Logger(#[source] std::io::Error),
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: std::net::SocketAddr,
        #[source]
        source: std::io::Error,
    },
}
