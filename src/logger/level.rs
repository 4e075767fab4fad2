//! Log level threshold
//!
//! Access lines are governed by `logging.access_log` alone; the level only
//! filters informational and warning lines. Errors are always written.

use std::str::FromStr;
use thiserror::Error;

/// Minimum severity written, most severe first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Error,
    Warn,
    Info,
    Debug,
}

#[derive(Debug, Error)]
#[error("unknown log level '{0}', expected error, warn, info or debug")]
pub struct UnknownLevel(String);

impl Level {
    /// Whether a line of severity `line` passes this threshold
    pub fn allows(self, line: Self) -> bool {
        line <= self
    }
}

impl FromStr for Level {
    type Err = UnknownLevel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "error" => Ok(Self::Error),
            "warn" | "warning" => Ok(Self::Warn),
            "info" => Ok(Self::Info),
            "debug" | "trace" => Ok(Self::Debug),
            _ => Err(UnknownLevel(s.to_string())),
        }
    }
}
