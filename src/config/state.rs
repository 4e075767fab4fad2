// Application state module
// Everything a request handler reads, fixed after startup

use std::sync::Arc;

use super::types::Config;
use crate::data::logo::LogoResolver;
use crate::data::BankRecord;

/// Application state
///
/// Immutable once built, so it is shared across connections behind an
/// `Arc` without any locking.
#[derive(Debug)]
pub struct AppState {
    pub config: Config,
    /// Bank records in load order
    pub banks: Arc<[BankRecord]>,
    pub logos: LogoResolver,
}

impl AppState {
    pub fn new(config: Config, banks: Vec<BankRecord>, logos: LogoResolver) -> Self {
        Self {
            config,
            banks: banks.into(),
            logos,
        }
    }
}
