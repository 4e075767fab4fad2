//! Bank data module
//!
//! Loads the bank list once at startup and defines the shapes served to
//! clients.

pub mod logo;

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::DataError;

/// A bank as stored in the data file
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BankRecord {
    pub name: String,
    pub slug: String,
    pub code: String,
    #[serde(alias = "ussdCode")]
    pub ussd: String,
}

/// A bank as returned to clients, with its resolved logo URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BankView<'a> {
    pub name: &'a str,
    pub slug: &'a str,
    pub code: &'a str,
    pub ussd: &'a str,
    pub logo: String,
}

impl BankRecord {
    pub fn to_view(&self, logo: String) -> BankView<'_> {
        BankView {
            name: &self.name,
            slug: &self.slug,
            code: &self.code,
            ussd: &self.ussd,
            logo,
        }
    }
}

/// Read and parse the bank data file
///
/// The file must hold a JSON array of bank objects. There is no recovery:
/// any error here is meant to stop the process.
pub fn load_banks(path: &Path) -> Result<Vec<BankRecord>, DataError> {
    let raw = std::fs::read(path).map_err(|source| DataError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_slice(&raw).map_err(|source| DataError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
