//! Logo resolution
//!
//! Maps a bank slug to the base name of an image in the logo directory.
//! Logos live independently of the bank data, so a missing file is normal
//! and falls back to [`DEFAULT_LOGO`].

use std::borrow::Cow;
use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};

/// Base name served when a bank has no logo of its own
pub const DEFAULT_LOGO: &str = "default-image";

/// Finder metadata that may sit in the directory; never a logo
const IGNORED_ENTRY: &str = ".DS_Store";

/// Snapshot of the file names in the logo directory
#[derive(Debug, Clone, Default)]
pub struct LogoIndex {
    files: HashSet<String>,
}

impl LogoIndex {
    /// Return `slug` if `<slug>.png` exists, the default base name otherwise
    pub fn resolve<'a>(&self, slug: &'a str) -> &'a str {
        if self.files.contains(&format!("{slug}.png")) {
            slug
        } else {
            DEFAULT_LOGO
        }
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }
}

impl<S: Into<String>> FromIterator<S> for LogoIndex {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            files: iter
                .into_iter()
                .map(Into::into)
                .filter(|name: &String| name != IGNORED_ENTRY)
                .collect(),
        }
    }
}

/// Resolves logos against a directory, either freshly on each call or from
/// a listing taken at startup
#[derive(Debug)]
pub struct LogoResolver {
    dir: PathBuf,
    cached: Option<LogoIndex>,
}

impl LogoResolver {
    /// Resolver that lists the directory on every call
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            cached: None,
        }
    }

    /// Resolver that lists the directory once, now, and reuses the result
    pub async fn with_cached_listing(dir: impl Into<PathBuf>) -> io::Result<Self> {
        let dir = dir.into();
        let index = list_logos(&dir).await?;
        Ok(Self {
            dir,
            cached: Some(index),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Number of entries in the startup listing, if one was taken
    pub fn cached_count(&self) -> Option<usize> {
        self.cached.as_ref().map(LogoIndex::len)
    }

    /// Current view of the logo directory
    pub async fn index(&self) -> io::Result<Cow<'_, LogoIndex>> {
        match &self.cached {
            Some(index) => Ok(Cow::Borrowed(index)),
            None => list_logos(&self.dir).await.map(Cow::Owned),
        }
    }
}

/// List the logo directory; names that are not valid UTF-8 cannot match a
/// slug and are skipped
async fn list_logos(dir: &Path) -> io::Result<LogoIndex> {
    let mut entries = tokio::fs::read_dir(dir).await?;
    let mut names = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        if let Ok(name) = entry.file_name().into_string() {
            names.push(name);
        }
    }
    Ok(names.into_iter().collect())
}
