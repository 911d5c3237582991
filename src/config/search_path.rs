//! The toolchain search path.
//!
//! A colon-separated list of directories, read from `SRCLIBPATH` at the
//! process boundary. The first entry is the primary root: toolchains are
//! installed and fetched into it, and toolchain scratch directories live
//! beneath it. Later entries are read-only discovery roots.

use std::fmt;
use std::path::{Path, PathBuf};

/// Environment variable holding the search path
pub const SEARCH_PATH_ENV: &str = "SRCLIBPATH";

/// Directory under the home directory used when `SRCLIBPATH` is unset
pub const DEFAULT_DIR_NAME: &str = ".srclib";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchPath {
    dirs: Vec<PathBuf>,
}

impl SearchPath {
    /// Parse a colon-separated list. Empty entries stand for the current directory.
    pub fn parse(value: &str) -> Self {
        let dirs = value
            .split(':')
            .map(|dir| {
                if dir.is_empty() {
                    PathBuf::from(".")
                } else {
                    PathBuf::from(dir)
                }
            })
            .collect();
        Self { dirs }
    }

    pub fn from_dirs<I, P>(dirs: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let mut dirs: Vec<PathBuf> = dirs.into_iter().map(Into::into).collect();
        if dirs.is_empty() {
            dirs.push(PathBuf::from("."));
        }
        Self { dirs }
    }

    /// Resolve from an explicit value, falling back to `~/.srclib`.
    pub fn resolve(value: Option<&str>) -> Self {
        match value {
            Some(v) if !v.is_empty() => Self::parse(v),
            _ => Self::default_path(),
        }
    }

    /// Read `SRCLIBPATH`, falling back to `~/.srclib`.
    pub fn from_env() -> Self {
        Self::resolve(std::env::var(SEARCH_PATH_ENV).ok().as_deref())
    }

    fn default_path() -> Self {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        Self {
            dirs: vec![home.join(DEFAULT_DIR_NAME)],
        }
    }

    /// The install/fetch target.
    pub fn primary(&self) -> &Path {
        &self.dirs[0]
    }

    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }
}

impl fmt::Display for SearchPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .dirs
            .iter()
            .map(|d| d.display().to_string())
            .collect::<Vec<_>>()
            .join(":");
        f.write_str(&joined)
    }
}
