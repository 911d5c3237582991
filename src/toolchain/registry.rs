//! The toolchain registry: discovery, installation and scratch space over a
//! [`SearchPath`].

use std::fmt;
use std::sync::Arc;

use crate::config::SearchPath;
use crate::errors::{Error, Result};
use crate::io::{FileSystem, RealFileSystem};
use crate::toolchain::vcs::{GitCommand, VersionControl};
use crate::utils::paths;

/// Installed toolchains reachable from a search path.
///
/// Every method re-reads the filesystem; nothing is cached between calls.
#[derive(Clone)]
pub struct Toolchains {
    pub(crate) search_path: SearchPath,
    pub(crate) fs: Arc<dyn FileSystem>,
    pub(crate) vcs: Arc<dyn VersionControl>,
}

impl Toolchains {
    /// Registry over the real filesystem, fetching with `git`.
    pub fn new(search_path: SearchPath) -> Self {
        Self {
            search_path,
            fs: Arc::new(RealFileSystem::new()),
            vcs: Arc::new(GitCommand::new()),
        }
    }

    /// Replace the filesystem (tests use an in-memory one).
    pub fn with_fs(mut self, fs: impl FileSystem + 'static) -> Self {
        self.fs = Arc::new(fs);
        self
    }

    /// Replace the version control client used by [`Toolchains::get`].
    pub fn with_vcs(mut self, vcs: impl VersionControl + 'static) -> Self {
        self.vcs = Arc::new(vcs);
        self
    }

    pub fn search_path(&self) -> &SearchPath {
        &self.search_path
    }

    pub fn file_system(&self) -> &dyn FileSystem {
        self.fs.as_ref()
    }
}

/// Normalize a toolchain path to its search-path-relative form.
///
/// `/a/b` and `a/b` name the same toolchain. Paths that climb out of the
/// search path entry are rejected.
pub(crate) fn normalize_toolchain_path(path: &str) -> Result<String> {
    paths::root_relative(path).ok_or_else(|| Error::InvalidToolchainPath {
        path: path.to_string(),
    })
}

impl fmt::Debug for Toolchains {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Toolchains")
            .field("search_path", &self.search_path)
            .finish_non_exhaustive()
    }
}
