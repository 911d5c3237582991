//! Installing, fetching and scratch space for toolchains.
//!
//! All of these write under the primary (first) search path entry.

use std::io;
use std::path::PathBuf;

use tracing::{debug, info};

use crate::errors::{Error, Result};
use crate::io::optional;
use crate::toolchain::info::ToolchainInfo;
use crate::toolchain::registry::{normalize_toolchain_path, Toolchains};

/// Directory under the primary search path root holding per-toolchain scratch space
pub const TEMP_DIR_NAME: &str = ".tmp";

/// Hosting namespace whose clone URLs are served from [`CLONE_HOST_REWRITE`]
const CLONE_HOST_PREFIX: &str = "sourcegraph.com/";
const CLONE_HOST_REWRITE: &str = "github.com/";

#[derive(Debug, Clone, Copy, Default)]
pub struct AddOpt {
    /// Replace whatever is installed at the toolchain path
    pub force: bool,
}

/// The clone URL for a toolchain path: `https://<path>.git`.
///
/// Older git clients do not follow https redirects, so paths in the
/// `sourcegraph.com/` namespace are cloned from `github.com/` directly.
pub fn clone_url(toolchain_path: &str) -> String {
    let host_path = match toolchain_path.strip_prefix(CLONE_HOST_PREFIX) {
        Some(rest) => format!("{}{}", CLONE_HOST_REWRITE, rest),
        None => toolchain_path.to_string(),
    };
    format!("https://{}.git", host_path)
}

impl Toolchains {
    /// Make the toolchain in `dir` available at `toolchain_path` by symlinking
    /// it into the primary search path root.
    ///
    /// Without `force`, an existing toolchain at the path is an error. With
    /// `force`, a failed symlink is retried once after removing whatever
    /// occupies the target. The remove-and-retry is not atomic.
    pub fn add(&self, dir: &std::path::Path, toolchain_path: &str, opt: AddOpt) -> Result<()> {
        let toolchain_path = normalize_toolchain_path(toolchain_path)?;
        if !opt.force {
            match self.lookup(&toolchain_path) {
                Err(e) if e.is_not_found() => {}
                Ok(_) | Err(Error::ToolchainShadowed { .. }) => {
                    return Err(Error::ToolchainAlreadyExists {
                        path: toolchain_path,
                    })
                }
                Err(e) => return Err(e),
            }
        }

        let abs_dir = std::path::absolute(dir)?;
        let target = self.search_path.primary().join(&toolchain_path);
        if let Some(parent) = target.parent() {
            self.fs.create_dir_all(parent)?;
        }

        debug!(from = %abs_dir.display(), to = %target.display(), force = opt.force, "adding toolchain");
        if !opt.force {
            return Ok(self.fs.symlink(&abs_dir, &target)?);
        }
        if self.fs.symlink(&abs_dir, &target).is_err() {
            self.fs.remove_all(&target)?;
            self.fs.symlink(&abs_dir, &target)?;
        }
        Ok(())
    }

    /// Return the toolchain at `path`, fetching it into the primary search
    /// path root if it is not installed.
    ///
    /// An installed toolchain is returned as-is regardless of `update`. A
    /// missing toolchain is cloned from [`clone_url`]; if its directory
    /// already exists but is not a toolchain, the checkout is pulled instead.
    pub fn get(&self, path: &str, update: bool) -> Result<ToolchainInfo> {
        let path = normalize_toolchain_path(path)?;
        match self.lookup(&path) {
            Err(e) if e.is_not_found() => {}
            installed => {
                if update {
                    debug!(toolchain = %path, "toolchain already installed, not updating");
                }
                return installed;
            }
        }

        let toolchain_dir = self.search_path.primary().join(&path);
        match optional(self.fs.stat(&toolchain_dir))? {
            None => {
                let url = clone_url(&path);
                info!(toolchain = %path, url = %url, dir = %toolchain_dir.display(), "cloning toolchain");
                self.vcs.clone_repo(&url, &toolchain_dir)?;
            }
            Some(stat) if stat.is_dir() => {
                info!(toolchain = %path, dir = %toolchain_dir.display(), "updating toolchain checkout");
                self.vcs.pull(&toolchain_dir)?;
            }
            Some(_) => {
                return Err(Error::Io(io::Error::new(
                    io::ErrorKind::AlreadyExists,
                    format!("{} exists and is not a directory", toolchain_dir.display()),
                )))
            }
        }

        self.lookup(&path)
            .map_err(|e| Error::not_a_toolchain(path.clone(), e))
    }

    /// Scratch directory for a toolchain, created if needed.
    ///
    /// Lives at `<primary>/.tmp/<toolchain path>`; the leading dot keeps it
    /// out of [`Toolchains::list`].
    pub fn temp_dir(&self, toolchain_path: &str) -> Result<PathBuf> {
        let toolchain = self.lookup(toolchain_path).map_err(|e| {
            if e.is_not_found() {
                Error::not_a_toolchain(toolchain_path, e)
            } else {
                e
            }
        })?;

        let dir = self
            .search_path
            .primary()
            .join(TEMP_DIR_NAME)
            .join(&toolchain.path);
        self.fs.create_dir_all(&dir)?;
        Ok(dir)
    }
}
