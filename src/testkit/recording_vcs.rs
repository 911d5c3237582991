//! [`VersionControl`] double that records calls instead of running git.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::errors::{Error, Result};
use crate::io::FileSystem;
use crate::testkit::MemoryFileSystem;
use crate::toolchain::{VersionControl, MANIFEST_FILENAME};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VcsCall {
    Clone { url: String, dir: PathBuf },
    Pull { dir: PathBuf },
}

/// Records clones and pulls, and simulates their effect on a [`MemoryFileSystem`].
///
/// By default a clone or pull leaves an empty manifest in the target
/// directory, so the fetched directory is a toolchain afterwards.
#[derive(Debug, Clone)]
pub struct RecordingVcs {
    fs: MemoryFileSystem,
    calls: Arc<Mutex<Vec<VcsCall>>>,
    write_manifest: bool,
    fail: bool,
}

impl RecordingVcs {
    pub fn new(fs: MemoryFileSystem) -> Self {
        Self {
            fs,
            calls: Arc::new(Mutex::new(Vec::new())),
            write_manifest: true,
            fail: false,
        }
    }

    /// Fetched repositories contain no manifest.
    pub fn without_manifest(mut self) -> Self {
        self.write_manifest = false;
        self
    }

    /// Every call fails after being recorded.
    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    pub fn calls(&self) -> Vec<VcsCall> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn record(&self, call: VcsCall, command: String, dir: &Path) -> Result<()> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).push(call);
        if self.fail {
            return Err(Error::VersionControl {
                command,
                reason: "exit status: 128".to_string(),
            });
        }

        self.fs.create_dir_all(dir)?;
        if self.write_manifest {
            self.fs.write_file(&dir.join(MANIFEST_FILENAME), "", false)?;
        }
        Ok(())
    }
}

impl VersionControl for RecordingVcs {
    fn clone_repo(&self, url: &str, dir: &Path) -> Result<()> {
        self.record(
            VcsCall::Clone {
                url: url.to_string(),
                dir: dir.to_path_buf(),
            },
            format!("git clone {} {}", url, dir.display()),
            dir,
        )
    }

    fn pull(&self, dir: &Path) -> Result<()> {
        self.record(
            VcsCall::Pull {
                dir: dir.to_path_buf(),
            },
            "git pull origin HEAD".to_string(),
            dir,
        )
    }
}
