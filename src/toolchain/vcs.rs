//! Version control used to fetch toolchains.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::info;

use crate::errors::{Error, Result};

/// Clone and update toolchain repositories.
///
/// Both operations block until the subprocess exits and are never retried.
pub trait VersionControl: Send + Sync {
    /// Clone `url` into `dir`, which must not exist yet.
    fn clone_repo(&self, url: &str, dir: &Path) -> Result<()>;

    /// Pull the latest revision of the default branch into the checkout at `dir`.
    fn pull(&self, dir: &Path) -> Result<()>;
}

/// Runs the `git` binary found on `PATH`.
///
/// The subprocess's stdout and stderr both go to our stderr so its progress
/// and failure output reach the user before the error is returned.
#[derive(Debug, Clone, Default)]
pub struct GitCommand {
    program: Option<PathBuf>,
}

impl GitCommand {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a specific git binary instead of searching `PATH`.
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: Some(program.into()),
        }
    }

    fn program(&self) -> Result<PathBuf> {
        if let Some(program) = &self.program {
            return Ok(program.clone());
        }
        which::which("git").map_err(|e| Error::VersionControl {
            command: "git".to_string(),
            reason: format!("git not found in PATH: {}", e),
        })
    }

    fn run<I, S>(&self, args: I, cwd: Option<&Path>) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let program = self.program()?;
        let args: Vec<_> = args.into_iter().map(|a| a.as_ref().to_os_string()).collect();
        let command_line = std::iter::once("git".to_string())
            .chain(args.iter().map(|a| a.to_string_lossy().into_owned()))
            .collect::<Vec<_>>()
            .join(" ");

        let mut cmd = Command::new(&program);
        cmd.args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::from(std::io::stderr()))
            .stderr(Stdio::inherit());
        if let Some(dir) = cwd {
            cmd.current_dir(dir);
        }

        info!(command = %command_line, "running");
        let status = cmd.status()?;
        if !status.success() {
            return Err(Error::VersionControl {
                command: command_line,
                reason: status.to_string(),
            });
        }
        Ok(())
    }
}

impl VersionControl for GitCommand {
    fn clone_repo(&self, url: &str, dir: &Path) -> Result<()> {
        self.run([OsStr::new("clone"), OsStr::new(url), dir.as_os_str()], None)
    }

    fn pull(&self, dir: &Path) -> Result<()> {
        self.run(["pull", "origin", "HEAD"], Some(dir))
    }
}
