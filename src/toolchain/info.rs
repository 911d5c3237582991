//! What discovery knows about one installed toolchain.

use std::path::{Path, PathBuf};

use crate::errors::{Error, Result};
use crate::io::{optional, FileSystem};
use crate::toolchain::manifest::ToolchainConfig;
use crate::utils::paths;

/// Name of the container build descriptor at a toolchain's root
pub const DOCKERFILE: &str = "Dockerfile";

/// Directory (relative to a toolchain's root) holding its pre-built program
pub const PROGRAM_DIR: &str = ".bin";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolchainInfo {
    /// Search-path-relative identifier, cleaned, without a trailing slash
    pub path: String,
    /// Directory containing the toolchain
    pub dir: PathBuf,
    /// Manifest filename within `dir`
    pub config_file: String,
    /// `.bin/<basename>` relative to `dir`, if the toolchain ships a program
    pub program: Option<String>,
    /// `Dockerfile` relative to `dir`, if the toolchain ships one
    pub dockerfile: Option<String>,
}

impl ToolchainInfo {
    /// Inspect `dir` for the optional program and Dockerfile.
    ///
    /// A program that exists but has no execute bit fails the whole toolchain.
    pub(crate) fn inspect(
        fs: &dyn FileSystem,
        toolchain_path: &str,
        dir: &Path,
        config_file: &str,
    ) -> Result<Self> {
        let dockerfile = optional(fs.stat(&dir.join(DOCKERFILE)))?.map(|_| DOCKERFILE.to_string());

        let program = format!("{}/{}", PROGRAM_DIR, paths::base_name(toolchain_path));
        let program_path = dir.join(&program);
        let program = match optional(fs.stat(&program_path))? {
            None => None,
            Some(stat) if !stat.executable => {
                return Err(Error::ToolchainNotExecutable {
                    program: program_path,
                })
            }
            Some(_) => Some(program),
        };

        Ok(Self {
            path: toolchain_path.to_string(),
            dir: dir.to_path_buf(),
            config_file: config_file.to_string(),
            program,
            dockerfile,
        })
    }

    pub fn has_program(&self) -> bool {
        self.program.is_some()
    }

    pub fn has_dockerfile(&self) -> bool {
        self.dockerfile.is_some()
    }

    /// A toolchain with neither a program nor a Dockerfile cannot be run.
    pub fn is_invocable(&self) -> bool {
        self.has_program() || self.has_dockerfile()
    }

    /// Absolute path of the pre-built program, if any.
    pub fn program_path(&self) -> Option<PathBuf> {
        self.program.as_ref().map(|p| self.dir.join(p))
    }

    /// Read and parse the toolchain's manifest.
    pub fn read_config(&self, fs: &dyn FileSystem) -> Result<ToolchainConfig> {
        let path = self.dir.join(&self.config_file);
        let contents = fs.read_to_string(&path)?;
        ToolchainConfig::parse(&contents).map_err(|source| Error::InvalidManifest { path, source })
    }
}
