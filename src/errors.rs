//! Shared error types for toolchain discovery and build planning

use std::path::PathBuf;
use thiserror::Error;

use crate::unit::ToolRef;

/// Main error type for srclib operations
#[derive(Debug, Error)]
pub enum Error {
    /// A source unit lists a file that is absolute or escapes the tree root
    #[error("invalid file path {path:?} in source unit {unit:?} (must be relative and inside the tree root)")]
    InvalidFilePath { unit: String, path: String },

    /// No toolchain with this path exists in the search path
    #[error("toolchain {path:?} not found in search path")]
    ToolchainNotFound { path: String },

    /// A toolchain path that names nothing below a search path entry
    #[error("invalid toolchain path {path:?} (must name a directory inside the search path)")]
    InvalidToolchainPath { path: String },

    /// More than one search path entry provides the toolchain
    #[error("shadowed toolchain path {path:?} (toolchains: {})", join_paths(.matches))]
    ToolchainShadowed { path: String, matches: Vec<PathBuf> },

    /// Listing reached the same toolchain path through two directories
    #[error("saw 2 toolchains at path {path} in dirs {} and {}", .first.display(), .second.display())]
    ToolchainCollision {
        path: String,
        first: PathBuf,
        second: PathBuf,
    },

    /// The toolchain's pre-built program lacks the execute bit
    #[error("installed toolchain program {} is not executable (+x)", .program.display())]
    ToolchainNotExecutable { program: PathBuf },

    /// Non-forced install over an existing toolchain
    #[error("a toolchain already exists at toolchain path {path:?}")]
    ToolchainAlreadyExists { path: String },

    /// A directory that was expected to hold a toolchain does not
    #[error("get toolchain failed: {source} (is {path} a srclib toolchain repository?)")]
    NotAToolchain {
        path: String,
        #[source]
        source: Box<Error>,
    },

    /// A toolchain manifest could not be parsed
    #[error("invalid toolchain manifest {}: {source}", .path.display())]
    InvalidManifest {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// No installed tool performs the operation for the unit type
    #[error("no tool satisfies op {op:?} for source unit type {unit_type:?}")]
    NoToolFound { op: String, unit_type: String },

    /// Several installed tools perform the operation for the unit type
    #[error(
        "{} tools satisfy op {op:?} for source unit type {unit_type:?} (refusing to choose between {})",
        .candidates.len(),
        join_tools(.candidates)
    )]
    AmbiguousTool {
        op: String,
        unit_type: String,
        candidates: Vec<ToolRef>,
    },

    /// A clone or pull subprocess failed
    #[error("{command} failed: {reason}")]
    VersionControl { command: String, reason: String },

    /// The same operation or data type was registered twice
    #[error("{kind} {name:?} registered twice")]
    DuplicateRegistration { kind: &'static str, name: String },

    /// A rule asked for the file name of a data type nobody registered
    #[error("data type {0:?} is not registered")]
    UnregisteredDataType(&'static str),

    /// IO errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON errors
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Whether this is the "toolchain not found" sentinel.
    ///
    /// Callers use this to decide whether to fetch a missing toolchain.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::ToolchainNotFound { .. })
    }

    pub(crate) fn not_a_toolchain(path: impl Into<String>, source: Error) -> Self {
        Self::NotAToolchain {
            path: path.into(),
            source: Box::new(source),
        }
    }
}

fn join_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn join_tools(tools: &[ToolRef]) -> String {
    tools
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Result type alias using our error type
pub type Result<T> = std::result::Result<T, Error>;
