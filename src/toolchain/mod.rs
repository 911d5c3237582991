//! Toolchains: installed analysis programs found through the search path.
//!
//! A toolchain is any directory under a search path entry containing a
//! [`MANIFEST_FILENAME`] file. Its identifier is its slash-separated path
//! relative to that entry (for example `sourcegraph.com/sourcegraph/srclib-go`).
//!
//! - [`discovery`]: `lookup` and `list`
//! - [`install`]: `add`, `get` and `temp_dir`
//! - [`select`]: choosing the tool for an operation

pub mod discovery;
pub mod info;
pub mod install;
pub mod manifest;
pub mod registry;
pub mod select;
pub mod vcs;

pub use info::{ToolchainInfo, DOCKERFILE, PROGRAM_DIR};
pub use install::{clone_url, AddOpt, TEMP_DIR_NAME};
pub use manifest::{ToolInfo, ToolchainConfig, MANIFEST_FILENAME};
pub use registry::Toolchains;
pub use select::{choose_from, AvailableTool, ToolChooser};
pub use vcs::{GitCommand, VersionControl};
