//! Process configuration consumed by discovery and planning.
//!
//! - [`SearchPath`]: where toolchains are installed and discovered
//! - [`Tree`]: the validated set of source units to plan
//! - [`ToolchainExecOpt`]: execution strategy passed through to tool invocations

pub mod exec;
pub mod search_path;
pub mod tree;

pub use exec::{ExecMethod, ToolchainExecOpt};
pub use search_path::{SearchPath, DEFAULT_DIR_NAME, SEARCH_PATH_ENV};
pub use tree::Tree;
