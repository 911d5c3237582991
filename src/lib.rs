// Export modules for library usage
pub mod cli;
pub mod commands;
pub mod config;
pub mod errors;
pub mod io;
pub mod observability;
pub mod ops;
pub mod plan;
pub mod testkit;
pub mod toolchain;
pub mod unit;
pub mod utils;

// Re-export commonly used types
pub use crate::config::{SearchPath, ToolchainExecOpt, Tree};
pub use crate::errors::{Error, Result};
pub use crate::unit::{SourceUnit, ToolRef};

pub use crate::plan::{
    create_makefile, BasicRule, DataType, DataTypes, Makefile, Options, Registry, Rule,
    RuleMaker, RuleMakers,
};

pub use crate::ops::builtin_registry;

pub use crate::toolchain::{
    AddOpt, ToolChooser, ToolInfo, ToolchainConfig, ToolchainInfo, Toolchains,
};
