//! How toolchains are executed.
//!
//! The planner never runs a tool itself; it passes this option through to
//! every `src tool` invocation in the generated recipes.

use clap::ValueEnum;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum ExecMethod {
    /// Run the toolchain's pre-built `.bin/<name>` program
    Program,
    /// Run the toolchain inside a container built from its Dockerfile
    Docker,
}

impl ExecMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExecMethod::Program => "program",
            ExecMethod::Docker => "docker",
        }
    }
}

impl fmt::Display for ExecMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered list of execution methods to try.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolchainExecOpt {
    pub methods: Vec<ExecMethod>,
}

impl Default for ToolchainExecOpt {
    fn default() -> Self {
        Self {
            methods: vec![ExecMethod::Program, ExecMethod::Docker],
        }
    }
}

impl ToolchainExecOpt {
    pub fn new(methods: Vec<ExecMethod>) -> Self {
        Self { methods }
    }

    /// Command-line form, e.g. `["--methods", "program,docker"]`.
    pub fn to_args(&self) -> Vec<String> {
        if self.methods.is_empty() {
            return Vec::new();
        }
        let methods = self
            .methods
            .iter()
            .map(ExecMethod::as_str)
            .collect::<Vec<_>>()
            .join(",");
        vec!["--methods".to_string(), methods]
    }

    /// The single string spliced into recipes.
    pub fn to_option_string(&self) -> String {
        self.to_args().join(" ")
    }
}
