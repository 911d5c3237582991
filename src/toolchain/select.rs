//! Choosing the tool that performs an operation on a source unit.

use tracing::debug;

use crate::errors::{Error, Result};
use crate::toolchain::info::ToolchainInfo;
use crate::toolchain::manifest::ToolInfo;
use crate::toolchain::registry::Toolchains;
use crate::unit::ToolRef;

/// Picks the tool for an operation when a source unit does not name one.
pub trait ToolChooser: Send + Sync {
    fn choose_tool(&self, op: &str, unit_type: &str) -> Result<ToolRef>;
}

/// A tool offered by an installed toolchain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailableTool {
    pub toolchain: ToolchainInfo,
    pub tool: ToolInfo,
}

impl AvailableTool {
    pub fn tool_ref(&self) -> ToolRef {
        ToolRef::new(self.toolchain.path.clone(), self.tool.subcmd.clone())
    }
}

/// The single candidate performing `op` on `unit_type`.
///
/// Zero candidates is [`Error::NoToolFound`]; more than one is
/// [`Error::AmbiguousTool`] listing all of them.
pub fn choose_from<'a, I>(op: &str, unit_type: &str, tools: I) -> Result<ToolRef>
where
    I: IntoIterator<Item = &'a AvailableTool>,
{
    let mut candidates: Vec<ToolRef> = tools
        .into_iter()
        .filter(|t| t.tool.supports(op, unit_type))
        .map(AvailableTool::tool_ref)
        .collect();

    match candidates.len() {
        0 => Err(Error::NoToolFound {
            op: op.to_string(),
            unit_type: unit_type.to_string(),
        }),
        1 => Ok(candidates.remove(0)),
        _ => Err(Error::AmbiguousTool {
            op: op.to_string(),
            unit_type: unit_type.to_string(),
            candidates,
        }),
    }
}

impl Toolchains {
    /// Every tool of every installed toolchain, optionally narrowed to those
    /// performing `op` and/or accepting `unit_type`.
    ///
    /// Ordered by toolchain (in listing order), then by manifest order.
    pub fn list_tools(&self, op: Option<&str>, unit_type: Option<&str>) -> Result<Vec<AvailableTool>> {
        let mut tools = Vec::new();
        for toolchain in self.list()? {
            let config = toolchain.read_config(self.fs.as_ref())?;
            for tool in config.tools {
                if op.is_some_and(|op| tool.op != op) {
                    continue;
                }
                if unit_type.is_some_and(|t| !tool.source_unit_types.iter().any(|s| s == t)) {
                    continue;
                }
                tools.push(AvailableTool {
                    toolchain: toolchain.clone(),
                    tool,
                });
            }
        }
        Ok(tools)
    }
}

impl ToolChooser for Toolchains {
    fn choose_tool(&self, op: &str, unit_type: &str) -> Result<ToolRef> {
        let tools = self.list_tools(Some(op), Some(unit_type))?;
        let chosen = choose_from(op, unit_type, &tools)?;
        debug!(op, unit_type, tool = %chosen, "chose tool");
        Ok(chosen)
    }
}
