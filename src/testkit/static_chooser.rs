//! [`ToolChooser`] backed by a fixed table.

use std::collections::BTreeMap;

use crate::errors::{Error, Result};
use crate::toolchain::ToolChooser;
use crate::unit::ToolRef;

/// Answers `choose_tool` from `(op, unit type)` pairs given up front.
///
/// Pairs with no entry fail with [`Error::NoToolFound`].
#[derive(Debug, Clone, Default)]
pub struct StaticToolChooser {
    tools: BTreeMap<(String, String), ToolRef>,
}

impl StaticToolChooser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tool(mut self, op: &str, unit_type: &str, tool: ToolRef) -> Self {
        self.tools
            .insert((op.to_string(), unit_type.to_string()), tool);
        self
    }
}

impl ToolChooser for StaticToolChooser {
    fn choose_tool(&self, op: &str, unit_type: &str) -> Result<ToolRef> {
        self.tools
            .get(&(op.to_string(), unit_type.to_string()))
            .cloned()
            .ok_or_else(|| Error::NoToolFound {
                op: op.to_string(),
                unit_type: unit_type.to_string(),
            })
    }
}
