//! Source units and resolved tool references.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A resolved reference to one executable entry point of a toolchain.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ToolRef {
    /// Search-path-relative toolchain path, e.g. `sourcegraph.com/sourcegraph/srclib-go`
    #[serde(rename = "Toolchain")]
    pub toolchain: String,
    /// Subcommand of the toolchain program that performs the operation
    #[serde(rename = "Subcmd")]
    pub subcmd: String,
}

impl ToolRef {
    pub fn new(toolchain: impl Into<String>, subcmd: impl Into<String>) -> Self {
        Self {
            toolchain: toolchain.into(),
            subcmd: subcmd.into(),
        }
    }
}

impl fmt::Display for ToolRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.toolchain, self.subcmd)
    }
}

/// A logical analyzable target, such as one package.
///
/// `ops` maps an operation name to the tool that performs it for this unit.
/// A `None` entry (or a missing key) asks the planner to choose a tool
/// from the installed toolchains.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceUnit {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Type")]
    pub unit_type: String,
    #[serde(rename = "Files", default)]
    pub files: Vec<String>,
    #[serde(rename = "Ops", default)]
    pub ops: BTreeMap<String, Option<ToolRef>>,
}

impl SourceUnit {
    pub fn new(name: impl Into<String>, unit_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            unit_type: unit_type.into(),
            ..Self::default()
        }
    }

    pub fn with_files<I, S>(mut self, files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.files = files.into_iter().map(Into::into).collect();
        self
    }

    /// Pin the tool for an operation, or pass `None` to request automatic selection.
    pub fn with_op(mut self, op: impl Into<String>, tool: Option<ToolRef>) -> Self {
        self.ops.insert(op.into(), tool);
        self
    }

    /// The explicitly configured tool for `op`, if any.
    pub fn tool_for(&self, op: &str) -> Option<&ToolRef> {
        self.ops.get(op).and_then(Option::as_ref)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_for_distinguishes_unset_and_null() {
        let unit = SourceUnit::new("n", "t")
            .with_op("graph", Some(ToolRef::new("tc", "t")))
            .with_op("depresolve", None);

        assert_eq!(unit.tool_for("graph"), Some(&ToolRef::new("tc", "t")));
        assert_eq!(unit.tool_for("depresolve"), None);
        assert_eq!(unit.tool_for("missing"), None);
    }

    #[test]
    fn test_deserialize_unit_json() {
        let json = r#"{
            "Name": "github.com/foo/bar",
            "Type": "GoPackage",
            "Files": ["bar.go"],
            "Ops": {"graph": null, "depresolve": {"Toolchain": "tc", "Subcmd": "depresolve"}}
        }"#;
        let unit: SourceUnit = serde_json::from_str(json).unwrap();
        assert_eq!(unit.name, "github.com/foo/bar");
        assert_eq!(unit.unit_type, "GoPackage");
        assert_eq!(unit.files, vec!["bar.go"]);
        assert_eq!(unit.ops.get("graph"), Some(&None));
        assert_eq!(
            unit.tool_for("depresolve"),
            Some(&ToolRef::new("tc", "depresolve"))
        );
    }

    #[test]
    fn test_missing_files_and_ops_default_to_empty() {
        let unit: SourceUnit = serde_json::from_str(r#"{"Name": "n", "Type": "t"}"#).unwrap();
        assert!(unit.files.is_empty());
        assert!(unit.ops.is_empty());
    }
}
