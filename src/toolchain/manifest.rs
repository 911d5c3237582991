//! The toolchain manifest (`Srclibtoolchain`).
//!
//! The presence of this file in a directory is what makes the directory a
//! toolchain. Its JSON content lists the tools the toolchain provides.

use serde::{Deserialize, Serialize};

/// The filename whose presence marks a directory as a toolchain.
pub const MANIFEST_FILENAME: &str = "Srclibtoolchain";

/// Parsed contents of a manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolchainConfig {
    #[serde(rename = "Tools", default)]
    pub tools: Vec<ToolInfo>,
}

/// One entry point of a toolchain.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolInfo {
    /// Subcommand passed to the toolchain program to run this tool
    #[serde(rename = "Subcmd")]
    pub subcmd: String,
    /// Operation this tool performs, e.g. `graph` or `depresolve`
    #[serde(rename = "Op")]
    pub op: String,
    /// Source unit types this tool accepts
    #[serde(rename = "SourceUnitTypes", default)]
    pub source_unit_types: Vec<String>,
}

impl ToolInfo {
    pub fn new<I, S>(subcmd: &str, op: &str, source_unit_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            subcmd: subcmd.to_string(),
            op: op.to_string(),
            source_unit_types: source_unit_types.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether this tool performs `op` on units of `unit_type`.
    pub fn supports(&self, op: &str, unit_type: &str) -> bool {
        self.op == op && self.source_unit_types.iter().any(|t| t == unit_type)
    }
}

impl ToolchainConfig {
    pub fn parse(contents: &str) -> serde_json::Result<Self> {
        // An empty manifest still marks a toolchain; it just offers no tools.
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_str(contents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_manifest() {
        let config = ToolchainConfig::parse(
            r#"{"Tools": [
                {"Subcmd": "graph", "Op": "graph", "SourceUnitTypes": ["GoPackage"]},
                {"Subcmd": "depresolve", "Op": "depresolve", "SourceUnitTypes": ["GoPackage", "GoCommand"]}
            ]}"#,
        )
        .unwrap();

        assert_eq!(config.tools.len(), 2);
        assert!(config.tools[1].supports("depresolve", "GoCommand"));
        assert!(!config.tools[1].supports("graph", "GoCommand"));
    }

    #[test]
    fn test_empty_manifest_has_no_tools() {
        assert_eq!(ToolchainConfig::parse("").unwrap(), ToolchainConfig::default());
        assert_eq!(ToolchainConfig::parse("{}").unwrap(), ToolchainConfig::default());
    }

    #[test]
    fn test_malformed_manifest_is_an_error() {
        assert!(ToolchainConfig::parse("{\"Tools\": 3}").is_err());
    }
}
