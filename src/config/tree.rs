//! The source tree handed to the planner.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::errors::{Error, Result};
use crate::unit::SourceUnit;
use crate::utils::paths;

/// The build input: every source unit found in a repository.
///
/// Unit file lists come from scanner plugins and are not trusted, so a tree
/// must pass [`Tree::validate`] before anything is planned from it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tree {
    #[serde(rename = "SourceUnits", default)]
    pub source_units: Vec<SourceUnit>,
}

impl Tree {
    pub fn new(source_units: Vec<SourceUnit>) -> Self {
        Self { source_units }
    }

    /// Read a tree from its JSON form (`{"SourceUnits": [...]}`).
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Check that every declared file is a clean, root-relative path.
    ///
    /// The first offending path is reported; later units are not examined.
    pub fn validate(&self) -> Result<()> {
        for unit in &self.source_units {
            for file in &unit.files {
                if !is_safe_file_path(file) {
                    return Err(Error::InvalidFilePath {
                        unit: unit.name.clone(),
                        path: file.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}

fn is_safe_file_path(file: &str) -> bool {
    let cleaned = paths::clean(file);
    !(Path::new(&cleaned).is_absolute() || cleaned.starts_with('/') || paths::escapes_root(&cleaned))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree_with_file(file: &str) -> Tree {
        Tree::new(vec![SourceUnit::new("u", "t").with_files([file])])
    }

    #[test]
    fn test_validate_rejects_unsafe_paths() {
        let cases = [
            ("absolute path", "/foo"),
            ("relative path above root", "../foo"),
            ("bad path after being cleaned", "foo/bar/../../../../baz"),
            ("parent only", ".."),
        ];
        for (label, file) in cases {
            let err = tree_with_file(file).validate().unwrap_err();
            assert!(
                matches!(err, Error::InvalidFilePath { ref path, .. } if path == file),
                "{}: got {:?}",
                label,
                err
            );
        }
    }

    #[test]
    fn test_validate_accepts_relative_paths() {
        for file in ["foo", "foo/bar.go", "./foo", "a/../b", "..foo", "foo/.."] {
            assert!(tree_with_file(file).validate().is_ok(), "{}", file);
        }
    }

    #[test]
    fn test_validate_reports_first_failure_only() {
        let tree = Tree::new(vec![
            SourceUnit::new("ok", "t").with_files(["a.go"]),
            SourceUnit::new("bad1", "t").with_files(["/abs", "../up"]),
            SourceUnit::new("bad2", "t").with_files(["../other"]),
        ]);
        match tree.validate() {
            Err(Error::InvalidFilePath { unit, path }) => {
                assert_eq!(unit, "bad1");
                assert_eq!(path, "/abs");
            }
            other => panic!("expected InvalidFilePath, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_tree_is_valid() {
        assert!(Tree::default().validate().is_ok());
    }

    #[test]
    fn test_from_json_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("tree.json");
        std::fs::write(
            &path,
            r#"{"SourceUnits": [{"Name": "n", "Type": "t", "Files": ["f"]}]}"#,
        )
        .unwrap();

        let tree = Tree::from_json_file(&path).unwrap();
        assert_eq!(tree.source_units.len(), 1);
        assert_eq!(tree.source_units[0].files, vec!["f"]);
    }
}
