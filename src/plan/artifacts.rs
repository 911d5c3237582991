//! Canonical file names for per-unit build data.
//!
//! Every rule that needs "the graph output of unit X" computes the path here,
//! so targets of one operation and prerequisites of another always agree.

use std::any::TypeId;
use std::collections::BTreeMap;

use crate::errors::{Error, Result};
use crate::unit::SourceUnit;
use crate::utils::paths;

/// A kind of build data stored per source unit.
///
/// `NAME` is the file name segment: unit `n` of type `t` stores its data as
/// `n/t.<NAME>.json`.
pub trait DataType: 'static {
    const NAME: &'static str;
}

impl DataType for SourceUnit {
    const NAME: &'static str = "unit";
}

/// Registered data types, keyed by name.
#[derive(Debug, Clone, Default)]
pub struct DataTypes {
    types: BTreeMap<&'static str, TypeId>,
}

impl DataTypes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `T` under `T::NAME`. Each name and each type may be
    /// registered only once.
    pub fn register<T: DataType>(&mut self) -> Result<()> {
        let id = TypeId::of::<T>();
        if self.types.contains_key(T::NAME) || self.types.values().any(|t| *t == id) {
            return Err(Error::DuplicateRegistration {
                kind: "data type",
                name: T::NAME.to_string(),
            });
        }
        self.types.insert(T::NAME, id);
        Ok(())
    }

    pub fn is_registered<T: DataType>(&self) -> bool {
        self.types.get(T::NAME) == Some(&TypeId::of::<T>())
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.types.keys().copied()
    }

    /// `<unit name>/<unit type>.<T::NAME>.json`, relative to a build data directory.
    pub fn source_unit_data_filename<T: DataType>(&self, unit: &SourceUnit) -> Result<String> {
        if !self.is_registered::<T>() {
            return Err(Error::UnregisteredDataType(T::NAME));
        }
        let file = format!("{}.{}.json", unit.unit_type, T::NAME);
        Ok(paths::join(&[&unit.name, &file]))
    }

    /// [`DataTypes::source_unit_data_filename`] under `data_dir`.
    pub fn source_unit_data_path<T: DataType>(&self, data_dir: &str, unit: &SourceUnit) -> Result<String> {
        let filename = self.source_unit_data_filename::<T>(unit)?;
        Ok(paths::join(&[data_dir, &filename]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Graph;
    impl DataType for Graph {
        const NAME: &'static str = "graph";
    }

    struct OtherGraph;
    impl DataType for OtherGraph {
        const NAME: &'static str = "graph";
    }

    fn types() -> DataTypes {
        let mut types = DataTypes::new();
        types.register::<SourceUnit>().unwrap();
        types.register::<Graph>().unwrap();
        types
    }

    #[test]
    fn test_filename_layout() {
        let unit = SourceUnit::new("n", "t");
        let types = types();
        assert_eq!(types.source_unit_data_filename::<Graph>(&unit).unwrap(), "n/t.graph.json");
        assert_eq!(
            types.source_unit_data_path::<SourceUnit>("testdata", &unit).unwrap(),
            "testdata/n/t.unit.json"
        );
    }

    #[test]
    fn test_nested_unit_names_and_data_dirs() {
        let unit = SourceUnit::new("github.com/x/y", "GoPackage");
        assert_eq!(
            types()
                .source_unit_data_path::<Graph>("./.srclib-cache/abc/", &unit)
                .unwrap(),
            ".srclib-cache/abc/github.com/x/y/GoPackage.graph.json"
        );
    }

    #[test]
    fn test_duplicate_name_is_rejected() {
        let mut types = types();
        let err = types.register::<OtherGraph>().unwrap_err();
        assert!(matches!(
            err,
            Error::DuplicateRegistration { kind: "data type", ref name } if name == "graph"
        ));
        assert!(matches!(
            types.register::<Graph>(),
            Err(Error::DuplicateRegistration { .. })
        ));
    }

    #[test]
    fn test_unregistered_type() {
        let types = DataTypes::new();
        let err = types
            .source_unit_data_filename::<Graph>(&SourceUnit::new("n", "t"))
            .unwrap_err();
        assert!(matches!(err, Error::UnregisteredDataType("graph")));
    }

    #[test]
    fn test_same_name_different_type_is_not_registered() {
        let types = types();
        assert!(types.is_registered::<Graph>());
        assert!(!types.is_registered::<OtherGraph>());
        assert_eq!(types.names().collect::<Vec<_>>(), vec!["graph", "unit"]);
    }
}
