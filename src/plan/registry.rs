//! Operations and data types known to the planner.
//!
//! Built once at start-up (see `ops::builtin_registry`) and read-only while
//! planning.

use std::fmt;

use crate::errors::{Error, Result};
use crate::plan::artifacts::DataTypes;
use crate::plan::makefile::Rule;
use crate::plan::PlanContext;

/// Produces the rules for one operation over every unit in the tree.
pub type RuleMaker = fn(&PlanContext<'_>) -> Result<Vec<Box<dyn Rule>>>;

/// Rule makers in registration order, keyed by operation name.
#[derive(Clone, Default)]
pub struct RuleMakers {
    makers: Vec<(String, RuleMaker)>,
}

impl RuleMakers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, op: &str, maker: RuleMaker) -> Result<()> {
        if self.get(op).is_some() {
            return Err(Error::DuplicateRegistration {
                kind: "rule maker",
                name: op.to_string(),
            });
        }
        self.makers.push((op.to_string(), maker));
        Ok(())
    }

    pub fn get(&self, op: &str) -> Option<RuleMaker> {
        self.makers
            .iter()
            .find(|(name, _)| name == op)
            .map(|(_, maker)| *maker)
    }

    /// Operation names in registration order.
    pub fn ops(&self) -> impl Iterator<Item = &str> {
        self.makers.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, RuleMaker)> {
        self.makers.iter().map(|(name, maker)| (name.as_str(), *maker))
    }

    pub fn len(&self) -> usize {
        self.makers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.makers.is_empty()
    }
}

impl fmt::Debug for RuleMakers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.ops()).finish()
    }
}

/// Everything the planner needs registered before it runs.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    pub rule_makers: RuleMakers,
    pub data_types: DataTypes,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }
}
