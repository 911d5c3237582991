//! Built-in analysis operations.
//!
//! Each operation contributes a rule maker and the data type its rules write.

pub mod depresolve;
pub mod graph;

use crate::errors::Result;
use crate::plan::Registry;
use crate::unit::SourceUnit;

pub use depresolve::{make_dep_rules, ResolveDepsRule, ResolvedDeps, DEPRESOLVE_OP};
pub use graph::{make_graph_rules, GraphOutput, GraphUnitRule, GRAPH_OP};

/// The registry the `src` binary plans with: unit metadata plus the
/// `graph` and `depresolve` operations, in that order.
pub fn builtin_registry() -> Result<Registry> {
    let mut registry = Registry::new();
    registry.data_types.register::<SourceUnit>()?;

    registry.rule_makers.register(GRAPH_OP, make_graph_rules)?;
    registry.data_types.register::<GraphOutput>()?;

    registry.rule_makers.register(DEPRESOLVE_OP, make_dep_rules)?;
    registry.data_types.register::<ResolvedDeps>()?;

    Ok(registry)
}
