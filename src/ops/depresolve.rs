//! The `depresolve` operation: resolve each unit's raw dependencies.

use crate::errors::Result;
use crate::plan::{DataType, Options, PlanContext, Rule, FRONTEND_PROGRAM};
use crate::unit::{SourceUnit, ToolRef};

pub const DEPRESOLVE_OP: &str = "depresolve";

/// Resolved dependencies of a unit (`<unit type>.depresolve.json`).
#[derive(Debug, Clone, Copy)]
pub struct ResolvedDeps;

impl DataType for ResolvedDeps {
    const NAME: &'static str = "depresolve";
}

/// Resolve one unit's dependencies from its metadata alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveDepsRule {
    pub unit: SourceUnit,
    pub tool: ToolRef,
    target: String,
    unit_data: String,
    options: Options,
}

impl ResolveDepsRule {
    pub fn new(ctx: &PlanContext<'_>, unit: &SourceUnit) -> Result<Self> {
        Ok(Self {
            tool: ctx.resolve_tool(DEPRESOLVE_OP, unit)?,
            target: ctx.data_path::<ResolvedDeps>(unit)?,
            unit_data: ctx.data_path::<SourceUnit>(unit)?,
            unit: unit.clone(),
            options: ctx.options.clone(),
        })
    }
}

impl Rule for ResolveDepsRule {
    fn target(&self) -> String {
        self.target.clone()
    }

    fn prereqs(&self) -> Vec<String> {
        vec![self.unit_data.clone()]
    }

    fn recipes(&self) -> Vec<String> {
        vec![format!(
            "{} tool {} {:?} {:?} < $^ 1> $@",
            FRONTEND_PROGRAM, self.options.toolchain_exec_opt, self.tool.toolchain, self.tool.subcmd,
        )]
    }

    fn source_unit(&self) -> Option<&SourceUnit> {
        Some(&self.unit)
    }
}

pub fn make_dep_rules(ctx: &PlanContext<'_>) -> Result<Vec<Box<dyn Rule>>> {
    let mut rules: Vec<Box<dyn Rule>> = Vec::with_capacity(ctx.tree.source_units.len());
    for unit in &ctx.tree.source_units {
        rules.push(Box::new(ResolveDepsRule::new(ctx, unit)?));
    }
    Ok(rules)
}
