//! The `graph` operation: run a grapher over each unit's source files.

use crate::errors::Result;
use crate::plan::{DataType, Options, PlanContext, Rule, FRONTEND_PROGRAM};
use crate::unit::{SourceUnit, ToolRef};

pub const GRAPH_OP: &str = "graph";

/// Normalized graph output of a unit (`<unit type>.graph.json`).
#[derive(Debug, Clone, Copy)]
pub struct GraphOutput;

impl DataType for GraphOutput {
    const NAME: &'static str = "graph";
}

/// Graph one unit. Depends on the unit's metadata and every file it declares,
/// so editing any source file re-graphs the unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphUnitRule {
    pub unit: SourceUnit,
    pub tool: ToolRef,
    target: String,
    unit_data: String,
    options: Options,
}

impl GraphUnitRule {
    pub fn new(ctx: &PlanContext<'_>, unit: &SourceUnit) -> Result<Self> {
        Ok(Self {
            tool: ctx.resolve_tool(GRAPH_OP, unit)?,
            target: ctx.data_path::<GraphOutput>(unit)?,
            unit_data: ctx.data_path::<SourceUnit>(unit)?,
            unit: unit.clone(),
            options: ctx.options.clone(),
        })
    }
}

impl Rule for GraphUnitRule {
    fn target(&self) -> String {
        self.target.clone()
    }

    fn prereqs(&self) -> Vec<String> {
        std::iter::once(self.unit_data.clone())
            .chain(self.unit.files.iter().cloned())
            .collect()
    }

    // The unit metadata is the first prerequisite, so `$<` feeds the tool
    // only that; the raw files are prerequisites for staleness alone.
    // `{:?}` quotes for the shell but leaves `$` for make to expand.
    fn recipes(&self) -> Vec<String> {
        vec![format!(
            "{src} tool {} {:?} {:?} < $< | {src} internal normalize-graph-data --unit-type {:?} --dir . 1> $@",
            self.options.toolchain_exec_opt,
            self.tool.toolchain,
            self.tool.subcmd,
            self.unit.unit_type,
            src = FRONTEND_PROGRAM,
        )]
    }

    fn source_unit(&self) -> Option<&SourceUnit> {
        Some(&self.unit)
    }
}

pub fn make_graph_rules(ctx: &PlanContext<'_>) -> Result<Vec<Box<dyn Rule>>> {
    ctx.tree
        .source_units
        .iter()
        .map(|unit| GraphUnitRule::new(ctx, unit).map(|r| Box::new(r) as Box<dyn Rule>))
        .collect()
}
