//! Build planning: turn a source tree into a Makefile.
//!
//! Each registered operation contributes one rule per source unit. The
//! generated Makefile starts with an `all` rule depending on every target and
//! ends with `.DELETE_ON_ERROR` so a failed recipe never leaves a half-written
//! target that looks up to date.
//!
//! Output is a pure function of the tree, the registry and the options; the
//! same inputs always give a byte-identical Makefile.

pub mod artifacts;
pub mod makefile;
pub mod registry;

use tracing::{debug, debug_span};

use crate::config::Tree;
use crate::errors::Result;
use crate::toolchain::ToolChooser;
use crate::unit::{SourceUnit, ToolRef};

pub use artifacts::{DataType, DataTypes};
pub use makefile::{BasicRule, Makefile, Rule};
pub use registry::{Registry, RuleMaker, RuleMakers};

/// The analysis front-end invoked by recipes.
pub const FRONTEND_PROGRAM: &str = "src";

/// Target of the aggregate rule.
pub const ALL_TARGET: &str = "all";

/// Special target telling make to delete the target of a failed recipe.
pub const DELETE_ON_ERROR_TARGET: &str = ".DELETE_ON_ERROR";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Options {
    /// Do not reuse cached build outputs.
    ///
    /// Carried for rule makers that consult a build cache; the built-in
    /// operations do not, so it leaves their rules unchanged.
    pub no_cache: bool,
    /// Execution-mode arguments passed through to `src tool`, e.g. `--methods program,docker`
    pub toolchain_exec_opt: String,
}

/// What a [`RuleMaker`] sees.
pub struct PlanContext<'a> {
    pub tree: &'a Tree,
    pub data_dir: &'a str,
    /// Rules produced by operations that ran earlier
    pub existing: &'a [Box<dyn Rule>],
    pub options: &'a Options,
    pub data_types: &'a DataTypes,
    tools: &'a dyn ToolChooser,
}

impl<'a> PlanContext<'a> {
    pub fn new(
        tree: &'a Tree,
        data_dir: &'a str,
        existing: &'a [Box<dyn Rule>],
        options: &'a Options,
        data_types: &'a DataTypes,
        tools: &'a dyn ToolChooser,
    ) -> Self {
        Self {
            tree,
            data_dir,
            existing,
            options,
            data_types,
            tools,
        }
    }

    /// The unit's configured tool for `op`, or the one chosen from the
    /// installed toolchains when the unit does not name one.
    pub fn resolve_tool(&self, op: &str, unit: &SourceUnit) -> Result<ToolRef> {
        match unit.tool_for(op) {
            Some(tool) => Ok(tool.clone()),
            None => self.tools.choose_tool(op, &unit.unit_type),
        }
    }

    /// Path of the unit's data of type `T` under the build data directory.
    pub fn data_path<T: DataType>(&self, unit: &SourceUnit) -> Result<String> {
        self.data_types.source_unit_data_path::<T>(self.data_dir, unit)
    }
}

/// Generate the Makefile that builds every registered operation for every
/// unit in `tree`, writing outputs under `data_dir`.
///
/// The tree is validated first. Any error (an invalid file path, a tool that
/// cannot be chosen, a rule maker failure) aborts planning and is returned
/// as-is.
pub fn create_makefile(
    registry: &Registry,
    data_dir: &str,
    tree: &Tree,
    options: &Options,
    tools: &dyn ToolChooser,
) -> Result<Makefile> {
    tree.validate()?;

    let mut rules: Vec<Box<dyn Rule>> = Vec::new();
    for (op, maker) in registry.rule_makers.iter() {
        let _span = debug_span!("rule_maker", op).entered();
        let ctx = PlanContext::new(tree, data_dir, &rules, options, &registry.data_types, tools);
        let made = maker(&ctx)?;
        debug!(op, count = made.len(), "made rules");
        rules.extend(made);
    }

    let all = BasicRule::new(ALL_TARGET).with_prereqs(rules.iter().map(|r| r.target()).collect());

    let mut ordered: Vec<Box<dyn Rule>> = Vec::with_capacity(rules.len() + 2);
    ordered.push(Box::new(all));
    ordered.extend(rules);
    ordered.push(Box::new(BasicRule::new(DELETE_ON_ERROR_TARGET)));
    Ok(Makefile::new(ordered))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Error;
    use crate::testkit::StaticToolChooser;

    fn one_rule_per_unit(ctx: &PlanContext<'_>) -> Result<Vec<Box<dyn Rule>>> {
        let mut rules: Vec<Box<dyn Rule>> = Vec::new();
        for unit in &ctx.tree.source_units {
            let tool = ctx.resolve_tool("copy", unit)?;
            rules.push(Box::new(
                BasicRule::new(ctx.data_path::<SourceUnit>(unit)?)
                    .with_recipe(format!("{} {} {}", tool.toolchain, tool.subcmd, ctx.existing.len())),
            ));
        }
        Ok(rules)
    }

    fn registry() -> Registry {
        let mut registry = Registry::new();
        registry.data_types.register::<SourceUnit>().unwrap();
        registry.rule_makers.register("copy", one_rule_per_unit).unwrap();
        registry
    }

    #[test]
    fn test_all_first_and_delete_on_error_last() {
        let tree = Tree::new(vec![SourceUnit::new("a", "t"), SourceUnit::new("b", "t")]);
        let tools = StaticToolChooser::new().with_tool("copy", "t", ToolRef::new("tc", "cp"));

        let mf = create_makefile(&registry(), "d", &tree, &Options::default(), &tools).unwrap();
        assert_eq!(mf.targets(), vec!["all", "d/a/t.unit.json", "d/b/t.unit.json", ".DELETE_ON_ERROR"]);
        assert_eq!(
            mf.default_rule().map(|r| r.prereqs()),
            Some(vec!["d/a/t.unit.json".to_string(), "d/b/t.unit.json".to_string()])
        );
        assert_eq!(mf.rule("d/a/t.unit.json").map(|r| r.recipes()), Some(vec!["tc cp 0".to_string()]));
    }

    #[test]
    fn test_explicit_tool_wins_over_chooser() {
        let tree = Tree::new(vec![
            SourceUnit::new("a", "t").with_op("copy", Some(ToolRef::new("mine", "x")))
        ]);
        let mf = create_makefile(&registry(), "d", &tree, &Options::default(), &StaticToolChooser::new())
            .unwrap();
        assert_eq!(mf.rule("d/a/t.unit.json").map(|r| r.recipes()), Some(vec!["mine x 0".to_string()]));
    }

    #[test]
    fn test_invalid_tree_produces_no_makefile() {
        let tree = Tree::new(vec![SourceUnit::new("a", "t").with_files(["../escape"])]);
        let err = create_makefile(&registry(), "d", &tree, &Options::default(), &StaticToolChooser::new())
            .unwrap_err();
        assert!(matches!(err, Error::InvalidFilePath { .. }));
    }

    #[test]
    fn test_tool_selection_error_is_returned_verbatim() {
        let tree = Tree::new(vec![SourceUnit::new("a", "t")]);
        let err = create_makefile(&registry(), "d", &tree, &Options::default(), &StaticToolChooser::new())
            .unwrap_err();
        assert!(matches!(err, Error::NoToolFound { ref op, ref unit_type } if op == "copy" && unit_type == "t"));
    }

    #[test]
    fn test_empty_registry_and_tree() {
        let mf = create_makefile(
            &Registry::new(),
            "d",
            &Tree::default(),
            &Options::default(),
            &StaticToolChooser::new(),
        )
        .unwrap();
        assert_eq!(mf.marshal(), "all:\n\n.DELETE_ON_ERROR:\n");
    }
}
