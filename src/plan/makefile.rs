//! Make-compatible build files.

use std::fmt;

use crate::unit::SourceUnit;

/// One target, how to build it, and what it depends on.
pub trait Rule: fmt::Debug + Send + Sync {
    fn target(&self) -> String;

    fn prereqs(&self) -> Vec<String>;

    /// Shell lines run in order to produce the target.
    fn recipes(&self) -> Vec<String>;

    /// The source unit this rule builds data for, if any.
    fn source_unit(&self) -> Option<&SourceUnit> {
        None
    }
}

/// A rule given by its literal parts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BasicRule {
    pub target: String,
    pub prereqs: Vec<String>,
    pub recipes: Vec<String>,
}

impl BasicRule {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            ..Self::default()
        }
    }

    pub fn with_prereqs(mut self, prereqs: Vec<String>) -> Self {
        self.prereqs = prereqs;
        self
    }

    pub fn with_recipe(mut self, recipe: impl Into<String>) -> Self {
        self.recipes.push(recipe.into());
        self
    }
}

impl Rule for BasicRule {
    fn target(&self) -> String {
        self.target.clone()
    }

    fn prereqs(&self) -> Vec<String> {
        self.prereqs.clone()
    }

    fn recipes(&self) -> Vec<String> {
        self.recipes.clone()
    }
}

/// An ordered list of rules. The first rule is the default goal.
#[derive(Debug, Default)]
pub struct Makefile {
    pub rules: Vec<Box<dyn Rule>>,
}

impl Makefile {
    pub fn new(rules: Vec<Box<dyn Rule>>) -> Self {
        Self { rules }
    }

    /// The rule `make` builds when no goal is given.
    pub fn default_rule(&self) -> Option<&dyn Rule> {
        self.rules.first().map(|r| r.as_ref())
    }

    pub fn rule(&self, target: &str) -> Option<&dyn Rule> {
        self.rules
            .iter()
            .find(|r| r.target() == target)
            .map(|r| r.as_ref())
    }

    pub fn targets(&self) -> Vec<String> {
        self.rules.iter().map(|r| r.target()).collect()
    }

    /// Render in make syntax, one blank line between rules.
    pub fn marshal(&self) -> String {
        self.to_string()
    }
}

// Targets, prerequisites and recipes are written verbatim. A `$` coming from
// unit data (names, types, file paths) is expanded by make, so `$(...)` in a
// scanner-supplied name runs as make syntax.
impl fmt::Display for Makefile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, rule) in self.rules.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}:", rule.target())?;
            for prereq in rule.prereqs() {
                write!(f, " {}", prereq)?;
            }
            writeln!(f)?;
            for recipe in rule.recipes() {
                writeln!(f, "\t{}", recipe)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_dollar_signs_are_written_verbatim() {
        let mf = Makefile::new(vec![Box::new(
            BasicRule::new("out/$(NAME).json")
                .with_prereqs(vec!["src/$$x.go".into()])
                .with_recipe("tool \"$(TYPE)\" 1> $@"),
        )]);
        assert_eq!(mf.marshal(), "out/$(NAME).json: src/$$x.go\n\ttool \"$(TYPE)\" 1> $@\n");
    }

    #[test]
    fn test_marshal() {
        let mf = Makefile::new(vec![
            Box::new(BasicRule::new("all").with_prereqs(vec!["a".into(), "b".into()])),
            Box::new(
                BasicRule::new("a")
                    .with_prereqs(vec!["in".into()])
                    .with_recipe("cp $< $@")
                    .with_recipe("touch $@"),
            ),
            Box::new(BasicRule::new(".PHONY")),
        ]);

        assert_eq!(
            mf.marshal(),
            "all: a b\n\na: in\n\tcp $< $@\n\ttouch $@\n\n.PHONY:\n"
        );
    }

    #[test]
    fn test_default_rule_and_lookup() {
        let mf = Makefile::new(vec![
            Box::new(BasicRule::new("all")),
            Box::new(BasicRule::new("x").with_recipe("true")),
        ]);
        assert_eq!(mf.default_rule().map(|r| r.target()).as_deref(), Some("all"));
        assert_eq!(mf.rule("x").map(|r| r.recipes()), Some(vec!["true".to_string()]));
        assert!(mf.rule("y").is_none());
        assert_eq!(mf.targets(), vec!["all", "x"]);
    }

    #[test]
    fn test_empty_makefile() {
        let mf = Makefile::default();
        assert!(mf.default_rule().is_none());
        assert_eq!(mf.marshal(), "");
    }
}
