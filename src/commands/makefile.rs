use anyhow::{Context, Result};
use std::io::Write;
use std::path::PathBuf;
use tracing::{debug, warn};

use crate::cli::CacheArgs;
use crate::config::{ToolchainExecOpt, Tree};
use crate::ops::builtin_registry;
use crate::plan::{create_makefile, Makefile, Options};
use crate::toolchain::ToolChooser;

#[derive(Debug, Clone)]
pub struct MakefileConfig {
    pub tree: PathBuf,
    pub data_dir: String,
    pub exec_opt: ToolchainExecOpt,
    pub cache: CacheArgs,
    pub output: Option<PathBuf>,
}

/// Plan the tree in `config.tree` with the built-in operations.
pub fn build_makefile(config: &MakefileConfig, tools: &dyn ToolChooser) -> Result<Makefile> {
    let tree = Tree::from_json_file(&config.tree)
        .with_context(|| format!("Failed to read source tree {}", config.tree.display()))?;
    if tree.source_units.is_empty() {
        warn!("No source units found in {}; there is nothing to build", config.tree.display());
    }
    // Cache flags only travel with the plan; neither alters the rules.
    if config.cache.no_cache_read {
        debug!("build cache reads disabled");
    }

    let registry = builtin_registry()?;
    let options = Options {
        no_cache: config.cache.no_cache_write,
        toolchain_exec_opt: config.exec_opt.to_option_string(),
    };
    Ok(create_makefile(&registry, &config.data_dir, &tree, &options, tools)?)
}

/// Print the Makefile to stdout or `config.output`.
pub fn print_makefile(config: &MakefileConfig, tools: &dyn ToolChooser) -> Result<()> {
    let makefile = build_makefile(config, tools)?;
    let rendered = makefile.marshal();

    match &config.output {
        Some(path) => std::fs::write(path, rendered)
            .with_context(|| format!("Failed to write Makefile to {}", path.display()))?,
        None => std::io::stdout().lock().write_all(rendered.as_bytes())?,
    }
    Ok(())
}
