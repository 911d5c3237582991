use anyhow::{Context, Result};
use colored::*;
use comfy_table::{presets, Table};
use std::path::Path;
use tracing::info;

use crate::toolchain::{AddOpt, AvailableTool, ToolchainInfo, Toolchains};

fn plain_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::NOTHING).set_header(header);
    table
}

/// Execution methods a toolchain supports, e.g. `program, docker`.
fn exec_types(toolchain: &ToolchainInfo) -> String {
    let mut types = Vec::new();
    if toolchain.has_program() {
        types.push("program");
    }
    if toolchain.has_dockerfile() {
        types.push("docker");
    }
    types.join(", ")
}

pub fn render_toolchains(toolchains: &[ToolchainInfo]) -> String {
    let mut table = plain_table(vec!["PATH", "TYPE"]);
    for tc in toolchains {
        table.add_row(vec![tc.path.clone(), exec_types(tc)]);
    }
    table.to_string()
}

pub fn render_tools(tools: &[AvailableTool]) -> String {
    let mut table = plain_table(vec!["TOOLCHAIN", "TOOL", "OP", "SOURCE UNIT TYPES"]);
    for t in tools {
        table.add_row(vec![
            t.toolchain.path.clone(),
            t.tool.subcmd.clone(),
            t.tool.op.clone(),
            t.tool.source_unit_types.join(" "),
        ]);
    }
    table.to_string()
}

pub fn list(toolchains: &Toolchains) -> Result<()> {
    let found = toolchains.list()?;
    println!("{}", render_toolchains(&found));
    Ok(())
}

pub fn list_tools(
    toolchains: &Toolchains,
    op: Option<&str>,
    unit_type: Option<&str>,
    only: &[String],
) -> Result<()> {
    let tools: Vec<AvailableTool> = toolchains
        .list_tools(op, unit_type)?
        .into_iter()
        .filter(|t| only.is_empty() || only.contains(&t.toolchain.path))
        .collect();
    println!("{}", render_tools(&tools));
    Ok(())
}

pub fn add(toolchains: &Toolchains, dir: &Path, toolchain_path: &str, force: bool) -> Result<()> {
    toolchains
        .add(dir, toolchain_path, AddOpt { force })
        .with_context(|| format!("Failed to add toolchain {}", toolchain_path))?;
    println!(
        "{} {} -> {}",
        "Added".green(),
        toolchain_path,
        dir.display()
    );
    Ok(())
}

pub fn get(toolchains: &Toolchains, paths: &[String], update: bool) -> Result<()> {
    for path in paths {
        info!(toolchain = %path, "getting toolchain");
        let tc = toolchains.get(path, update)?;
        println!("{} {} ({})", "OK".green(), tc.path, tc.dir.display());
    }
    Ok(())
}

pub fn temp_dir(toolchains: &Toolchains, toolchain_path: &str) -> Result<()> {
    let dir = toolchains
        .temp_dir(toolchain_path)
        .map_err(|e| anyhow::anyhow!("{}", format!("Failed to get/create temp dir: {}", e).red()))?;
    print!("{}", dir.display());
    Ok(())
}
