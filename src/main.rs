use anyhow::Result;
use clap::Parser;
use srclib::cli::{Cli, Commands, ToolchainCommands};
use srclib::commands;
use srclib::commands::makefile::MakefileConfig;
use srclib::config::{SearchPath, ToolchainExecOpt};
use srclib::observability::init_tracing;
use srclib::toolchain::Toolchains;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbosity);

    let search_path = SearchPath::resolve(cli.srclibpath.as_deref());
    tracing::debug!(search_path = %search_path, "resolved toolchain search path");
    let toolchains = Toolchains::new(search_path);

    match cli.command {
        Commands::Makefile {
            tree,
            data_dir,
            exec,
            cache,
            output,
        } => {
            let config = MakefileConfig {
                tree,
                data_dir,
                exec_opt: ToolchainExecOpt::new(exec.methods),
                cache,
                output,
            };
            commands::makefile::print_makefile(&config, &toolchains)
        }
        Commands::Toolchain { command } => handle_toolchain_command(command, &toolchains),
    }
}

fn handle_toolchain_command(command: ToolchainCommands, toolchains: &Toolchains) -> Result<()> {
    match command {
        ToolchainCommands::List => commands::toolchain::list(toolchains),
        ToolchainCommands::ListTools {
            op,
            source_unit_type,
            toolchains: only,
        } => commands::toolchain::list_tools(
            toolchains,
            op.as_deref(),
            source_unit_type.as_deref(),
            &only,
        ),
        ToolchainCommands::Add {
            toolchain_path,
            dir,
            force,
        } => commands::toolchain::add(toolchains, &dir, &toolchain_path, force),
        ToolchainCommands::Get {
            toolchains: paths,
            update,
        } => commands::toolchain::get(toolchains, &paths, update),
        ToolchainCommands::TempDir { toolchain_path } => {
            commands::toolchain::temp_dir(toolchains, &toolchain_path)
        }
    }
}
