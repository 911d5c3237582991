use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::{ExecMethod, SEARCH_PATH_ENV};

#[derive(Parser, Debug)]
#[command(name = "src")]
#[command(about = "Toolchain discovery and build planning for source analysis", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Colon-separated toolchain search path (first entry receives installs)
    #[arg(long = "srclibpath", env = SEARCH_PATH_ENV, global = true)]
    pub srclibpath: Option<String>,

    /// Increase verbosity level (can be repeated: -v, -vv, -vvv)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    pub verbosity: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the Makefile that builds a source tree
    Makefile {
        /// Source tree JSON file ({"SourceUnits": [...]})
        #[arg(long, default_value = "srclib-tree.json")]
        tree: PathBuf,

        /// Directory that build outputs are written under
        #[arg(long = "data-dir", default_value = ".srclib-cache")]
        data_dir: String,

        #[command(flatten)]
        exec: ExecArgs,

        #[command(flatten)]
        cache: CacheArgs,

        /// Write the Makefile here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Manage installed toolchains
    Toolchain {
        #[command(subcommand)]
        command: ToolchainCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum ToolchainCommands {
    /// List installed toolchains
    List,

    /// List tools offered by installed toolchains
    ListTools {
        /// Only tools performing this operation
        #[arg(short = 'p', long)]
        op: Option<String>,

        /// Only tools accepting this source unit type
        #[arg(short = 'u', long = "source-unit-type")]
        source_unit_type: Option<String>,

        /// Only tools in these toolchains
        toolchains: Vec<String>,
    },

    /// Install a local toolchain directory under a toolchain path
    Add {
        /// Toolchain path to install as, e.g. example.com/my/toolchain
        toolchain_path: String,

        /// Directory containing the toolchain (defaults to the current directory)
        #[arg(default_value = ".")]
        dir: PathBuf,

        /// Replace an existing toolchain at the same path
        #[arg(short, long)]
        force: bool,
    },

    /// Fetch toolchains that are not installed yet
    Get {
        /// Toolchain paths, e.g. sourcegraph.com/sourcegraph/srclib-go
        #[arg(required = true)]
        toolchains: Vec<String>,

        /// Accepted for compatibility; installed toolchains are left as they are
        #[arg(short, long)]
        update: bool,
    },

    /// Print (and create) a toolchain's scratch directory
    TempDir {
        toolchain_path: String,
    },
}

/// How recipes run toolchains.
#[derive(Args, Debug, Clone)]
pub struct ExecArgs {
    /// Toolchain execution methods, in order of preference
    #[arg(long, value_enum, value_delimiter = ',', default_value = "program,docker")]
    pub methods: Vec<ExecMethod>,
}

#[derive(Args, Debug, Clone, Copy, Default)]
pub struct CacheArgs {
    /// Do not read from the build cache (passed through; the generated plan is unchanged)
    #[arg(long = "no-cache-read")]
    pub no_cache_read: bool,

    /// Do not write results to the build cache (sets `Options::no_cache`)
    #[arg(long = "no-cache-write")]
    pub no_cache_write: bool,
}
