use crate::output::OutputFormat;
use crate::sync::SyncScope;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

fn get_version() -> &'static str {
    const BASE_VERSION: &str = env!("CARGO_PKG_VERSION");

    // Release builds are tagged; use the tag as-is.
    if let Some(tag) = option_env!("DOTNETMAN_GIT_TAG") {
        return tag;
    }

    let commit = option_env!("DOTNETMAN_GIT_COMMIT").unwrap_or("unknown");
    let branch = option_env!("DOTNETMAN_GIT_BRANCH").unwrap_or("unknown");

    // Leaked once at startup so clap can hold a &'static str.
    let version = format!("v{}-{} ({})", BASE_VERSION, commit, branch);
    Box::leak(version.into_boxed_str())
}

#[derive(Parser)]
#[command(name = "dotnetman")]
#[command(about = "A CLI manager for .NET SDK and runtime installations")]
#[command(version = get_version(), propagate_version = true)]
pub struct Cli {
    /// Increase verbosity (use multiple times for more detail)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Reduce output to errors only
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List installed .NET SDKs and runtimes
    #[command(
        visible_aliases = ["ls", "get"],
        after_help = "Examples:\n  dotnetman list\n  dotnetman list sdk --output json\n  dotnetman list runtime -p /family -p /major --exclude-empty"
    )]
    List {
        /// Only list this kind of installation
        #[arg(value_enum)]
        target: Option<ListTarget>,

        #[command(flatten)]
        display: OutputArgs,

        /// Do not look up lifecycle (end-of-life) information
        #[arg(long)]
        no_lifecycle: bool,
    },

    /// Re-install the latest patch of installed or requested channels
    #[command(
        visible_alias = "s",
        after_help = "Examples:\n  dotnetman sync\n  dotnetman sync sdk --channel 8.0\n  dotnetman sync --file dotnet-versions.json"
    )]
    Sync {
        /// What to synchronize
        #[arg(value_enum, default_value_t = SyncScope::All)]
        target: SyncScope,

        /// Channel to synchronize (e.g. '8.0', 'LTS'); may be repeated
        #[arg(long = "channel", value_name = "CHANNEL")]
        channels: Vec<String>,

        /// JSON version config to synchronize from. Mutually exclusive with all other arguments
        #[arg(long, value_name = "PATH", conflicts_with_all = ["target", "channels"])]
        file: Option<PathBuf>,
    },

    /// Install .NET or a global tool
    #[command(visible_alias = "i")]
    Install {
        #[command(subcommand)]
        what: InstallTarget,
    },

    /// Update a global tool
    #[command(visible_alias = "u")]
    Update {
        #[command(subcommand)]
        what: UpdateTarget,
    },

    /// Show the current version
    Version,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ListTarget {
    Sdk,
    Runtime,
}

#[derive(clap::Args, Debug, Clone, Default)]
pub struct OutputArgs {
    /// Output format [default: $LIST_PREFERENCE or tsv]
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    /// Only show these properties (JSON pointer, e.g. '/major'); may be repeated
    #[arg(short, long = "property", value_name = "PATH")]
    pub properties: Vec<String>,

    /// Drop entries left empty after property filtering
    #[arg(long)]
    pub exclude_empty: bool,
}

#[derive(Subcommand)]
pub enum InstallTarget {
    /// Install the .NET SDK
    Dotnet {
        /// Channel to install
        #[arg(long, default_value = "LTS")]
        channel: String,
    },
    /// Install PowerShell as a global .NET tool
    #[command(visible_alias = "powershell")]
    Pwsh,
}

#[derive(Subcommand)]
pub enum UpdateTarget {
    /// Update the PowerShell global tool
    #[command(visible_alias = "powershell")]
    Pwsh,
}
