//! CLI argument parsing via `clap`.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "packlint",
    version,
    about = "CI linter for Minecraft datapacks",
    long_about = "packlint — lint every .mcfunction/.json resource under a workspace's datapacks.\n\nConfiguration precedence: CLI > packlint.toml > defaults.",
    after_help = "Examples:\n  packlint check\n  packlint check --workspace-root ./pack --output github\n  packlint check --settings .vscode/settings.json --output json",
    arg_required_else_help = true
)]
/// Top-level CLI options and subcommands.
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand)]
/// Supported subcommands.
pub enum Commands {
    /// Show version
    #[command(about = "Show version", long_about = "Print the current packlint version.")]
    Version,
    /// Lint datapacks under the workspace
    #[command(
        about = "Run datapack checks",
        long_about = "Discover datapack roots under the workspace and lint every .mcfunction/.json file in their data trees. Any error or warning diagnostic fails the run.",
        after_help = "Examples:\n  packlint check\n  packlint check --output github\n  packlint check --workspace-root ./my-pack"
    )]
    Check {
        #[arg(long, help = "Workspace root (default: discovered from current dir)")]
        workspace_root: Option<String>,
        #[arg(long, help = "Datapack settings file (default: .vscode/settings.json)")]
        settings: Option<String>,
        #[arg(long, help = "Output mode: human|json|github (default: human)")]
        output: Option<String>,
        #[arg(long, help = "Analyzer storage directory (default: _storage)")]
        storage: Option<String>,
    },
}
