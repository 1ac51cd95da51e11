//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

/// pomgraph - project graph inference for Maven workspaces
#[derive(Parser)]
#[command(name = "pomgraph")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Workspace root (defaults to the nearest directory containing nx.json)
    #[arg(long, global = true, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Ignore workspace data stored on disk
    #[arg(long, global = true)]
    pub no_cache: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the project graph as JSON
    Graph(GraphArgs),

    /// List the projects of the workspace
    Projects(ProjectsArgs),

    /// Print the effective version of a project
    Version(VersionArgs),

    /// Manage the workspace data cache
    Cache(CacheArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args)]
pub struct GraphArgs {
    /// Only print nodes
    #[arg(long, conflicts_with = "edges_only")]
    pub nodes_only: bool,

    /// Only print edges
    #[arg(long)]
    pub edges_only: bool,
}

#[derive(Args)]
pub struct ProjectsArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct VersionArgs {
    /// artifactId of the project
    pub artifact_id: String,
}

#[derive(Args)]
pub struct CacheArgs {
    #[command(subcommand)]
    pub command: CacheCommands,
}

#[derive(Subcommand)]
pub enum CacheCommands {
    /// Show the cache directory
    Path,

    /// List stored workspace data files
    List,

    /// Remove stored workspace data
    Clean,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
