//! pomgraph CLI - project graph inference for Maven workspaces

use std::io::IsTerminal;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use pomgraph::util::context::find_workspace_root;
use pomgraph::util::diagnostic::{emit, suggestions, Diagnostic};
use pomgraph::{GlobalContext, GraphError};

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    let color = !cli.no_color && std::io::stderr().is_terminal();

    if let Err(e) = run(cli, color) {
        match e.downcast_ref::<GraphError>() {
            Some(err) => emit(&err.to_diagnostic(), color),
            None => eprintln!("error: {:#}", e),
        }
        std::process::exit(1);
    }
}

fn run(cli: Cli, color: bool) -> Result<()> {
    // Logs go to stderr; stdout carries JSON
    let filter = if cli.verbose {
        EnvFilter::new("pomgraph=debug")
    } else {
        EnvFilter::new("pomgraph=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_ansi(color)
        .with_writer(std::io::stderr)
        .init();

    let mut ctx = GlobalContext::new()?;
    ctx.set_color(color);

    let ctx = match cli.root {
        Some(ref root) => ctx.with_workspace_root(root),
        None => {
            if needs_workspace(&cli.command) && find_workspace_root(ctx.cwd()).is_none() {
                emit(
                    &Diagnostic::warning(format!(
                        "no nx.json found, using {} as the workspace root",
                        ctx.cwd().display()
                    ))
                    .with_help(suggestions::NO_WORKSPACE),
                    color,
                );
            }
            ctx
        }
    };

    let no_cache = cli.no_cache;

    match cli.command {
        Commands::Graph(args) => commands::graph::execute(&ctx, args, no_cache),
        Commands::Projects(args) => commands::projects::execute(&ctx, args, no_cache),
        Commands::Version(args) => commands::version::execute(&ctx, args, no_cache),
        Commands::Cache(args) => commands::cache::execute(&ctx, args),
        Commands::Completions(args) => commands::completions::execute(args),
    }
}

fn needs_workspace(command: &Commands) -> bool {
    !matches!(command, Commands::Completions(_))
}
