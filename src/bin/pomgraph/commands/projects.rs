//! `pomgraph projects` command

use anyhow::Result;

use crate::cli::ProjectsArgs;
use pomgraph::ops::{list_projects, LoadOptions, ProjectSummary};
use pomgraph::GlobalContext;

pub fn execute(ctx: &GlobalContext, args: ProjectsArgs, no_cache: bool) -> Result<()> {
    let projects = list_projects(ctx, &LoadOptions { no_cache })?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&projects)?);
        return Ok(());
    }

    if projects.is_empty() {
        println!("No projects found");
        return Ok(());
    }

    let width = projects
        .iter()
        .map(|p| p.artifact_id.len())
        .max()
        .unwrap_or(0);

    for project in &projects {
        println!("{}", format_row(project, width, ctx.color()));
    }

    Ok(())
}

fn format_row(project: &ProjectSummary, width: usize, color: bool) -> String {
    let mut row = format!(
        "{:<width$}  {}  (deps: {}, profile: {}, plugin: {})",
        project.artifact_id,
        project.root,
        project.dependencies,
        project.profile_dependencies,
        project.plugin_dependencies,
        width = width
    );

    if project.aggregator {
        row.push_str(" [aggregator]");
    }
    if project.skipped {
        row.push_str(" [skipped]");
        if color {
            row = format!("\x1b[2m{}\x1b[0m", row);
        }
    }
    row
}
