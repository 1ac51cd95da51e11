//! Project registry queries.

use anyhow::{anyhow, Result};
use serde::Serialize;

use crate::core::manifest::DependencyKind;
use crate::ops::workspace::{load_workspace, LoadOptions};
use crate::resolver::{resolve_effective_version, ExpressionEvaluator};
use crate::util::GlobalContext;

/// One registry entry, as listed by `pomgraph projects`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSummary {
    pub artifact_id: String,
    pub root: String,
    pub aggregator: bool,
    pub skipped: bool,
    pub dependencies: usize,
    pub profile_dependencies: usize,
    pub plugin_dependencies: usize,
}

/// List every project of the registry, skipped ones included.
pub fn list_projects(ctx: &GlobalContext, opts: &LoadOptions) -> Result<Vec<ProjectSummary>> {
    let loaded = load_workspace(ctx, opts)?;

    Ok(loaded
        .data
        .projects
        .values()
        .map(|p| ProjectSummary {
            artifact_id: p.artifact_id.clone(),
            root: p.project_root.clone(),
            aggregator: p.is_aggregator_packaging,
            skipped: p.skip_project,
            dependencies: p.dependencies(DependencyKind::Main).len(),
            profile_dependencies: p.dependencies(DependencyKind::Profile).len(),
            plugin_dependencies: p.dependencies(DependencyKind::Plugin).len(),
        })
        .collect())
}

/// Resolve the effective version of one project.
pub fn effective_version(
    ctx: &GlobalContext,
    opts: &LoadOptions,
    artifact_id: &str,
    evaluator: &dyn ExpressionEvaluator,
) -> Result<String> {
    let loaded = load_workspace(ctx, opts)?;
    let project = loaded
        .data
        .get(artifact_id)
        .ok_or_else(|| anyhow!("no project with artifactId `{}` in the workspace", artifact_id))?;

    Ok(resolve_effective_version(project, &loaded.data, evaluator)?)
}
