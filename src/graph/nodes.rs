//! Graph nodes.

use indexmap::IndexMap;
use serde::Serialize;

use crate::core::errors::GraphResult;
use crate::core::project::WorkspaceData;
use crate::graph::targets::{synthesize_targets, Targets};
use crate::resolver::ExpressionEvaluator;
use crate::util::config::Config;

/// Tag attached to every inferred project.
pub const PROJECT_TAG: &str = "pomgraph";

/// A project as handed to the orchestrator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectNode {
    /// Workspace-relative project directory
    pub root: String,
    pub name: String,
    pub targets: Targets,
    pub tags: Vec<String>,
}

/// One node per emitted project, keyed by project root.
pub fn create_nodes(
    workspace: &WorkspaceData,
    config: &Config,
    evaluator: &dyn ExpressionEvaluator,
) -> GraphResult<IndexMap<String, ProjectNode>> {
    let mut nodes = IndexMap::new();

    for project in workspace.emitted_projects() {
        let targets = synthesize_targets(project, workspace, config, evaluator)?;
        nodes.insert(
            project.project_root.clone(),
            ProjectNode {
                root: project.project_root.clone(),
                name: project.artifact_id.clone(),
                targets,
                tags: vec![PROJECT_TAG.to_string()],
            },
        );
    }

    Ok(nodes)
}
