//! Project graph inference.
//!
//! Turns the project registry into what the orchestrator consumes: one node
//! per project with its targets, and the static dependency edges between
//! projects.

pub mod edges;
pub mod nodes;
pub mod targets;

pub use edges::{
    build_edges, DefaultValidator, DependencyType, DependencyValidator, EdgeKind, GraphEdge,
};
pub use nodes::{create_nodes, ProjectNode, PROJECT_TAG};
pub use targets::{output_dir_local_repo, synthesize_targets, Targets};

use indexmap::IndexMap;
use serde::Serialize;

use crate::core::errors::GraphResult;
use crate::core::project::WorkspaceData;
use crate::resolver::ExpressionEvaluator;
use crate::util::config::Config;

/// Nodes and edges of a workspace.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectGraph {
    pub nodes: IndexMap<String, ProjectNode>,
    pub edges: Vec<GraphEdge>,
}

impl ProjectGraph {
    /// Infer the complete graph of a discovered workspace.
    pub fn build(
        workspace: &WorkspaceData,
        config: &Config,
        evaluator: &dyn ExpressionEvaluator,
        validator: &dyn DependencyValidator,
    ) -> GraphResult<Self> {
        Ok(ProjectGraph {
            nodes: create_nodes(workspace, config, evaluator)?,
            edges: build_edges(workspace, config, validator)?,
        })
    }
}
