//! Project graph operation.

use anyhow::Result;

use crate::graph::{DefaultValidator, ProjectGraph};
use crate::ops::workspace::{load_workspace, LoadOptions};
use crate::resolver::ExpressionEvaluator;
use crate::util::GlobalContext;

/// Infer the project graph of the workspace in `ctx`.
pub fn infer_graph(
    ctx: &GlobalContext,
    opts: &LoadOptions,
    evaluator: &dyn ExpressionEvaluator,
) -> Result<ProjectGraph> {
    let loaded = load_workspace(ctx, opts)?;
    let graph = ProjectGraph::build(&loaded.data, &loaded.config, evaluator, &DefaultValidator)?;

    tracing::debug!(
        nodes = graph.nodes.len(),
        edges = graph.edges.len(),
        "inferred project graph"
    );
    Ok(graph)
}
