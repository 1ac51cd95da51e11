//! Dependency edge inference.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::errors::{GraphError, GraphResult};
use crate::core::manifest::DependencyKind;
use crate::core::project::{Project, WorkspaceData};
use crate::util::config::Config;

/// How the orchestrator treats an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencyType {
    /// Derived from manifest content, no runtime information involved
    Static,
}

/// Why an edge exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeKind {
    Parent,
    Aggregator,
    Dependency(DependencyKind),
}

impl fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EdgeKind::Parent => write!(f, "parent"),
            EdgeKind::Aggregator => write!(f, "aggregator"),
            EdgeKind::Dependency(kind) => write!(f, "{} dependency", kind),
        }
    }
}

/// A directed edge `source -> target` between two projects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphEdge {
    pub source: String,
    pub target: String,

    /// Workspace-relative manifest declaring the edge
    pub source_file: String,

    #[serde(rename = "type")]
    pub dependency_type: DependencyType,

    #[serde(skip)]
    pub kind: EdgeKind,
}

/// Checks an edge before it is accepted into the graph.
pub trait DependencyValidator {
    fn validate(&self, edge: &GraphEdge, workspace: &WorkspaceData) -> GraphResult<()>;
}

/// Both ends must be emitted projects and an edge may not loop.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultValidator;

impl DependencyValidator for DefaultValidator {
    fn validate(&self, edge: &GraphEdge, workspace: &WorkspaceData) -> GraphResult<()> {
        let reason = if !workspace.is_emitted(&edge.source) {
            Some(format!("`{}` is not a project of the graph", edge.source))
        } else if !workspace.is_emitted(&edge.target) {
            Some(format!("`{}` is not a project of the graph", edge.target))
        } else if edge.source == edge.target {
            Some(format!("{} edge points back to its own project", edge.kind))
        } else {
            None
        };

        match reason {
            Some(reason) => Err(GraphError::InvalidDependency {
                source_project: edge.source.clone(),
                target: edge.target.clone(),
                source_file: edge.source_file.clone(),
                reason,
            }),
            None => Ok(()),
        }
    }
}

/// Build every edge of the workspace graph.
///
/// Edges are emitted per project in registry order: parent, aggregator, then
/// main, profile and plugin dependencies. Within one dependency kind, targets
/// come in registry order whatever the order of the `<dependency>` entries.
pub fn build_edges(
    workspace: &WorkspaceData,
    config: &Config,
    validator: &dyn DependencyValidator,
) -> GraphResult<Vec<GraphEdge>> {
    let mut edges = Vec::new();

    for project in workspace.emitted_projects() {
        for edge in project_edges(project, workspace, config) {
            validator.validate(&edge, workspace)?;
            edges.push(edge);
        }
    }

    debug!(edges = edges.len(), "built dependency edges");
    Ok(edges)
}

fn project_edges(project: &Project, workspace: &WorkspaceData, config: &Config) -> Vec<GraphEdge> {
    let mut targets: Vec<(&str, EdgeKind)> = Vec::new();

    let parent = project.parent_project_artifact_id.as_deref();
    if let Some(parent) = parent {
        targets.push((parent, EdgeKind::Parent));
    }

    if !config.options.graph_options.skip_aggregator_project_linking {
        if let Some(aggregator) = project.aggregator_project_artifact_id.as_deref() {
            if Some(aggregator) != parent {
                targets.push((aggregator, EdgeKind::Aggregator));
            }
        }
    }

    // dependency targets follow registry order, once each per kind
    for kind in DependencyKind::ALL {
        let declared: HashSet<&str> = project
            .dependencies(kind)
            .iter()
            .map(String::as_str)
            .collect();

        for unknown in project
            .dependencies(kind)
            .iter()
            .filter(|id| workspace.get(id).is_none())
        {
            debug!(
                source = %project.artifact_id,
                target = %unknown,
                kind = %kind,
                "dependency is not a workspace project"
            );
        }

        targets.extend(
            workspace
                .projects
                .keys()
                .filter(|id| declared.contains(id.as_str()))
                .map(|id| (id.as_str(), EdgeKind::Dependency(kind))),
        );
    }

    let source_file = project.source_file();

    targets
        .into_iter()
        .filter(|(target, kind)| {
            let known = workspace.is_emitted(target);
            if !known {
                debug!(
                    source = %project.artifact_id,
                    target = %target,
                    kind = %kind,
                    "dropping edge to a project outside the graph"
                );
            }
            known
        })
        .map(|(target, kind)| GraphEdge {
            source: project.artifact_id.clone(),
            target: target.to_string(),
            source_file: source_file.clone(),
            dependency_type: DependencyType::Static,
            kind,
        })
        .collect()
}
