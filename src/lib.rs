//! pomgraph - project graph inference for Maven workspaces
//!
//! This crate reads the pom.xml files of a multi-module Maven build and
//! derives the project graph a monorepo orchestrator needs: one project per
//! module with build and test targets, and the static dependency edges
//! between modules.

pub mod cache;
pub mod core;
pub mod graph;
pub mod ops;
pub mod resolver;
pub mod util;

/// Test utilities and mocks for pomgraph unit tests.
///
/// This module is only available when compiling with `--cfg test` or
/// running tests.
#[cfg(test)]
pub mod test_support;

pub use cache::WorkspaceDataCache;
pub use core::{GraphError, GraphResult, PomManifest, Project, WorkspaceData, WorkspaceWalker};
pub use graph::{GraphEdge, ProjectGraph, ProjectNode};
pub use resolver::{ExpressionEvaluator, MavenEvaluator};
pub use util::context::GlobalContext;
