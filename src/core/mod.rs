//! Core data structures for pomgraph.
//!
//! This module contains the foundational types used throughout pomgraph:
//! - Parsed manifests (`PomManifest`) and dependency kinds
//! - The project registry (`Project`, `WorkspaceData`)
//! - Target definitions and `project.json` overrides
//! - Workspace discovery

pub mod errors;
pub mod manifest;
pub mod project;
pub mod target;
pub mod workspace;

pub use errors::{GraphError, GraphResult};
pub use manifest::{DependencyKind, PomManifest, MANIFEST_NAME};
pub use project::{Project, WorkspaceData};
pub use target::TargetSpec;
pub use workspace::{WorkspaceDiscovery, WorkspaceWalker};
