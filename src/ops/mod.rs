//! High-level operations.
//!
//! This module contains the implementation of pomgraph commands.

pub mod graph;
pub mod projects;
pub mod workspace;

pub use graph::infer_graph;
pub use projects::{effective_version, list_projects, ProjectSummary};
pub use workspace::{clean_cache, load_workspace, LoadOptions, LoadedWorkspace};
