//! Command implementations.

pub mod cache;
pub mod completions;
pub mod graph;
pub mod projects;
pub mod version;
