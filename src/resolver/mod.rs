//! Version resolution.
//!
//! Declared Maven versions may reference properties (`${revision}`) defined
//! in the project or any of its parents. This module turns them into the
//! concrete version used for local-repository output paths.

pub mod version;

pub use version::{resolve_effective_version, ExpressionEvaluator, MavenEvaluator};
