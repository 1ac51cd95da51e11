//! Global context for pomgraph operations.
//!
//! Provides centralized access to the working directory, the workspace root
//! and the workspace-data cache location.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::util::config::WORKSPACE_CONFIG_FILE;

/// Name of the per-workspace pomgraph directory.
pub const POMGRAPH_DIR: &str = ".pomgraph";

/// Global context containing paths and output settings.
#[derive(Debug, Clone)]
pub struct GlobalContext {
    /// Current working directory
    cwd: PathBuf,

    /// Workspace root (directory containing nx.json)
    workspace_root: PathBuf,

    /// Whether to use colors in output
    color: bool,
}

impl GlobalContext {
    /// Create a new GlobalContext rooted at the nearest workspace above the cwd.
    pub fn new() -> Result<Self> {
        let cwd = std::env::current_dir().context("failed to get current directory")?;
        Ok(Self::with_cwd(cwd))
    }

    /// Create a GlobalContext with a specific working directory.
    pub fn with_cwd(cwd: PathBuf) -> Self {
        let workspace_root = find_workspace_root(&cwd).unwrap_or_else(|| cwd.clone());
        GlobalContext {
            cwd,
            workspace_root,
            color: true,
        }
    }

    /// Use an explicit workspace root instead of the discovered one.
    pub fn with_workspace_root(mut self, root: &Path) -> Self {
        self.workspace_root = if root.is_absolute() {
            root.to_path_buf()
        } else {
            self.cwd.join(root)
        };
        self
    }

    /// Set color output.
    pub fn set_color(&mut self, color: bool) {
        self.color = color;
    }

    /// Get the current working directory.
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Get the workspace root.
    pub fn workspace_root(&self) -> &Path {
        &self.workspace_root
    }

    /// Get the workspace-data cache directory.
    pub fn cache_dir(&self) -> PathBuf {
        self.workspace_root.join(POMGRAPH_DIR).join("workspace-data")
    }

    /// Check if color output is enabled.
    pub fn color(&self) -> bool {
        self.color
    }
}

/// Find the nearest directory at or above `start` containing `nx.json`.
pub fn find_workspace_root(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(WORKSPACE_CONFIG_FILE).is_file())
        .map(Path::to_path_buf)
}
