//! Workspace loading operations.

use std::sync::Arc;

use anyhow::Result;

use crate::cache::WorkspaceDataCache;
use crate::core::project::WorkspaceData;
use crate::util::config::Config;
use crate::util::GlobalContext;

/// Options for loading workspace data.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Ignore workspace data stored on disk
    pub no_cache: bool,
}

/// Configuration and discovered projects of a workspace.
#[derive(Debug, Clone)]
pub struct LoadedWorkspace {
    pub config: Config,
    pub data: Arc<WorkspaceData>,
}

/// Load the configuration and project registry of the workspace in `ctx`.
pub fn load_workspace(ctx: &GlobalContext, opts: &LoadOptions) -> Result<LoadedWorkspace> {
    let config = Config::load(ctx.workspace_root(), None)?;

    let mut cache = WorkspaceDataCache::new(ctx.cache_dir());
    if opts.no_cache {
        cache = cache.without_disk_reads();
    }

    let data = cache.get(&config)?;
    tracing::debug!(
        root = %ctx.workspace_root().display(),
        projects = data.projects.len(),
        "loaded workspace"
    );

    Ok(LoadedWorkspace { config, data })
}

/// Remove stored workspace data.
pub fn clean_cache(ctx: &GlobalContext) -> Result<()> {
    WorkspaceDataCache::new(ctx.cache_dir()).invalidate()
}
