//! Workspace discovery.
//!
//! Walks the module tree depth-first from the root pom.xml and collects
//! every project into a [`WorkspaceData`] registry.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::core::errors::{GraphError, GraphResult};
use crate::core::manifest::{PomManifest, MANIFEST_NAME};
use crate::core::project::{Project, WorkspaceData};
use crate::util::config::Config;
use crate::util::fs::normalize_lexically;

/// Source of workspace data.
///
/// The cache computes data through this trait so the discovery step can be
/// observed and replaced in tests.
pub trait WorkspaceDiscovery: Send + Sync {
    /// Discover the complete workspace for a configuration.
    fn discover(&self, config: &Config) -> GraphResult<WorkspaceData>;
}

/// Depth-first module walker.
#[derive(Debug, Clone, Copy, Default)]
pub struct WorkspaceWalker;

impl WorkspaceWalker {
    /// Discover every module reachable from `<mavenRootDir>/pom.xml`.
    pub fn discover_all(config: &Config) -> GraphResult<WorkspaceData> {
        let root_manifest = config.root_manifest();
        debug!(manifest = %root_manifest.display(), "discovering workspace");

        let mut seen = HashSet::new();
        let projects = walk(&root_manifest, None, config, &mut seen)?;

        let mut data = WorkspaceData::new(config);
        for project in projects {
            data.insert(project);
        }

        data.validate_references()?;
        debug!(projects = data.projects.len(), "workspace discovered");
        Ok(data)
    }
}

impl WorkspaceDiscovery for WorkspaceWalker {
    fn discover(&self, config: &Config) -> GraphResult<WorkspaceData> {
        WorkspaceWalker::discover_all(config)
    }
}

/// Projects of the subtree rooted at `manifest_path`, in preorder.
fn walk(
    manifest_path: &Path,
    aggregator: Option<&str>,
    config: &Config,
    seen: &mut HashSet<PathBuf>,
) -> GraphResult<Vec<Project>> {
    if !seen.insert(manifest_path.to_path_buf()) {
        return Err(GraphError::DuplicateModule {
            path: manifest_path.to_path_buf(),
        });
    }

    let manifest = PomManifest::read(manifest_path)?;
    let project = Project::from_manifest(&manifest, aggregator, config)?;
    debug!(
        artifact_id = %project.artifact_id,
        root = %project.project_root,
        "found project"
    );

    let dir = manifest_path.parent().unwrap_or(Path::new("."));
    let mut subtree = Vec::new();
    for module in manifest.sub_module_paths() {
        let module_manifest = module_manifest_path(dir, module);
        subtree.extend(walk(
            &module_manifest,
            Some(&project.artifact_id),
            config,
            seen,
        )?);
    }

    let mut projects = Vec::with_capacity(subtree.len() + 1);
    projects.push(project);
    projects.extend(subtree);
    Ok(projects)
}

/// A `<module>` names a directory, or its `pom.xml` directly.
///
/// Pom files under any other name are not accepted: the cache key only
/// covers files named `pom.xml`.
fn module_manifest_path(dir: &Path, module: &str) -> PathBuf {
    let target = normalize_lexically(&dir.join(module));
    if target.file_name().is_some_and(|name| name == MANIFEST_NAME) {
        target
    } else {
        target.join(MANIFEST_NAME)
    }
}
