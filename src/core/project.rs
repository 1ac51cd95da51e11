//! Project registry types.
//!
//! A [`Project`] is the flattened, serializable view of one pom.xml;
//! [`WorkspaceData`] is the registry of every project discovered from the
//! root manifest. Both are persisted by the workspace-data cache.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::core::errors::{GraphError, GraphResult};
use crate::core::manifest::{DependencyKind, PomManifest, MANIFEST_NAME};
use crate::core::target::PROJECT_CONFIG_FILE;
use crate::util::config::Config;
use crate::util::fs::{relative_path, to_slash};

/// One Maven module of the workspace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub group_id: String,
    pub artifact_id: String,

    /// Raw declared version, may contain `${...}` placeholders
    pub version: String,

    /// No aggregator lists this project as a module
    pub is_root_project: bool,

    pub is_aggregator_packaging: bool,

    /// Workspace-relative directory, forward slashes, `.` for the root
    pub project_root: String,

    pub project_absolute_path: PathBuf,

    pub dependencies: Vec<String>,
    pub profile_dependencies: Vec<String>,
    pub plugin_dependencies: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_project_artifact_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggregator_project_artifact_id: Option<String>,

    #[serde(default)]
    pub properties: IndexMap<String, String>,

    /// Excluded from emitted nodes and edges
    #[serde(default)]
    pub skip_project: bool,
}

impl Project {
    /// Build a project from its parsed manifest.
    ///
    /// `aggregator` is the artifactId of the project listing this one as a module.
    pub fn from_manifest(
        manifest: &PomManifest,
        aggregator: Option<&str>,
        config: &Config,
    ) -> GraphResult<Self> {
        let dir = manifest.path().parent().unwrap_or(Path::new("."));
        let project_root = to_slash(&relative_path(&config.workspace_root, dir));

        let skip_project = config.options.graph_options.skip_project_without_project_json
            && !dir.join(PROJECT_CONFIG_FILE).is_file();

        Ok(Project {
            group_id: manifest.group_id()?.to_string(),
            artifact_id: manifest.artifact_id()?.to_string(),
            version: manifest.declared_version()?.to_string(),
            is_root_project: aggregator.is_none(),
            is_aggregator_packaging: manifest.is_aggregator_packaging(),
            project_root,
            project_absolute_path: dir.to_path_buf(),
            dependencies: manifest.dependency_artifact_ids(DependencyKind::Main),
            profile_dependencies: manifest.dependency_artifact_ids(DependencyKind::Profile),
            plugin_dependencies: manifest.dependency_artifact_ids(DependencyKind::Plugin),
            parent_project_artifact_id: manifest.parent_artifact_id().map(str::to_string),
            aggregator_project_artifact_id: aggregator.map(str::to_string),
            properties: manifest.properties().clone(),
            skip_project,
        })
    }

    /// Referenced artifactIds of one dependency kind.
    pub fn dependencies(&self, kind: DependencyKind) -> &[String] {
        match kind {
            DependencyKind::Main => &self.dependencies,
            DependencyKind::Profile => &self.profile_dependencies,
            DependencyKind::Plugin => &self.plugin_dependencies,
        }
    }

    /// Workspace-relative manifest path, as reported on graph edges.
    pub fn source_file(&self) -> String {
        if self.project_root == "." {
            MANIFEST_NAME.to_string()
        } else {
            format!("{}/{}", self.project_root, MANIFEST_NAME)
        }
    }

    /// Absolute manifest path.
    pub fn manifest_path(&self) -> PathBuf {
        self.project_absolute_path.join(MANIFEST_NAME)
    }

    /// Absolute path of the optional `project.json`.
    pub fn project_config_path(&self) -> PathBuf {
        self.project_absolute_path.join(PROJECT_CONFIG_FILE)
    }
}

/// Registry of every project in the workspace, in discovery preorder.
///
/// Built once per cache key and then shared read-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceData {
    /// Working directory of the Maven fallback
    pub maven_root_dir: PathBuf,

    /// artifactId -> project
    pub projects: IndexMap<String, Project>,

    /// Target names whose workspace defaults output to the local repository
    pub target_defaults: Vec<String>,

    pub local_repo: PathBuf,
}

impl WorkspaceData {
    /// Create an empty registry for a configuration.
    pub fn new(config: &Config) -> Self {
        WorkspaceData {
            maven_root_dir: config.maven_root_dir.clone(),
            projects: IndexMap::new(),
            target_defaults: config.target_defaults.clone(),
            local_repo: config.local_repo.clone(),
        }
    }

    /// Add a project. A duplicate artifactId replaces the earlier entry.
    pub fn insert(&mut self, project: Project) {
        if let Some(previous) = self.projects.get(&project.artifact_id) {
            warn!(
                artifact_id = %project.artifact_id,
                previous = %previous.project_root,
                replacement = %project.project_root,
                "duplicate artifactId in workspace, keeping the later project"
            );
        }
        self.projects.insert(project.artifact_id.clone(), project);
    }

    /// Look up a project by artifactId.
    pub fn get(&self, artifact_id: &str) -> Option<&Project> {
        self.projects.get(artifact_id)
    }

    /// Projects that appear in the emitted graph.
    pub fn emitted_projects(&self) -> impl Iterator<Item = &Project> {
        self.projects.values().filter(|p| !p.skip_project)
    }

    /// Check whether `artifact_id` is a project that appears in the emitted graph.
    pub fn is_emitted(&self, artifact_id: &str) -> bool {
        self.get(artifact_id).is_some_and(|p| !p.skip_project)
    }

    /// Every parent and aggregator reference must name a registered project.
    pub fn validate_references(&self) -> GraphResult<()> {
        for project in self.projects.values() {
            let references = [
                ("parent", &project.parent_project_artifact_id),
                ("aggregator", &project.aggregator_project_artifact_id),
            ];

            for (relation, reference) in references {
                if let Some(reference) = reference {
                    if !self.projects.contains_key(reference) {
                        return Err(GraphError::DanglingReference {
                            artifact_id: project.artifact_id.clone(),
                            relation,
                            reference: reference.clone(),
                            path: project.manifest_path(),
                        });
                    }
                }
            }
        }
        Ok(())
    }
}
