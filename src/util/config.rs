//! Workspace configuration.
//!
//! The orchestrator's `nx.json` declares this plugin (either by name or as
//! `{ "plugin": ..., "options": ... }`) and workspace-wide target defaults.
//! Everything is normalized once into a [`Config`] that is passed by
//! reference to every component.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::errors::{GraphError, GraphResult};
use crate::core::target::{validate_target_inputs, OUTPUT_DIR_LOCAL_REPO_TOKEN};
use crate::util::fs::normalize_lexically;

/// Name of the orchestrator's workspace configuration file.
pub const WORKSPACE_CONFIG_FILE: &str = "nx.json";

/// Name under which this plugin is registered in `nx.json`.
pub const PLUGIN_NAME: &str = "pomgraph";

/// Raw `nx.json` content relevant to graph inference.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NxJson {
    #[serde(default)]
    pub plugins: Vec<PluginEntry>,

    #[serde(default)]
    pub target_defaults: IndexMap<String, TargetDefaults>,
}

/// A plugin registration.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PluginEntry {
    Name(String),
    Configured {
        plugin: String,
        #[serde(default)]
        options: Option<Value>,
    },
}

impl PluginEntry {
    /// Get the registered plugin name.
    pub fn name(&self) -> &str {
        match self {
            PluginEntry::Name(name) => name,
            PluginEntry::Configured { plugin, .. } => plugin,
        }
    }
}

/// Workspace-wide defaults for one target name.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TargetDefaults {
    #[serde(default)]
    pub outputs: Vec<String>,

    #[serde(default)]
    pub inputs: Vec<Value>,
}

impl NxJson {
    /// Load `nx.json` from a file path.
    pub fn load(path: &Path) -> GraphResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| GraphError::io(path, e))?;

        serde_json::from_str(&content).map_err(|e| GraphError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Load `nx.json` with fallback to defaults if the file doesn't exist.
    pub fn load_or_default(path: &Path) -> GraphResult<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Get this plugin's raw options, if it is registered with any.
    pub fn plugin_options(&self) -> Option<&Value> {
        self.plugins
            .iter()
            .find(|entry| entry.name() == PLUGIN_NAME)
            .and_then(|entry| match entry {
                PluginEntry::Configured { options, .. } => options.as_ref(),
                PluginEntry::Name(_) => None,
            })
    }
}

/// Graph construction switches.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GraphOptions {
    /// Leave out projects without a `project.json`
    pub skip_project_without_project_json: bool,

    /// Do not link sub-modules to their aggregator
    pub skip_aggregator_project_linking: bool,
}

/// Plugin options as declared in `nx.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PluginOptions {
    /// Directory of the root pom.xml, relative to the workspace root
    pub maven_root_directory: String,

    /// Local repository, relative to the Maven root directory
    pub local_repo_relative_path: Option<String>,

    pub build_target_name: String,
    pub test_target_name: String,
    pub serve_target_name: String,
    pub integration_test_target_name: String,
    pub build_image_target_name: String,

    pub graph_options: GraphOptions,
}

impl Default for PluginOptions {
    fn default() -> Self {
        PluginOptions {
            maven_root_directory: String::new(),
            local_repo_relative_path: None,
            build_target_name: "build".to_string(),
            test_target_name: "test".to_string(),
            serve_target_name: "serve".to_string(),
            integration_test_target_name: "integration-test".to_string(),
            build_image_target_name: "build-image".to_string(),
            graph_options: GraphOptions::default(),
        }
    }
}

/// Normalized configuration for one workspace.
///
/// Serialized form is hashed into the workspace-data cache key, so every
/// field that influences the computed data belongs here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Absolute workspace root
    pub workspace_root: PathBuf,

    /// Absolute directory of the root pom.xml
    pub maven_root_dir: PathBuf,

    /// Absolute local artifact repository
    pub local_repo: PathBuf,

    /// Plugin options
    pub options: PluginOptions,

    /// Target names whose defaults output to the local repository
    pub target_defaults: Vec<String>,
}

impl Config {
    /// Create a configuration from explicit options, without target defaults.
    pub fn new(workspace_root: impl Into<PathBuf>, options: PluginOptions) -> Self {
        let workspace_root = workspace_root.into();
        let maven_root_dir =
            normalize_lexically(&workspace_root.join(&options.maven_root_directory));
        let local_repo = match options.local_repo_relative_path {
            Some(ref relative) => normalize_lexically(&maven_root_dir.join(relative)),
            None => default_local_repo(&maven_root_dir),
        };

        Config {
            workspace_root,
            maven_root_dir,
            local_repo,
            options,
            target_defaults: Vec::new(),
        }
    }

    /// Load the configuration of the workspace rooted at `workspace_root`.
    ///
    /// `overrides` replaces the options declared in `nx.json` when given.
    pub fn load(workspace_root: &Path, overrides: Option<PluginOptions>) -> GraphResult<Self> {
        let path = workspace_root.join(WORKSPACE_CONFIG_FILE);
        let nx_json = NxJson::load_or_default(&path)?;

        let options = match overrides {
            Some(options) => options,
            None => match nx_json.plugin_options() {
                Some(raw) => serde_json::from_value(raw.clone()).map_err(|e| GraphError::Config {
                    path: path.clone(),
                    message: format!("invalid `{}` plugin options: {}", PLUGIN_NAME, e),
                })?,
                None => PluginOptions::default(),
            },
        };

        let target_defaults = local_repo_target_defaults(&nx_json, &path)?;
        Ok(Config::new(workspace_root, options).with_target_defaults(target_defaults))
    }

    /// Set the target names whose defaults output to the local repository.
    pub fn with_target_defaults(mut self, target_defaults: Vec<String>) -> Self {
        self.target_defaults = target_defaults;
        self
    }

    /// Path of the root manifest.
    pub fn root_manifest(&self) -> PathBuf {
        self.maven_root_dir.join(crate::core::manifest::MANIFEST_NAME)
    }
}

/// Collect target defaults that output to the local repository, rejecting
/// any that use the placeholder as an input.
fn local_repo_target_defaults(nx_json: &NxJson, path: &Path) -> GraphResult<Vec<String>> {
    let mut names = Vec::new();

    for (target_name, defaults) in &nx_json.target_defaults {
        validate_target_inputs(target_name, path, &defaults.inputs)?;

        if defaults
            .outputs
            .iter()
            .any(|output| output == OUTPUT_DIR_LOCAL_REPO_TOKEN)
        {
            names.push(target_name.clone());
        }
    }

    Ok(names)
}

/// Default local repository (`~/.m2/repository`).
fn default_local_repo(maven_root_dir: &Path) -> PathBuf {
    directories::BaseDirs::new()
        .map(|dirs| dirs.home_dir().join(".m2").join("repository"))
        .unwrap_or_else(|| maven_root_dir.join(".m2").join("repository"))
}
