//! Target definitions - what the orchestrator can run for a project.
//!
//! A target is a named command (build, test, ...) attached to a project.
//! Targets come either from a project-local `project.json` override or are
//! synthesized from the project's manifest.

use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::core::errors::{GraphError, GraphResult};

/// Name of the project-local override descriptor.
pub const PROJECT_CONFIG_FILE: &str = "project.json";

/// Output placeholder substituted with the project's local-repository directory.
pub const OUTPUT_DIR_LOCAL_REPO_TOKEN: &str = "{options.outputDirLocalRepo}";

/// Target option holding the computed local-repository directory.
pub const OUTPUT_DIR_LOCAL_REPO_OPTION: &str = "outputDirLocalRepo";

/// Executor used for synthesized targets.
pub const RUN_TASK_EXECUTOR: &str = "pomgraph:run-task";

/// Specification of a single target.
///
/// Fields this crate does not interpret are kept in `extra` so override
/// targets round-trip unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetSpec {
    /// Executor that runs the target
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub executor: Option<String>,

    /// Executor options
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub options: Map<String, Value>,

    /// Cached output locations
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub outputs: Vec<String>,

    /// Cache inputs (strings or input definitions)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub inputs: Vec<Value>,

    /// Targets that must run first
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<Value>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TargetSpec {
    /// Create a target running a Maven task through the run-task executor.
    pub fn run_task(task: &str) -> Self {
        let mut options = Map::new();
        options.insert("task".to_string(), Value::String(task.to_string()));

        TargetSpec {
            executor: Some(RUN_TASK_EXECUTOR.to_string()),
            options,
            ..TargetSpec::default()
        }
    }

    /// Set the outputs.
    pub fn with_outputs<I, S>(mut self, outputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.outputs = outputs.into_iter().map(Into::into).collect();
        self
    }

    /// Add a `dependsOn` entry.
    pub fn with_depends_on(mut self, target: impl Into<String>) -> Self {
        self.depends_on.push(Value::String(target.into()));
        self
    }

    /// Set a string option.
    pub fn with_option(mut self, name: &str, value: impl Into<String>) -> Self {
        self.options
            .insert(name.to_string(), Value::String(value.into()));
        self
    }

    /// Get a string option.
    pub fn option_str(&self, name: &str) -> Option<&str> {
        self.options.get(name).and_then(Value::as_str)
    }

    /// Check whether the target outputs to the local repository placeholder.
    pub fn outputs_to_local_repo(&self) -> bool {
        self.outputs
            .iter()
            .any(|output| output == OUTPUT_DIR_LOCAL_REPO_TOKEN)
    }

    /// Reject the output-only placeholder used as an input.
    pub fn validate_inputs(&self, target_name: &str, file: &Path) -> GraphResult<()> {
        validate_target_inputs(target_name, file, &self.inputs)
    }
}

/// Reject `{options.outputDirLocalRepo}` in a target's inputs.
///
/// The placeholder is an output substitution; as an input it would make the
/// target's cache key depend on its own output location.
pub fn validate_target_inputs(target_name: &str, file: &Path, inputs: &[Value]) -> GraphResult<()> {
    let reserved = inputs
        .iter()
        .any(|input| input.as_str() == Some(OUTPUT_DIR_LOCAL_REPO_TOKEN));

    if reserved {
        return Err(GraphError::ReservedInput {
            target: target_name.to_string(),
            file: file.to_path_buf(),
        });
    }
    Ok(())
}

/// A project-local `project.json` override descriptor.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectConfigFile {
    /// Project name, must match the artifactId when present
    #[serde(default)]
    pub name: Option<String>,

    /// Declared targets, taken verbatim
    #[serde(default)]
    pub targets: IndexMap<String, TargetSpec>,
}

impl ProjectConfigFile {
    /// Load a project descriptor from a file path.
    pub fn load(path: &Path) -> GraphResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| GraphError::io(path, e))?;

        serde_json::from_str(&content).map_err(|e| GraphError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}
