//! Target synthesis.
//!
//! A project with a `project.json` keeps the targets declared there; every
//! other project gets a build target (and a test target for leaf modules)
//! inferred from its manifest.

use std::path::PathBuf;

use indexmap::IndexMap;
use tracing::debug;

use crate::core::errors::{GraphError, GraphResult};
use crate::core::project::{Project, WorkspaceData};
use crate::core::target::{
    ProjectConfigFile, TargetSpec, OUTPUT_DIR_LOCAL_REPO_OPTION, OUTPUT_DIR_LOCAL_REPO_TOKEN,
};
use crate::resolver::{resolve_effective_version, ExpressionEvaluator};
use crate::util::config::Config;

/// Targets of one project, in declaration order.
pub type Targets = IndexMap<String, TargetSpec>;

/// Derive the targets of `project`.
pub fn synthesize_targets(
    project: &Project,
    workspace: &WorkspaceData,
    config: &Config,
    evaluator: &dyn ExpressionEvaluator,
) -> GraphResult<Targets> {
    let config_path = project.project_config_path();
    if config_path.is_file() {
        debug!(artifact_id = %project.artifact_id, "using targets from project.json");
        declared_targets(project, workspace, evaluator)
    } else {
        inferred_targets(project, workspace, config, evaluator)
    }
}

/// Local-repository directory a project installs into:
/// `<localRepo>/<groupId as path>/<artifactId>/<effectiveVersion>`.
pub fn output_dir_local_repo(
    project: &Project,
    workspace: &WorkspaceData,
    evaluator: &dyn ExpressionEvaluator,
) -> GraphResult<PathBuf> {
    let version = resolve_effective_version(project, workspace, evaluator)?;

    let mut dir = workspace.local_repo.clone();
    dir.extend(project.group_id.split('.'));
    dir.push(&project.artifact_id);
    dir.push(version);
    Ok(dir)
}

fn declared_targets(
    project: &Project,
    workspace: &WorkspaceData,
    evaluator: &dyn ExpressionEvaluator,
) -> GraphResult<Targets> {
    let path = project.project_config_path();
    let file = ProjectConfigFile::load(&path)?;

    if let Some(name) = file.name.as_deref() {
        if name != project.artifact_id {
            return Err(GraphError::ProjectNameMismatch {
                name: name.to_string(),
                artifact_id: project.artifact_id.clone(),
                file: path,
            });
        }
    }

    let mut targets = file.targets;
    for (name, target) in &targets {
        target.validate_inputs(name, &path)?;
    }

    // computed on first use; it may need the maven fallback
    let mut local_repo_dir: Option<String> = None;

    for (name, target) in targets.iter_mut() {
        let wants_dir = workspace.target_defaults.contains(name) || target.outputs_to_local_repo();
        if !wants_dir || target.options.contains_key(OUTPUT_DIR_LOCAL_REPO_OPTION) {
            continue;
        }

        let dir = match local_repo_dir {
            Some(ref dir) => dir.clone(),
            None => {
                let dir = output_dir_local_repo(project, workspace, evaluator)?
                    .display()
                    .to_string();
                local_repo_dir = Some(dir.clone());
                dir
            }
        };

        target
            .options
            .insert(OUTPUT_DIR_LOCAL_REPO_OPTION.to_string(), dir.into());
    }

    Ok(targets)
}

fn inferred_targets(
    project: &Project,
    workspace: &WorkspaceData,
    config: &Config,
    evaluator: &dyn ExpressionEvaluator,
) -> GraphResult<Targets> {
    let options = &config.options;
    let dir = output_dir_local_repo(project, workspace, evaluator)?;

    let build = if project.is_aggregator_packaging {
        TargetSpec::run_task("install -N").with_outputs([OUTPUT_DIR_LOCAL_REPO_TOKEN])
    } else {
        TargetSpec::run_task("install")
            .with_outputs(["{projectRoot}/target", OUTPUT_DIR_LOCAL_REPO_TOKEN])
    };

    let mut targets = Targets::new();
    targets.insert(
        options.build_target_name.clone(),
        build.with_option(OUTPUT_DIR_LOCAL_REPO_OPTION, dir.display().to_string()),
    );

    if !project.is_aggregator_packaging {
        targets.insert(
            options.test_target_name.clone(),
            TargetSpec::run_task("test").with_depends_on(format!("^{}", options.build_target_name)),
        );
    }

    Ok(targets)
}
