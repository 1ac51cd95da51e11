//! Effective version resolution.
//!
//! A declared version such as `${revision}` is resolved by substituting
//! properties of the project itself, then of each ancestor along the parent
//! chain. Only when that fails is Maven asked to evaluate the version, which
//! costs a JVM start per project.

use std::collections::HashSet;
use std::path::Path;
use std::sync::LazyLock;

use indexmap::IndexMap;
use regex::{Captures, Regex};
use tracing::{debug, warn};

use crate::core::errors::{GraphError, GraphResult};
use crate::core::project::{Project, WorkspaceData};
use crate::util::process::{find_maven, ProcessBuilder};

/// A `${name}` placeholder. Names cannot contain `$`, `{` or `}`.
static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{([^${}]*)\}").expect("placeholder pattern is valid")
});

/// Substitution passes per properties table.
const MAX_EXPANSIONS: usize = 32;

/// Evaluates a project's version outside of this crate.
pub trait ExpressionEvaluator: Send + Sync {
    /// Evaluate `project.version` of `artifact_id`, running in `maven_root_dir`.
    fn evaluate_version(&self, artifact_id: &str, maven_root_dir: &Path) -> anyhow::Result<String>;
}

/// Evaluates versions with `mvn help:evaluate`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MavenEvaluator;

impl ExpressionEvaluator for MavenEvaluator {
    fn evaluate_version(&self, artifact_id: &str, maven_root_dir: &Path) -> anyhow::Result<String> {
        let cmd = ProcessBuilder::new(find_maven(maven_root_dir))
            .args([
                "help:evaluate",
                "-Dexpression=project.version",
                "-q",
                "-DforceStdout",
                "-pl",
            ])
            .arg(format!(":{}", artifact_id))
            .cwd(maven_root_dir);

        debug!(
            command = %cmd,
            cwd = ?cmd.get_cwd(),
            "evaluating version with maven"
        );

        cmd.exec_stdout()
    }
}

/// Compute the placeholder-free version of `project`.
pub fn resolve_effective_version(
    project: &Project,
    workspace: &WorkspaceData,
    evaluator: &dyn ExpressionEvaluator,
) -> GraphResult<String> {
    let declared = project.version.as_str();
    if !declared.contains("${") {
        return Ok(declared.to_string());
    }

    let malformed = |reason: &str| GraphError::MalformedVersion {
        artifact_id: project.artifact_id.clone(),
        version: declared.to_string(),
        reason: reason.to_string(),
    };

    if !PLACEHOLDER.is_match(declared) {
        return Err(malformed("`${` does not start a well-formed `${name}` placeholder"));
    }

    let mut version = declared.to_string();
    let mut visited = HashSet::new();
    let mut owner = Some(project);

    while let Some(current) = owner {
        if !visited.insert(current.artifact_id.as_str()) {
            return Err(malformed(&format!(
                "parent chain loops back to `{}`",
                current.artifact_id
            )));
        }

        version = expand(&version, &current.properties).map_err(|reason| malformed(&reason))?;
        if !version.contains("${") {
            debug!(
                artifact_id = %project.artifact_id,
                version = %version,
                from = %current.artifact_id,
                "resolved version from properties"
            );
            return Ok(version);
        }

        owner = current
            .parent_project_artifact_id
            .as_deref()
            .and_then(|parent| workspace.get(parent));
    }

    warn!(
        artifact_id = %project.artifact_id,
        version = %declared,
        "version not resolvable from properties, falling back to `mvn help:evaluate` (slow)"
    );

    let unresolvable = |reason: String| GraphError::UnresolvableVersion {
        artifact_id: project.artifact_id.clone(),
        version: declared.to_string(),
        reason,
    };

    let evaluated = evaluator
        .evaluate_version(&project.artifact_id, &workspace.maven_root_dir)
        .map_err(|e| unresolvable(format!("{:#}", e)))?;

    if evaluated.is_empty() || evaluated.contains("${") {
        return Err(unresolvable(format!(
            "maven evaluated the version to `{}`",
            evaluated
        )));
    }

    Ok(evaluated)
}

/// Substitute placeholders found in `properties` until none resolve.
///
/// Errors with a reason when a substitution maps a value onto itself or
/// expansion does not settle.
fn expand(value: &str, properties: &IndexMap<String, String>) -> Result<String, String> {
    let mut current = value.to_string();

    for _ in 0..MAX_EXPANSIONS {
        let resolvable = PLACEHOLDER
            .captures_iter(&current)
            .any(|caps| properties.contains_key(&caps[1]));
        if !resolvable {
            return Ok(current);
        }

        let next = PLACEHOLDER
            .replace_all(&current, |caps: &Captures<'_>| match properties.get(&caps[1]) {
                Some(replacement) => replacement.clone(),
                None => caps[0].to_string(),
            })
            .into_owned();

        if next == current {
            return Err(format!("`{}` expands to itself", current));
        }
        current = next;
    }

    Err(format!(
        "property expansion did not settle after {} passes",
        MAX_EXPANSIONS
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{project, RecordingEvaluator};
    use std::path::PathBuf;

    fn workspace(projects: Vec<Project>) -> WorkspaceData {
        WorkspaceData {
            maven_root_dir: PathBuf::from("/ws/backend"),
            projects: projects
                .into_iter()
                .map(|p| (p.artifact_id.clone(), p))
                .collect(),
            target_defaults: Vec::new(),
            local_repo: PathBuf::from("/m2"),
        }
    }

    fn with_version(artifact_id: &str, version: &str) -> Project {
        let mut p = project(artifact_id, artifact_id);
        p.version = version.to_string();
        p
    }

    #[test]
    fn test_literal_version_is_verbatim() {
        let evaluator = RecordingEvaluator::failing();
        let api = with_version("api", "2.4.1-SNAPSHOT");
        let ws = workspace(vec![api.clone()]);

        assert_eq!(
            resolve_effective_version(&api, &ws, &evaluator).unwrap(),
            "2.4.1-SNAPSHOT"
        );
        assert!(evaluator.calls().is_empty());
    }

    #[test]
    fn test_local_property() {
        let evaluator = RecordingEvaluator::failing();
        let mut api = with_version("api", "${revision}${changelist}");
        api.properties.insert("revision".into(), "1.2.0".into());
        api.properties.insert("changelist".into(), "-SNAPSHOT".into());
        let ws = workspace(vec![api.clone()]);

        assert_eq!(
            resolve_effective_version(&api, &ws, &evaluator).unwrap(),
            "1.2.0-SNAPSHOT"
        );
    }

    #[test]
    fn test_nested_local_properties() {
        let evaluator = RecordingEvaluator::failing();
        let mut api = with_version("api", "${revision}");
        api.properties.insert("revision".into(), "${major}.${minor}".into());
        api.properties.insert("major".into(), "3".into());
        api.properties.insert("minor".into(), "1".into());
        let ws = workspace(vec![api.clone()]);

        assert_eq!(resolve_effective_version(&api, &ws, &evaluator).unwrap(), "3.1");
    }

    #[test]
    fn test_property_from_parent_chain() {
        let evaluator = RecordingEvaluator::failing();

        let mut root = with_version("root", "${revision}");
        root.properties.insert("revision".into(), "5.0.0".into());

        let mut mid = with_version("mid", "${revision}");
        mid.parent_project_artifact_id = Some("root".into());

        let mut leaf = with_version("leaf", "${revision}");
        leaf.parent_project_artifact_id = Some("mid".into());

        let ws = workspace(vec![root, mid, leaf.clone()]);
        assert_eq!(resolve_effective_version(&leaf, &ws, &evaluator).unwrap(), "5.0.0");
        assert!(evaluator.calls().is_empty());
    }

    #[test]
    fn test_local_property_shadows_parent() {
        let evaluator = RecordingEvaluator::failing();

        let mut root = with_version("root", "1.0.0");
        root.properties.insert("revision".into(), "1.0.0".into());

        let mut leaf = with_version("leaf", "${revision}");
        leaf.parent_project_artifact_id = Some("root".into());
        leaf.properties.insert("revision".into(), "9.9.9".into());

        let ws = workspace(vec![root, leaf.clone()]);
        assert_eq!(resolve_effective_version(&leaf, &ws, &evaluator).unwrap(), "9.9.9");
    }

    #[test]
    fn test_fallback_called_once_in_maven_root() {
        let evaluator = RecordingEvaluator::returning("1.0.42");
        let api = with_version("api", "1.0.${build.number}");
        let ws = workspace(vec![api.clone()]);

        assert_eq!(resolve_effective_version(&api, &ws, &evaluator).unwrap(), "1.0.42");
        assert_eq!(
            evaluator.calls(),
            vec![("api".to_string(), PathBuf::from("/ws/backend"))]
        );
    }

    #[test]
    fn test_fallback_failure_is_unresolvable() {
        let evaluator = RecordingEvaluator::failing();
        let api = with_version("api", "${missing}");
        let ws = workspace(vec![api.clone()]);

        let err = resolve_effective_version(&api, &ws, &evaluator).unwrap_err();
        assert!(matches!(err, GraphError::UnresolvableVersion { ref artifact_id, .. } if artifact_id == "api"));
    }

    #[test]
    fn test_fallback_returning_placeholder_is_unresolvable() {
        let evaluator = RecordingEvaluator::returning("${missing}");
        let api = with_version("api", "${missing}");
        let ws = workspace(vec![api.clone()]);

        let err = resolve_effective_version(&api, &ws, &evaluator).unwrap_err();
        assert!(matches!(err, GraphError::UnresolvableVersion { .. }));
    }

    #[test]
    fn test_self_mapping_is_malformed() {
        let evaluator = RecordingEvaluator::failing();
        let mut api = with_version("api", "${revision}");
        api.properties.insert("revision".into(), "${revision}".into());
        let ws = workspace(vec![api.clone()]);

        let err = resolve_effective_version(&api, &ws, &evaluator).unwrap_err();
        assert!(matches!(err, GraphError::MalformedVersion { .. }));
        assert!(evaluator.calls().is_empty());
    }

    #[test]
    fn test_mutual_expansion_is_malformed() {
        let evaluator = RecordingEvaluator::failing();
        let mut api = with_version("api", "${a}");
        api.properties.insert("a".into(), "x${b}".into());
        api.properties.insert("b".into(), "y${a}".into());
        let ws = workspace(vec![api.clone()]);

        let err = resolve_effective_version(&api, &ws, &evaluator).unwrap_err();
        assert!(matches!(err, GraphError::MalformedVersion { ref reason, .. } if reason.contains("did not settle")));
    }

    #[test]
    fn test_unterminated_placeholder_is_malformed() {
        let evaluator = RecordingEvaluator::failing();
        let api = with_version("api", "1.0-${oops");
        let ws = workspace(vec![api.clone()]);

        let err = resolve_effective_version(&api, &ws, &evaluator).unwrap_err();
        assert!(matches!(err, GraphError::MalformedVersion { .. }));
    }

    #[test]
    fn test_cyclic_parent_chain_is_malformed() {
        let evaluator = RecordingEvaluator::failing();

        let mut a = with_version("a", "${revision}");
        a.parent_project_artifact_id = Some("b".into());
        let mut b = with_version("b", "${revision}");
        b.parent_project_artifact_id = Some("a".into());

        let ws = workspace(vec![a.clone(), b]);
        let err = resolve_effective_version(&a, &ws, &evaluator).unwrap_err();
        assert!(matches!(err, GraphError::MalformedVersion { ref reason, .. } if reason.contains("loops")));
    }
}
