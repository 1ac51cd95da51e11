//! Graph inference error types and diagnostics.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use miette::Diagnostic as MietteDiagnostic;
use thiserror::Error;

use crate::util::diagnostic::{suggestions, Diagnostic};

/// Error raised while reading manifests, resolving versions or building the graph.
///
/// Every variant is fatal for the graph computation. The type is `Clone` so a
/// failed computation can be handed to every caller waiting on it.
#[derive(Debug, Clone, Error, MietteDiagnostic)]
pub enum GraphError {
    #[error("manifest not found: {}", path.display())]
    #[diagnostic(
        code(pomgraph::manifest::not_found),
        help("check the `<module>` entries of the aggregating pom.xml")
    )]
    ManifestNotFound { path: PathBuf },

    #[error("failed to parse manifest {}: {message}", path.display())]
    #[diagnostic(code(pomgraph::manifest::parse))]
    ManifestParse { path: PathBuf, message: String },

    #[error("manifest {} has no `artifactId`", path.display())]
    #[diagnostic(code(pomgraph::manifest::missing_artifact_id))]
    MissingArtifactId { path: PathBuf },

    #[error("cannot determine groupId of `{artifact_id}` ({})", path.display())]
    #[diagnostic(
        code(pomgraph::manifest::missing_group_id),
        help("declare `<groupId>` in the project or in its `<parent>` block")
    )]
    MissingGroupId { artifact_id: String, path: PathBuf },

    #[error("cannot determine version of `{artifact_id}` ({})", path.display())]
    #[diagnostic(
        code(pomgraph::manifest::missing_version),
        help("declare `<version>` in the project or in its `<parent>` block")
    )]
    MissingVersion { artifact_id: String, path: PathBuf },

    #[error("module {} is reachable more than once", path.display())]
    #[diagnostic(
        code(pomgraph::workspace::duplicate_module),
        help("every module must be listed by exactly one aggregating pom.xml")
    )]
    DuplicateModule { path: PathBuf },

    #[error("`{artifact_id}` references unknown {relation} project `{reference}`")]
    #[diagnostic(code(pomgraph::workspace::dangling_reference))]
    DanglingReference {
        artifact_id: String,
        relation: &'static str,
        reference: String,
        path: PathBuf,
    },

    #[error("cannot resolve version `{version}` of `{artifact_id}`: {reason}")]
    #[diagnostic(code(pomgraph::version::unresolvable))]
    UnresolvableVersion {
        artifact_id: String,
        version: String,
        reason: String,
    },

    #[error("malformed version `{version}` of `{artifact_id}`: {reason}")]
    #[diagnostic(code(pomgraph::version::malformed))]
    MalformedVersion {
        artifact_id: String,
        version: String,
        reason: String,
    },

    #[error(
        "\"{{options.outputDirLocalRepo}}\" is not allowed in target inputs (target `{target}` in {})",
        file.display()
    )]
    #[diagnostic(
        code(pomgraph::config::reserved_input),
        help("remove the placeholder from the target inputs; it is only valid as an output")
    )]
    ReservedInput { target: String, file: PathBuf },

    #[error(
        "project name `{name}` in {} does not match artifactId `{artifact_id}`",
        file.display()
    )]
    #[diagnostic(code(pomgraph::config::name_mismatch))]
    ProjectNameMismatch {
        name: String,
        artifact_id: String,
        file: PathBuf,
    },

    #[error("invalid configuration in {}: {message}", path.display())]
    #[diagnostic(code(pomgraph::config::invalid))]
    Config { path: PathBuf, message: String },

    #[error("invalid dependency `{source_project}` -> `{target}` ({source_file}): {reason}")]
    #[diagnostic(code(pomgraph::graph::invalid_dependency))]
    InvalidDependency {
        source_project: String,
        target: String,
        source_file: String,
        reason: String,
    },

    #[error("cannot compute workspace data key for {}: {message}", path.display())]
    #[diagnostic(code(pomgraph::cache::key))]
    CacheKey { path: PathBuf, message: String },

    #[error("I/O error at {}: {source}", path.display())]
    #[diagnostic(code(pomgraph::io))]
    Io {
        path: PathBuf,
        #[source]
        source: Arc<io::Error>,
    },
}

impl GraphError {
    /// Wrap an I/O error with the path it happened on.
    pub fn io(path: &Path, err: io::Error) -> Self {
        GraphError::Io {
            path: path.to_path_buf(),
            source: Arc::new(err),
        }
    }

    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let diag = Diagnostic::error(self.to_string());

        match self {
            GraphError::ManifestNotFound { path } => diag
                .with_location(path)
                .with_help(suggestions::CHECK_MODULES),

            GraphError::DuplicateModule { path } => diag
                .with_location(path)
                .with_help(suggestions::CHECK_MODULES),

            GraphError::ManifestParse { path, .. } | GraphError::MissingArtifactId { path } => {
                diag.with_location(path)
                    .with_help(suggestions::FIX_MANIFEST)
            }

            GraphError::MissingGroupId { artifact_id, path }
            | GraphError::MissingVersion { artifact_id, path } => diag
                .with_location(path)
                .with_note(format!("project: {}", artifact_id))
                .with_help(suggestions::FIX_MANIFEST),

            GraphError::DanglingReference {
                artifact_id,
                relation,
                reference,
                path,
            } => diag
                .with_location(path)
                .with_note(format!(
                    "`{}` declares `{}` as its {} but no workspace module has that artifactId",
                    artifact_id, reference, relation
                ))
                .with_help(
                    "Remove `<relativePath>` if the parent is a published artifact".to_string(),
                )
                .with_help(suggestions::CHECK_MODULES),

            GraphError::UnresolvableVersion { artifact_id, .. } => diag
                .with_note(format!("project: {}", artifact_id))
                .with_help(
                    "Define the referenced property in the project or one of its parents"
                        .to_string(),
                ),

            GraphError::MalformedVersion { artifact_id, .. } => diag
                .with_note(format!("project: {}", artifact_id))
                .with_help(suggestions::FIX_MANIFEST),

            GraphError::ReservedInput { target, file } => diag
                .with_location(file)
                .with_help(format!(
                    "Remove \"{{options.outputDirLocalRepo}}\" from the inputs of `{}`",
                    target
                )),

            GraphError::ProjectNameMismatch {
                artifact_id, file, ..
            } => diag.with_location(file).with_help(format!(
                "Set \"name\" to \"{}\" in project.json",
                artifact_id
            )),

            GraphError::Config { path, .. } => diag.with_location(path),

            GraphError::InvalidDependency { source_file, .. } => {
                diag.with_location(source_file.as_str())
            }

            GraphError::CacheKey { path, .. } => diag
                .with_location(path)
                .with_help(suggestions::STALE_CACHE),

            GraphError::Io { path, .. } => diag.with_location(path),
        }
    }
}

/// Result type used by the graph inference engine.
pub type GraphResult<T> = std::result::Result<T, GraphError>;
