//! pom.xml manifest parsing.
//!
//! A manifest is parsed once into a typed [`PomManifest`]; nothing downstream
//! looks at XML again. Only the sections the graph needs are kept: identity,
//! parent linkage, modules, properties and the three dependency kinds.

use std::fmt;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use roxmltree::{Document, Node};
use serde::{Deserialize, Serialize};

use crate::core::errors::{GraphError, GraphResult};

/// Manifest file name.
pub const MANIFEST_NAME: &str = "pom.xml";

/// Group ids of framework-managed artifacts (starters, BOM-managed modules).
/// Main dependencies in these groups are never workspace edges.
pub const FRAMEWORK_GROUP_IDS: &[&str] = &["org.springframework.boot", "io.quarkus", "io.micronaut"];

/// The section a dependency is declared in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencyKind {
    /// `<project><dependencies>`
    Main,
    /// `<profiles><profile><dependencies>`
    Profile,
    /// `<build>[<pluginManagement>]<plugins><plugin><dependencies>`
    Plugin,
}

impl DependencyKind {
    /// All kinds, in edge emission order.
    pub const ALL: [DependencyKind; 3] = [
        DependencyKind::Main,
        DependencyKind::Profile,
        DependencyKind::Plugin,
    ];

    /// Element paths from `<project>` to the `<dependencies>` containers of this kind.
    fn container_paths(self) -> &'static [&'static [&'static str]] {
        match self {
            DependencyKind::Main => &[&["dependencies"]],
            DependencyKind::Profile => &[&["profiles", "profile", "dependencies"]],
            DependencyKind::Plugin => &[
                &["build", "plugins", "plugin", "dependencies"],
                &["build", "pluginManagement", "plugins", "plugin", "dependencies"],
            ],
        }
    }

    /// Group ids whose dependencies of this kind are ignored.
    fn excluded_group_ids(self) -> &'static [&'static str] {
        match self {
            DependencyKind::Main => FRAMEWORK_GROUP_IDS,
            DependencyKind::Profile | DependencyKind::Plugin => &[],
        }
    }

    /// Get the kind name.
    pub fn as_str(&self) -> &'static str {
        match self {
            DependencyKind::Main => "main",
            DependencyKind::Profile => "profile",
            DependencyKind::Plugin => "plugin",
        }
    }
}

impl fmt::Display for DependencyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A `<dependency>` declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyDecl {
    pub group_id: Option<String>,
    pub artifact_id: Option<String>,
}

/// The `<parent>` block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParentRef {
    pub group_id: Option<String>,
    pub artifact_id: Option<String>,
    pub version: Option<String>,
    pub relative_path: Option<String>,
}

impl ParentRef {
    /// A parent with a relative path lives in the workspace; without one it
    /// is a published artifact.
    pub fn is_local(&self) -> bool {
        self.relative_path.is_some()
    }
}

/// Dependency declarations, one list per kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct DeclaredDependencies {
    main: Vec<DependencyDecl>,
    profile: Vec<DependencyDecl>,
    plugin: Vec<DependencyDecl>,
}

impl DeclaredDependencies {
    fn get(&self, kind: DependencyKind) -> &[DependencyDecl] {
        match kind {
            DependencyKind::Main => &self.main,
            DependencyKind::Profile => &self.profile,
            DependencyKind::Plugin => &self.plugin,
        }
    }
}

/// A parsed pom.xml.
#[derive(Debug, Clone)]
pub struct PomManifest {
    path: PathBuf,
    group_id: Option<String>,
    artifact_id: Option<String>,
    version: Option<String>,
    packaging: Option<String>,
    parent: Option<ParentRef>,
    modules: Vec<String>,
    properties: IndexMap<String, String>,
    dependencies: DeclaredDependencies,
}

impl PomManifest {
    /// Load a manifest from a file path.
    pub fn read(path: &Path) -> GraphResult<Self> {
        if !path.is_file() {
            return Err(GraphError::ManifestNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| GraphError::io(path, e))?;
        Self::parse(&content, path)
    }

    /// Parse manifest content.
    pub fn parse(content: &str, path: &Path) -> GraphResult<Self> {
        let doc = Document::parse(content).map_err(|e| GraphError::ManifestParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let project = doc.root_element();
        if project.tag_name().name() != "project" {
            return Err(GraphError::ManifestParse {
                path: path.to_path_buf(),
                message: format!(
                    "root element is `<{}>`, expected `<project>`",
                    project.tag_name().name()
                ),
            });
        }

        let parent = child(project, "parent").map(|parent| ParentRef {
            group_id: child_text(parent, "groupId"),
            artifact_id: child_text(parent, "artifactId"),
            version: child_text(parent, "version"),
            relative_path: child_text(parent, "relativePath"),
        });

        let modules = child(project, "modules")
            .map(|modules| {
                children(modules, "module")
                    .map(element_text)
                    .filter(|path| !path.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let properties = child(project, "properties")
            .map(|properties| {
                properties
                    .children()
                    .filter(Node::is_element)
                    .map(|property| {
                        (
                            property.tag_name().name().to_string(),
                            element_text(property),
                        )
                    })
                    .collect()
            })
            .unwrap_or_default();

        let dependencies = DeclaredDependencies {
            main: collect_dependencies(project, DependencyKind::Main),
            profile: collect_dependencies(project, DependencyKind::Profile),
            plugin: collect_dependencies(project, DependencyKind::Plugin),
        };

        Ok(PomManifest {
            path: path.to_path_buf(),
            group_id: child_text(project, "groupId"),
            artifact_id: child_text(project, "artifactId"),
            version: child_text(project, "version"),
            packaging: child_text(project, "packaging"),
            parent,
            modules,
            properties,
            dependencies,
        })
    }

    /// Path of the manifest file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The project's artifactId (mandatory).
    pub fn artifact_id(&self) -> GraphResult<&str> {
        self.artifact_id
            .as_deref()
            .ok_or_else(|| GraphError::MissingArtifactId {
                path: self.path.clone(),
            })
    }

    /// The project's groupId, inherited from the parent when not declared.
    pub fn group_id(&self) -> GraphResult<&str> {
        self.group_id
            .as_deref()
            .or_else(|| self.parent.as_ref().and_then(|p| p.group_id.as_deref()))
            .ok_or_else(|| GraphError::MissingGroupId {
                artifact_id: self.display_name(),
                path: self.path.clone(),
            })
    }

    /// The raw declared version, inherited from the parent when not declared.
    pub fn declared_version(&self) -> GraphResult<&str> {
        self.version
            .as_deref()
            .or_else(|| self.parent.as_ref().and_then(|p| p.version.as_deref()))
            .ok_or_else(|| GraphError::MissingVersion {
                artifact_id: self.display_name(),
                path: self.path.clone(),
            })
    }

    /// The parent block, only when it points into the workspace.
    pub fn parent_reference(&self) -> Option<&ParentRef> {
        self.parent.as_ref().filter(|parent| parent.is_local())
    }

    /// artifactId of the in-workspace parent.
    pub fn parent_artifact_id(&self) -> Option<&str> {
        self.parent_reference()
            .and_then(|parent| parent.artifact_id.as_deref())
    }

    /// Declared sub-module paths, in declaration order.
    pub fn sub_module_paths(&self) -> &[String] {
        &self.modules
    }

    /// Declared properties, in declaration order.
    pub fn properties(&self) -> &IndexMap<String, String> {
        &self.properties
    }

    /// Referenced artifactIds of one dependency kind, in declaration order.
    pub fn dependency_artifact_ids(&self, kind: DependencyKind) -> Vec<String> {
        let excluded = kind.excluded_group_ids();

        self.dependencies
            .get(kind)
            .iter()
            .filter(|dep| {
                dep.group_id
                    .as_deref()
                    .map_or(true, |group| !excluded.contains(&group))
            })
            .filter_map(|dep| dep.artifact_id.clone())
            .collect()
    }

    /// `<packaging>pom</packaging>`: the project only aggregates modules.
    pub fn is_aggregator_packaging(&self) -> bool {
        self.packaging.as_deref() == Some("pom")
    }

    fn display_name(&self) -> String {
        self.artifact_id
            .clone()
            .unwrap_or_else(|| "<unknown>".to_string())
    }
}

/// Collect `<dependency>` entries below every container path of `kind`.
fn collect_dependencies(project: Node<'_, '_>, kind: DependencyKind) -> Vec<DependencyDecl> {
    let mut result = Vec::new();

    for path in kind.container_paths() {
        for container in descend(project, path) {
            for dependency in children(container, "dependency") {
                result.push(DependencyDecl {
                    group_id: child_text(dependency, "groupId"),
                    artifact_id: child_text(dependency, "artifactId"),
                });
            }
        }
    }

    result
}

/// All elements reached by following `path` one child name at a time.
fn descend<'a, 'input>(node: Node<'a, 'input>, path: &[&'a str]) -> Vec<Node<'a, 'input>> {
    path.iter().fold(vec![node], |nodes, name| {
        nodes
            .into_iter()
            .flat_map(|n| children(n, name).collect::<Vec<_>>())
            .collect()
    })
}

fn children<'a, 'input: 'a>(
    node: Node<'a, 'input>,
    name: &'a str,
) -> impl Iterator<Item = Node<'a, 'input>> + 'a {
    node.children()
        .filter(move |n| n.is_element() && n.tag_name().name() == name)
}

fn child<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    node.children()
        .find(|n| n.is_element() && n.tag_name().name() == name)
}

fn child_text(node: Node<'_, '_>, name: &str) -> Option<String> {
    child(node, name)
        .map(element_text)
        .filter(|text| !text.is_empty())
}

fn element_text(node: Node<'_, '_>) -> String {
    node.text().map(str::trim).unwrap_or_default().to_string()
}
