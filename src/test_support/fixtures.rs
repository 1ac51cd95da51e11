//! Test fixtures for workspace scenarios.
//!
//! [`PomBuilder`] renders pom.xml content; [`WorkspaceFixture`] lays files
//! out in a temporary directory and builds a matching [`Config`].

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use tempfile::TempDir;

use crate::core::project::Project;
use crate::util::config::{Config, PluginOptions};
use crate::util::context::POMGRAPH_DIR;

/// Builder for pom.xml content.
#[derive(Debug, Clone)]
pub struct PomBuilder {
    group_id: String,
    artifact_id: String,
    version: String,
    packaging: Option<String>,
    parent: Option<[String; 4]>,
    modules: Vec<String>,
    properties: Vec<(String, String)>,
    dependencies: Vec<(String, String)>,
    profile_dependencies: Vec<(String, String)>,
    plugin_dependencies: Vec<(String, String)>,
}

impl PomBuilder {
    pub fn new(group_id: &str, artifact_id: &str, version: &str) -> Self {
        PomBuilder {
            group_id: group_id.to_string(),
            artifact_id: artifact_id.to_string(),
            version: version.to_string(),
            packaging: None,
            parent: None,
            modules: Vec::new(),
            properties: Vec::new(),
            dependencies: Vec::new(),
            profile_dependencies: Vec::new(),
            plugin_dependencies: Vec::new(),
        }
    }

    pub fn packaging(mut self, packaging: &str) -> Self {
        self.packaging = Some(packaging.to_string());
        self
    }

    /// Declare an in-workspace parent.
    pub fn parent(mut self, group_id: &str, artifact_id: &str, version: &str, relative_path: &str) -> Self {
        self.parent = Some([
            group_id.to_string(),
            artifact_id.to_string(),
            version.to_string(),
            relative_path.to_string(),
        ]);
        self
    }

    pub fn module(mut self, path: &str) -> Self {
        self.modules.push(path.to_string());
        self
    }

    pub fn property(mut self, name: &str, value: &str) -> Self {
        self.properties.push((name.to_string(), value.to_string()));
        self
    }

    pub fn dependency(mut self, group_id: &str, artifact_id: &str) -> Self {
        self.dependencies
            .push((group_id.to_string(), artifact_id.to_string()));
        self
    }

    pub fn profile_dependency(mut self, group_id: &str, artifact_id: &str) -> Self {
        self.profile_dependencies
            .push((group_id.to_string(), artifact_id.to_string()));
        self
    }

    pub fn plugin_dependency(mut self, group_id: &str, artifact_id: &str) -> Self {
        self.plugin_dependencies
            .push((group_id.to_string(), artifact_id.to_string()));
        self
    }

    /// Render the manifest.
    pub fn build(&self) -> String {
        let mut xml = String::from(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<project xmlns=\"http://maven.apache.org/POM/4.0.0\">\n  <modelVersion>4.0.0</modelVersion>\n",
        );

        if let Some([group_id, artifact_id, version, relative_path]) = &self.parent {
            let _ = write!(
                xml,
                "  <parent>\n    <groupId>{}</groupId>\n    <artifactId>{}</artifactId>\n    <version>{}</version>\n    <relativePath>{}</relativePath>\n  </parent>\n",
                group_id, artifact_id, version, relative_path
            );
        }

        let _ = write!(
            xml,
            "  <groupId>{}</groupId>\n  <artifactId>{}</artifactId>\n  <version>{}</version>\n",
            self.group_id, self.artifact_id, self.version
        );

        if let Some(packaging) = &self.packaging {
            let _ = writeln!(xml, "  <packaging>{}</packaging>", packaging);
        }

        if !self.modules.is_empty() {
            xml.push_str("  <modules>\n");
            for module in &self.modules {
                let _ = writeln!(xml, "    <module>{}</module>", module);
            }
            xml.push_str("  </modules>\n");
        }

        if !self.properties.is_empty() {
            xml.push_str("  <properties>\n");
            for (name, value) in &self.properties {
                let _ = writeln!(xml, "    <{0}>{1}</{0}>", name, value);
            }
            xml.push_str("  </properties>\n");
        }

        if !self.dependencies.is_empty() {
            xml.push_str(&dependencies_block("  ", &self.dependencies));
        }

        if !self.profile_dependencies.is_empty() {
            xml.push_str("  <profiles>\n    <profile>\n      <id>extra</id>\n");
            xml.push_str(&dependencies_block("      ", &self.profile_dependencies));
            xml.push_str("    </profile>\n  </profiles>\n");
        }

        if !self.plugin_dependencies.is_empty() {
            xml.push_str("  <build>\n    <plugins>\n      <plugin>\n        <artifactId>maven-enforcer-plugin</artifactId>\n");
            xml.push_str(&dependencies_block("        ", &self.plugin_dependencies));
            xml.push_str("      </plugin>\n    </plugins>\n  </build>\n");
        }

        xml.push_str("</project>\n");
        xml
    }
}

fn dependencies_block(indent: &str, dependencies: &[(String, String)]) -> String {
    let mut xml = format!("{}<dependencies>\n", indent);
    for (group_id, artifact_id) in dependencies {
        let _ = write!(
            xml,
            "{0}  <dependency>\n{0}    <groupId>{1}</groupId>\n{0}    <artifactId>{2}</artifactId>\n{0}  </dependency>\n",
            indent, group_id, artifact_id
        );
    }
    let _ = writeln!(xml, "{}</dependencies>", indent);
    xml
}

/// A workspace in a temporary directory.
pub struct WorkspaceFixture {
    dir: TempDir,
}

impl WorkspaceFixture {
    pub fn new() -> Self {
        WorkspaceFixture {
            dir: TempDir::new().unwrap(),
        }
    }

    /// Workspace root.
    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Write `<dir>/pom.xml`, relative to the root.
    pub fn pom(&self, dir: &str, pom: PomBuilder) {
        self.file(&format!("{}/pom.xml", dir), &pom.build());
    }

    /// Write a file relative to the root, creating parent directories.
    pub fn file(&self, path: &str, content: &str) {
        let path = self.root().join(path);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, content).unwrap();
    }

    /// Configuration with default options.
    pub fn config(&self) -> Config {
        self.config_with(PluginOptions::default())
    }

    pub fn config_with(&self, options: PluginOptions) -> Config {
        Config::new(self.root(), options)
    }

    /// Workspace data cache directory.
    pub fn cache_dir(&self) -> PathBuf {
        self.root().join(POMGRAPH_DIR).join("workspace-data")
    }
}

impl Default for WorkspaceFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// A bare project with a literal version, rooted at `/ws/<root>`.
pub fn project(artifact_id: &str, root: &str) -> Project {
    Project {
        group_id: "com.acme".to_string(),
        artifact_id: artifact_id.to_string(),
        version: "1.0.0".to_string(),
        is_root_project: root == ".",
        is_aggregator_packaging: false,
        project_root: root.to_string(),
        project_absolute_path: Path::new("/ws").join(root),
        dependencies: Vec::new(),
        profile_dependencies: Vec::new(),
        plugin_dependencies: Vec::new(),
        parent_project_artifact_id: None,
        aggregator_project_artifact_id: None,
        properties: IndexMap::new(),
        skip_project: false,
    }
}
