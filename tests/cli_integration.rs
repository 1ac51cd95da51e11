//! CLI integration tests for pomgraph.
//!
//! These tests run the binary against small Maven workspaces laid out in
//! temporary directories. No test needs Maven itself: every version is
//! resolvable from properties.

use std::fs;
use std::path::Path;
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use serde_json::Value;
use tempfile::TempDir;

/// Get the pomgraph binary command.
fn pomgraph() -> Command {
    let mut cmd = Command::cargo_bin("pomgraph").unwrap();
    cmd.env_remove("POMGRAPH_CACHE_PROJECT_GRAPH");
    cmd
}

fn write(root: &Path, path: &str, content: &str) {
    let path = root.join(path);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

/// Root aggregator with `core` and `app`; `app` depends on `core`.
fn workspace() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();

    write(
        root,
        "nx.json",
        r#"{
  "plugins": [
    { "plugin": "pomgraph", "options": { "localRepoRelativePath": ".m2/repository" } }
  ]
}"#,
    );
    write(
        root,
        "pom.xml",
        r#"<project>
  <groupId>com.acme</groupId>
  <artifactId>root</artifactId>
  <version>${revision}</version>
  <packaging>pom</packaging>
  <properties><revision>3.0.0</revision></properties>
  <modules>
    <module>core</module>
    <module>app</module>
  </modules>
</project>"#,
    );
    write(
        root,
        "core/pom.xml",
        r#"<project>
  <parent>
    <groupId>com.acme</groupId>
    <artifactId>root</artifactId>
    <version>${revision}</version>
    <relativePath>..</relativePath>
  </parent>
  <artifactId>core</artifactId>
</project>"#,
    );
    write(
        root,
        "app/pom.xml",
        r#"<project>
  <parent>
    <groupId>com.acme</groupId>
    <artifactId>root</artifactId>
    <version>${revision}</version>
    <relativePath>..</relativePath>
  </parent>
  <artifactId>app</artifactId>
  <dependencies>
    <dependency><groupId>com.acme</groupId><artifactId>core</artifactId></dependency>
    <dependency><groupId>org.springframework.boot</groupId><artifactId>spring-boot-starter</artifactId></dependency>
  </dependencies>
</project>"#,
    );

    tmp
}

fn graph_json(root: &Path, args: &[&str]) -> Value {
    let output = pomgraph()
        .arg("graph")
        .args(args)
        .current_dir(root)
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    serde_json::from_slice(&output.stdout).unwrap()
}

// ============================================================================
// pomgraph graph
// ============================================================================

#[test]
fn test_graph_prints_nodes_and_edges() {
    let tmp = workspace();
    let graph = graph_json(tmp.path(), &[]);

    let nodes = graph["nodes"].as_object().unwrap();
    let roots: Vec<_> = nodes.keys().map(String::as_str).collect();
    assert_eq!(roots, vec![".", "core", "app"]);

    let app = &nodes["app"];
    assert_eq!(app["name"], "app");
    assert_eq!(app["tags"], serde_json::json!(["pomgraph"]));
    assert_eq!(app["targets"]["build"]["options"]["task"], "install");
    assert!(app["targets"]["build"]["options"]["outputDirLocalRepo"]
        .as_str()
        .unwrap()
        .ends_with(&["com", "acme", "app", "3.0.0"].join(std::path::MAIN_SEPARATOR_STR)));
    assert_eq!(nodes["."]["targets"]["build"]["options"]["task"], "install -N");

    let edges: Vec<_> = graph["edges"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| (e["source"].as_str().unwrap(), e["target"].as_str().unwrap()))
        .collect();
    assert_eq!(edges, vec![("core", "root"), ("app", "root"), ("app", "core")]);
    assert_eq!(graph["edges"][2]["sourceFile"], "app/pom.xml");
    assert_eq!(graph["edges"][2]["type"], "static");
}

#[test]
fn test_graph_edges_only() {
    let tmp = workspace();
    let edges = graph_json(tmp.path(), &["--edges-only"]);

    assert!(edges.is_array());
    assert_eq!(edges.as_array().unwrap().len(), 3);
}

#[test]
fn test_graph_nodes_only_from_subdirectory() {
    let tmp = workspace();
    let nodes = graph_json(&tmp.path().join("app"), &["--nodes-only"]);

    assert!(nodes.is_object());
    assert!(nodes.get("core").is_some());
}

#[test]
fn test_graph_is_stable_across_runs() {
    let tmp = workspace();

    let first = graph_json(tmp.path(), &[]);
    let cached = graph_json(tmp.path(), &[]);
    let uncached = graph_json(tmp.path(), &["--no-cache"]);

    assert_eq!(first, cached);
    assert_eq!(first, uncached);
}

#[test]
fn test_graph_follows_manifest_changes() {
    let tmp = workspace();
    graph_json(tmp.path(), &[]);

    write(
        tmp.path(),
        "core/pom.xml",
        r#"<project>
  <parent>
    <groupId>com.acme</groupId>
    <artifactId>root</artifactId>
    <version>${revision}</version>
    <relativePath>..</relativePath>
  </parent>
  <artifactId>core</artifactId>
  <dependencies>
    <dependency><groupId>com.acme</groupId><artifactId>app</artifactId></dependency>
  </dependencies>
</project>"#,
    );

    let edges = graph_json(tmp.path(), &["--edges-only"]);
    assert!(edges
        .as_array()
        .unwrap()
        .iter()
        .any(|e| e["source"] == "core" && e["target"] == "app"));
}

#[test]
fn test_graph_missing_module_fails() {
    let tmp = workspace();
    fs::remove_dir_all(tmp.path().join("core")).unwrap();

    pomgraph()
        .arg("graph")
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("manifest not found"))
        .stderr(predicate::str::contains("core"));
}

#[test]
fn test_graph_reserved_input_fails() {
    let tmp = workspace();
    write(
        tmp.path(),
        "app/project.json",
        r#"{ "name": "app", "targets": { "build": { "inputs": ["{options.outputDirLocalRepo}"] } } }"#,
    );

    pomgraph()
        .arg("graph")
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("{options.outputDirLocalRepo}"))
        .stderr(predicate::str::contains("project.json"));
}

// ============================================================================
// pomgraph projects / version
// ============================================================================

#[test]
fn test_projects_lists_registry() {
    let tmp = workspace();

    pomgraph()
        .arg("projects")
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("root"))
        .stdout(predicate::str::contains("[aggregator]"))
        .stdout(predicate::str::contains("app"));
}

#[test]
fn test_projects_json() {
    let tmp = workspace();

    let output = pomgraph()
        .args(["projects", "--json"])
        .current_dir(tmp.path())
        .output()
        .unwrap();
    assert!(output.status.success());

    let projects: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(projects[2]["artifactId"], "app");
    // the framework starter is not a workspace dependency
    assert_eq!(projects[2]["dependencies"], 1);
}

#[test]
fn test_version_resolves_through_parent() {
    let tmp = workspace();

    pomgraph()
        .args(["version", "core"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout("3.0.0\n");
}

#[test]
fn test_version_unknown_project() {
    let tmp = workspace();

    pomgraph()
        .args(["version", "nope"])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("no project with artifactId `nope`"));
}

// ============================================================================
// pomgraph cache
// ============================================================================

#[test]
fn test_cache_path_list_and_clean() {
    let tmp = workspace();
    let cache_dir = tmp.path().join(".pomgraph").join("workspace-data");

    pomgraph()
        .args(["cache", "path"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("workspace-data"));

    graph_json(tmp.path(), &[]);
    assert!(cache_dir.is_dir());

    pomgraph()
        .args(["cache", "list"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("workspace-data-"));

    pomgraph()
        .args(["cache", "clean"])
        .current_dir(tmp.path())
        .assert()
        .success();
    assert!(!cache_dir.exists());
}

#[test]
fn test_explicit_root() {
    let tmp = workspace();
    let elsewhere = TempDir::new().unwrap();

    pomgraph()
        .args(["version", "app", "--root"])
        .arg(tmp.path())
        .current_dir(elsewhere.path())
        .assert()
        .success()
        .stdout("3.0.0\n");
}

// ============================================================================
// pomgraph completions
// ============================================================================

#[test]
fn test_completions_bash() {
    pomgraph()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("pomgraph"));
}
