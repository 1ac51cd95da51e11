//! Test utilities and mocks for pomgraph unit tests.
//!
//! Provides call-recording stand-ins for the two expensive collaborators:
//! the Maven version evaluator and workspace discovery. Workspace fixtures
//! live in [`fixtures`].
//!
//! # Example
//!
//! ```rust,ignore
//! use pomgraph::test_support::{PomBuilder, RecordingEvaluator, WorkspaceFixture};
//!
//! #[test]
//! fn test_example() {
//!     let ws = WorkspaceFixture::new();
//!     ws.pom(".", PomBuilder::new("com.acme", "app", "1.0.${build.number}"));
//!
//!     let evaluator = RecordingEvaluator::returning("1.0.7");
//!     // resolve versions, then inspect evaluator.calls()...
//! }
//! ```

pub mod fixtures;

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use anyhow::{bail, Result};

use crate::core::errors::GraphResult;
use crate::core::project::WorkspaceData;
use crate::core::workspace::{WorkspaceDiscovery, WorkspaceWalker};
use crate::resolver::ExpressionEvaluator;
use crate::util::config::Config;

pub use fixtures::*;

/// Evaluator that records every call and answers with a canned version.
#[derive(Debug, Default)]
pub struct RecordingEvaluator {
    answer: Option<String>,
    calls: Mutex<Vec<(String, PathBuf)>>,
}

impl RecordingEvaluator {
    /// Answer every evaluation with `version`.
    pub fn returning(version: impl Into<String>) -> Self {
        RecordingEvaluator {
            answer: Some(version.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Fail every evaluation, as if Maven were not installed.
    pub fn failing() -> Self {
        RecordingEvaluator::default()
    }

    /// `(artifactId, working directory)` of every call, in order.
    pub fn calls(&self) -> Vec<(String, PathBuf)> {
        self.calls.lock().unwrap().clone()
    }
}

impl ExpressionEvaluator for RecordingEvaluator {
    fn evaluate_version(&self, artifact_id: &str, maven_root_dir: &Path) -> Result<String> {
        self.calls
            .lock()
            .unwrap()
            .push((artifact_id.to_string(), maven_root_dir.to_path_buf()));

        match self.answer {
            Some(ref version) => Ok(version.clone()),
            None => bail!("mvn: command not found"),
        }
    }
}

/// Discovery that counts how often it runs, delegating to the real walker.
#[derive(Debug, Default)]
pub struct CountingDiscovery {
    calls: AtomicUsize,
}

impl CountingDiscovery {
    /// Number of discoveries run so far.
    pub fn count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl WorkspaceDiscovery for CountingDiscovery {
    fn discover(&self, config: &Config) -> GraphResult<WorkspaceData> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        WorkspaceWalker::discover_all(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_evaluator() {
        let evaluator = RecordingEvaluator::returning("2.0.0");
        assert_eq!(
            evaluator
                .evaluate_version("api", Path::new("/ws"))
                .unwrap(),
            "2.0.0"
        );
        assert_eq!(
            evaluator.calls(),
            vec![("api".to_string(), PathBuf::from("/ws"))]
        );

        assert!(RecordingEvaluator::failing()
            .evaluate_version("api", Path::new("/ws"))
            .is_err());
    }
}
