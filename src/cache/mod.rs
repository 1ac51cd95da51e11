//! Workspace data cache.
//!
//! Discovery reads every manifest of the workspace and may run Maven, so its
//! result is cached on disk under a key derived from manifest *content* and
//! the normalized configuration. Within one process, concurrent callers for
//! the same key share a single computation.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use anyhow::Result;
use parking_lot::Mutex;
use rayon::prelude::*;
use tracing::{debug, warn};

use crate::core::errors::{GraphError, GraphResult};
use crate::core::manifest::MANIFEST_NAME;
use crate::core::project::WorkspaceData;
use crate::core::target::PROJECT_CONFIG_FILE;
use crate::core::workspace::{WorkspaceDiscovery, WorkspaceWalker};
use crate::util::config::Config;
use crate::util::fs::{
    find_files_named, read_to_string, relative_path, remove_dir_all_if_exists, to_slash,
    write_atomic,
};
use crate::util::hash::{sha256_bytes, sha256_file, Fingerprint};

/// Set to `false` to ignore workspace data stored on disk.
pub const CACHE_ENV_VAR: &str = "POMGRAPH_CACHE_PROJECT_GRAPH";

type Slot = Arc<OnceLock<GraphResult<Arc<WorkspaceData>>>>;

/// Content-addressed cache of [`WorkspaceData`].
pub struct WorkspaceDataCache<D = WorkspaceWalker> {
    cache_dir: PathBuf,
    discovery: D,
    read_from_disk: bool,
    in_flight: Mutex<HashMap<String, Slot>>,
}

impl WorkspaceDataCache<WorkspaceWalker> {
    /// Create a cache storing its files in `cache_dir`.
    pub fn new(cache_dir: impl Into<PathBuf>) -> Self {
        Self::with_discovery(cache_dir, WorkspaceWalker)
    }
}

impl<D: WorkspaceDiscovery> WorkspaceDataCache<D> {
    /// Create a cache computing misses with `discovery`.
    pub fn with_discovery(cache_dir: impl Into<PathBuf>, discovery: D) -> Self {
        WorkspaceDataCache {
            cache_dir: cache_dir.into(),
            discovery,
            read_from_disk: disk_reads_enabled(),
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    /// Never read stored data; results are still written.
    pub fn without_disk_reads(mut self) -> Self {
        self.read_from_disk = false;
        self
    }

    /// Get the cache directory.
    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Path of the file holding data for `key`.
    pub fn cache_file(&self, key: &str) -> PathBuf {
        self.cache_dir.join(format!("workspace-data-{}.json", key))
    }

    /// Get the workspace data for `config`, computing it on a miss.
    pub fn get(&self, config: &Config) -> GraphResult<Arc<WorkspaceData>> {
        let key = cache_key(config)?;

        let slot = {
            let mut in_flight = self.in_flight.lock();
            Arc::clone(in_flight.entry(key.clone()).or_default())
        };

        let result = slot
            .get_or_init(|| self.load_or_compute(&key, config))
            .clone();

        if result.is_err() {
            // a failure must not stick; the next caller retries
            let mut in_flight = self.in_flight.lock();
            if in_flight
                .get(&key)
                .is_some_and(|current| Arc::ptr_eq(current, &slot))
            {
                in_flight.remove(&key);
            }
        }

        result
    }

    /// Drop memoized and stored data.
    pub fn invalidate(&self) -> Result<()> {
        self.in_flight.lock().clear();
        remove_dir_all_if_exists(&self.cache_dir)
    }

    fn load_or_compute(&self, key: &str, config: &Config) -> GraphResult<Arc<WorkspaceData>> {
        let path = self.cache_file(key);

        if self.read_from_disk {
            if let Some(data) = read_stored(&path) {
                debug!(path = %path.display(), "workspace data cache hit");
                return Ok(Arc::new(data));
            }
        }

        debug!(key = %key, "computing workspace data");
        let data = self.discovery.discover(config)?;

        match serde_json::to_string(&data) {
            Ok(json) => {
                if let Err(e) = write_atomic(&path, &json) {
                    warn!(path = %path.display(), error = %format!("{:#}", e), "failed to store workspace data");
                }
            }
            Err(e) => warn!(error = %e, "failed to serialize workspace data"),
        }

        Ok(Arc::new(data))
    }
}

/// Compute the cache key of a workspace.
///
/// Every `pom.xml` and `project.json` under the workspace root contributes its
/// relative path and content hash; the serialized configuration contributes
/// the rest.
pub fn cache_key(config: &Config) -> GraphResult<String> {
    let root = &config.workspace_root;
    let key_error = |path: &Path, e: anyhow::Error| GraphError::CacheKey {
        path: path.to_path_buf(),
        message: format!("{:#}", e),
    };

    // project.json presence decides skipProject, so it is part of the key too
    let mut manifests = find_files_named(root, MANIFEST_NAME).map_err(|e| key_error(root, e))?;
    manifests.extend(
        find_files_named(root, PROJECT_CONFIG_FILE).map_err(|e| key_error(root, e))?,
    );

    let hashes = manifests
        .par_iter()
        .map(|path| sha256_file(path).map_err(|e| key_error(path, e)))
        .collect::<GraphResult<Vec<_>>>()?;

    let mut fingerprint = Fingerprint::new();
    for (path, hash) in manifests.iter().zip(&hashes) {
        fingerprint.update_str(&to_slash(&relative_path(root, path)));
        fingerprint.update_str(hash);
    }

    let config_json = serde_json::to_string(config).map_err(|e| key_error(root, e.into()))?;
    fingerprint.update_str(&sha256_bytes(config_json.as_bytes()));

    Ok(fingerprint.finish())
}

/// Stored data, or `None` when absent or unreadable.
fn read_stored(path: &Path) -> Option<WorkspaceData> {
    if !path.is_file() {
        return None;
    }

    let content = match read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            warn!(error = %format!("{:#}", e), "ignoring unreadable workspace data cache");
            return None;
        }
    };

    match serde_json::from_str(&content) {
        Ok(data) => Some(data),
        Err(e) => {
            warn!(
                path = %path.display(),
                error = %e,
                "corrupt workspace data cache file, recomputing"
            );
            None
        }
    }
}

fn disk_reads_enabled() -> bool {
    std::env::var(CACHE_ENV_VAR).map_or(true, |value| value != "false")
}
