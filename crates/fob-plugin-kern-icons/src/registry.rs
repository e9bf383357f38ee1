//! Tracked source files and the current icon set
//!
//! The registry accumulates every eligible file the host loads and, on a full
//! rebuild, re-scans all of them to recompute the icons in use. Incremental
//! diffs read the current set but never write it; only a full rebuild does.

use crate::config::KernIconsConfig;
use crate::error::{KernIconsError, Result};
use crate::icon::{IconRef, IconSet, extract_icons};
use crate::runtime::Runtime;
use futures::future::try_join_all;
use indexmap::IndexSet;
use parking_lot::RwLock;
use rustc_hash::FxBuildHasher;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Strip the query string hosts append for cache busting
pub fn normalize_id(id: &str) -> &str {
    id.split('?').next().unwrap_or(id)
}

/// Check if a file path lives inside an installed dependency
fn is_dependency_path(id: &str) -> bool {
    id.contains("node_modules")
}

/// Virtual modules are prefixed with a NUL byte by convention
fn is_synthetic_module(id: &str) -> bool {
    id.starts_with('\0')
}

fn has_eligible_extension(path: &str, extensions: &[String]) -> bool {
    Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| extensions.iter().any(|allowed| allowed == ext))
}

/// Registry of tracked files and the most recently computed icon set
#[derive(Debug)]
pub struct IconRegistry {
    config: Arc<KernIconsConfig>,
    tracked_files: RwLock<IndexSet<String, FxBuildHasher>>,
    current_icons: RwLock<IconSet>,
}

impl IconRegistry {
    pub fn new(config: Arc<KernIconsConfig>) -> Self {
        Self {
            config,
            tracked_files: RwLock::new(IndexSet::default()),
            current_icons: RwLock::new(IconSet::default()),
        }
    }

    /// Whether `id` may be tracked at all
    pub fn is_eligible(&self, id: &str) -> bool {
        if is_synthetic_module(id) || is_dependency_path(id) {
            return false;
        }
        let path = normalize_id(id);
        has_eligible_extension(path, &self.config.extensions) && !self.config.is_ignored(path)
    }

    /// Remember `id` for future re-scans
    ///
    /// Returns `true` when the file was not tracked before. Ineligible ids are
    /// ignored.
    pub fn record_file(&self, id: &str) -> bool {
        if !self.is_eligible(id) {
            return false;
        }
        let path = normalize_id(id);
        let inserted = self.tracked_files.write().insert(path.to_string());
        if inserted {
            debug!("[fob-kern-icons] Tracking {}", path);
        }
        inserted
    }

    pub fn is_tracked(&self, id: &str) -> bool {
        self.tracked_files.read().contains(normalize_id(id))
    }

    /// Snapshot of the tracked files in the order they were first seen
    pub fn tracked_files(&self) -> Vec<String> {
        self.tracked_files.read().iter().cloned().collect()
    }

    /// Snapshot of the current icon set
    pub fn current_icons(&self) -> IconSet {
        self.current_icons.read().clone()
    }

    /// Re-scan every tracked file and replace the current icon set
    ///
    /// Files are read concurrently. If any read fails the current set is left
    /// as it was.
    pub async fn rebuild_current_set(&self, runtime: &dyn Runtime) -> Result<IconSet> {
        let files = self.tracked_files();

        let contents = try_join_all(files.iter().map(|file| read_source(runtime, file))).await?;

        let mut icons = IconSet::default();
        for text in &contents {
            icons.extend(extract_icons(text));
        }

        debug!(
            "[fob-kern-icons] Rebuilt icon set: {} icons across {} files",
            icons.len(),
            files.len()
        );

        *self.current_icons.write() = icons.clone();
        Ok(icons)
    }

    /// Icons referenced in `text` that are not in the current set yet
    ///
    /// Keeps discovery order and leaves the current set untouched.
    pub fn diff_on_change(&self, text: &str) -> Vec<IconRef> {
        let found = extract_icons(text);
        let current = self.current_icons.read();
        found
            .into_iter()
            .filter(|icon| !current.contains(icon))
            .collect()
    }
}

/// Read a source file as UTF-8 text through the runtime
pub(crate) async fn read_source(runtime: &dyn Runtime, file: &str) -> Result<String> {
    let bytes = runtime
        .read_file(Path::new(file))
        .await
        .map_err(|e| KernIconsError::source_read(file, e))?;
    String::from_utf8(bytes).map_err(|_| KernIconsError::invalid_utf8(file))
}
