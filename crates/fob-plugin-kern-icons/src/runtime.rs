//! File access abstraction for the plugin
//!
//! Every source and asset read goes through the `Runtime` trait so hosts can
//! serve files from memory (virtual files, editor buffers) instead of disk.
//! `PluginRuntime` checks virtual files first, then falls back to the filesystem.

use async_trait::async_trait;
use parking_lot::RwLock;
use path_clean::PathClean;
use rustc_hash::FxHashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Result type for runtime operations
pub type RuntimeResult<T> = Result<T, RuntimeError>;

/// Errors that can occur during runtime operations
#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    /// File not found
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(String),

    /// Other runtime error
    #[error("Runtime error: {0}")]
    Other(String),
}

/// Platform runtime trait
///
/// Implement this to give the plugin access to files owned by the host.
#[async_trait]
pub trait Runtime: Send + Sync + std::fmt::Debug {
    /// Read a file's full contents
    async fn read_file(&self, path: &Path) -> RuntimeResult<Vec<u8>>;
}

/// Runtime implementation that combines virtual files with filesystem access
#[derive(Debug, Clone)]
pub struct PluginRuntime {
    /// Virtual files stored in memory
    virtual_files: Arc<RwLock<FxHashMap<PathBuf, Vec<u8>>>>,
    /// Working directory for resolving relative paths
    cwd: PathBuf,
}

impl PluginRuntime {
    /// Create a new PluginRuntime rooted at the given working directory
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        Self {
            virtual_files: Arc::new(RwLock::new(FxHashMap::default())),
            cwd: cwd.into(),
        }
    }

    /// Add (or replace) a virtual file
    pub fn add_virtual_file(&self, path: impl Into<PathBuf>, content: impl Into<Vec<u8>>) {
        let path_buf: PathBuf = path.into();
        let normalized = self.resolve_path(&path_buf);
        self.virtual_files
            .write()
            .insert(normalized, content.into());
    }

    /// Check if a path exists as a virtual file
    pub fn has_virtual_file(&self, path: &Path) -> bool {
        let normalized = self.resolve_path(path);
        self.virtual_files.read().contains_key(&normalized)
    }

    /// Working directory relative paths are resolved against
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Resolve a path against the working directory and clean redundant components
    fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf().clean()
        } else {
            self.cwd.join(path).clean()
        }
    }
}

#[async_trait]
impl Runtime for PluginRuntime {
    async fn read_file(&self, path: &Path) -> RuntimeResult<Vec<u8>> {
        let full_path = self.resolve_path(path);

        if let Some(content) = self.virtual_files.read().get(&full_path) {
            return Ok(content.clone());
        }

        tokio::task::spawn_blocking(move || {
            std::fs::read(&full_path).map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    RuntimeError::FileNotFound(full_path.clone())
                } else {
                    RuntimeError::Io(format!("Failed to read {}: {}", full_path.display(), e))
                }
            })
        })
        .await
        .map_err(|e| RuntimeError::Other(format!("Task join error: {}", e)))?
    }
}
