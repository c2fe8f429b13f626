//! File system sink
//!
//! Writes each artifact to `<base directory>/<artifact name>`.
//!
//! ## Security
//!
//! Artifact names are validated to prevent path traversal. Names with a ".."
//! path component are rejected, and resolved paths are verified to remain
//! within the base directory.

use super::{EmitMode, PersistenceSink, StorageError};
use async_trait::async_trait;
use std::path::{Component, Path, PathBuf};
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::info;

/// File system sink
#[derive(Debug, Clone)]
pub struct FileSystemSink {
    base_path: PathBuf,
}

impl FileSystemSink {
    /// Create a sink writing under `base_path`
    ///
    /// ```rust
    /// use fixturegen_core::storage::FileSystemSink;
    ///
    /// let sink = FileSystemSink::new("generated");
    /// ```
    pub fn new(base_path: impl AsRef<Path>) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Resolve an artifact name relative to the base path with security checks.
    fn resolve_path(&self, name: &str) -> Result<PathBuf, StorageError> {
        let normalized = name.trim_start_matches('/');

        if normalized.is_empty() {
            return Err(StorageError::PermissionDenied(
                "Empty artifact name".to_string(),
            ));
        }

        // Names like `v1..2.json.ts` are fine; only a `..` component escapes
        for component in Path::new(normalized).components() {
            if !matches!(component, Component::Normal(_) | Component::CurDir) {
                return Err(StorageError::PermissionDenied(
                    "Path traversal not allowed".to_string(),
                ));
            }
        }

        let full = self.base_path.join(normalized);

        // Existing parents must not lead out of the base directory (symlinks)
        if let Some(parent) = full.parent()
            && parent.exists()
            && self.base_path.exists()
        {
            let parent_canonical = parent.canonicalize().map_err(|e| {
                StorageError::IoError(format!("Failed to resolve parent path: {}", e))
            })?;
            let base_canonical = self
                .base_path
                .canonicalize()
                .unwrap_or_else(|_| self.base_path.clone());

            if !parent_canonical.starts_with(&base_canonical) {
                return Err(StorageError::PermissionDenied(
                    "Path escapes base directory".to_string(),
                ));
            }
        }

        Ok(full)
    }
}

#[async_trait(?Send)]
impl PersistenceSink for FileSystemSink {
    async fn persist(&self, name: &str, text: &str, mode: EmitMode) -> Result<(), StorageError> {
        let full_path = self.resolve_path(name)?;

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                StorageError::IoError(format!("Failed to create directory for {}: {}", name, e))
            })?;
        }

        let mut options = OpenOptions::new();
        options.create(true);
        match mode {
            EmitMode::Append => options.append(true),
            EmitMode::Replace => options.write(true).truncate(true),
        };

        let mut file = options
            .open(&full_path)
            .await
            .map_err(|e| StorageError::IoError(format!("Failed to open {}: {}", name, e)))?;
        file.write_all(text.as_bytes())
            .await
            .map_err(|e| StorageError::IoError(format!("Failed to write file {}: {}", name, e)))?;
        file.flush()
            .await
            .map_err(|e| StorageError::IoError(format!("Failed to flush file {}: {}", name, e)))?;

        info!(path = %full_path.display(), bytes = text.len(), ?mode, "Persisted artifact");
        Ok(())
    }
}
