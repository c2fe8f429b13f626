//! Persistence sinks
//!
//! Defines the PersistenceSink trait and the sinks emitted artifacts go to:
//! - ConsoleSink: echo artifacts to stdout
//! - MemorySink: keep artifacts in an ordered list (tests, embedding)
//! - FileSystemSink: write artifacts under a base directory

mod console;
pub mod filesystem;
mod memory;

pub use console::ConsoleSink;
pub use filesystem::FileSystemSink;
pub use memory::MemorySink;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Error type for persistence operations
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    IoError(String),
    #[error("Permission denied: {0}")]
    PermissionDenied(String),
    #[error("Storage backend error: {0}")]
    BackendError(String),
}

/// Whether an artifact replaces or extends what a sink already holds
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EmitMode {
    /// Add the text after any existing artifact of the same name
    Append,
    /// Overwrite any existing artifact of the same name
    #[default]
    Replace,
}

/// An artifact as retained by [`MemorySink`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedArtifact {
    pub name: String,
    pub text: String,
}

/// Destination for emitted artifacts
#[async_trait(?Send)]
pub trait PersistenceSink: Send + Sync {
    /// Persist one named artifact
    async fn persist(&self, name: &str, text: &str, mode: EmitMode) -> Result<(), StorageError>;
}
