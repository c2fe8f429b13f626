//! Error types for generation runs
//!
//! Only conditions that stop a whole run surface here. A source that fails
//! inside a multi-source run, or an artifact the sink refuses, is reported as
//! a diagnostic instead and the run carries on.

use thiserror::Error;

use crate::config::ConfigError;
use crate::source::SourceError;

/// Errors that can stop a generation run
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Configuration could not be loaded or is unusable
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A single source could not be read
    #[error("Source error: {0}")]
    Source(#[from] SourceError),
}

/// Result type for pipeline operations
pub type PipelineResult<T> = Result<T, PipelineError>;

impl PipelineError {
    /// Get a user-friendly error message for CLI output
    pub fn user_message(&self) -> String {
        match self {
            PipelineError::Config(err) => {
                format!("Configuration error: {err}\n\nHint: Check your fixturegen configuration file.")
            }
            PipelineError::Source(SourceError::NotFound(path)) => {
                format!(
                    "Source not found: {path}\n\nHint: Check that the file exists and the path is correct."
                )
            }
            _ => self.to_string(),
        }
    }
}
