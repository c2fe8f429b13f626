//! CLI error types

use fixturegen_core::config::ConfigError;
use fixturegen_core::pipeline::PipelineError;
use fixturegen_core::source::SourceError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("{}", .0.user_message())]
    Pipeline(#[from] PipelineError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    #[error("Output error: {0}")]
    Output(String),

    #[error("{0} source(s) or artifact(s) failed")]
    PartialFailure(usize),
}

impl CliError {
    /// Process exit code for this error
    pub fn exit_code(&self) -> u8 {
        match self {
            CliError::PartialFailure(_) => 2,
            _ => 1,
        }
    }
}
