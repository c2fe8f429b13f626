//! Fixturegen Core - TypeScript declarations from sample data
//!
//! Provides:
//! - Row sources for CSV, JSON/NDJSON and in-memory rows
//! - Content model inference from sampled rows
//! - Row coercion against the inferred model
//! - A declaration compiler for TypeScript interfaces and literals
//! - Module assembly in separate or combined layouts
//! - Persistence sinks (console, memory, file system)

pub mod artifacts;
pub mod config;
pub mod declare;
pub mod diagnostics;
pub mod inference;
pub mod inflect;
pub mod model;
pub mod pipeline;
pub mod source;
pub mod storage;
pub mod transform;

// Re-export commonly used types
pub use storage::{
    ConsoleSink, EmitMode, FileSystemSink, MemorySink, PersistenceSink, StorageError,
};

pub use artifacts::{Artifacts, EmitOutcome, Module};
pub use config::{ConfigError, Layout, SourceFormat, SourceSpec, TransformConfig};
pub use declare::DeclarationOptions;
pub use diagnostics::{CollectingErrorHandler, Diagnostic, ErrorHandler, LogErrorHandler};
pub use inference::{InferenceConfig, InferenceStats, ModelInferrer};
pub use model::{ContentModel, PropertyDefinition, PropertyKind, UnknownShape};
pub use pipeline::{PipelineError, SourceReport, TransformReport, TypeScriptTransformer};
pub use source::{
    CsvSource, JsonSource, MemorySource, RowSource, SourceDescriptor, SourceError, ValueEncoding,
};
pub use transform::ContentTransformer;
