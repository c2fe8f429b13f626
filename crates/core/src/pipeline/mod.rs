//! Generation pipeline
//!
//! Orchestrates a full run:
//! - Read each source (CSV, JSON, in-memory)
//! - Infer its content model from the sampled rows
//! - Coerce every row and compile interface and literal text
//! - Assemble modules in the configured layout
//! - Emit every module once through a persistence sink
//!
//! # Example
//!
//! ```rust,ignore
//! use fixturegen_core::config::{Layout, SourceSpec, TransformConfig};
//! use fixturegen_core::pipeline::run;
//! use fixturegen_core::storage::FileSystemSink;
//!
//! let config = TransformConfig::new()
//!     .with_layout(Layout::Combined)
//!     .with_source(SourceSpec::new("people.csv"))
//!     .with_source(SourceSpec::new("orders.json"));
//!
//! let report = run(config, &FileSystemSink::new("generated")).await?;
//! report.print_summary();
//! ```
//!
//! # Layouts
//!
//! 1. **Separate**: one module per source holding its interface and constant
//! 2. **Combined**: one module with an interface per source plus a top-level
//!    interface and constant keyed by each source's constant name

mod error;
mod report;
mod transformer;

pub use error::{PipelineError, PipelineResult};
pub use report::{ArtifactFailure, SourceReport, TransformReport};
pub use transformer::TypeScriptTransformer;

use crate::config::TransformConfig;
use crate::storage::PersistenceSink;

/// Run every configured source and emit the result
///
/// This is a convenience function for simple runs. Diagnostics go to the log.
/// A source that cannot be described (unknown format, bad delimiter) fails on
/// its own and the other sources still run.
pub async fn run(
    config: TransformConfig,
    sink: &dyn PersistenceSink,
) -> PipelineResult<TransformReport> {
    config.validate()?;
    let sources = config.sources.clone();

    let mut transformer = TypeScriptTransformer::new(config);
    for spec in &sources {
        match spec.to_descriptor() {
            Ok(descriptor) => {
                transformer.transform_sources(std::slice::from_ref(&descriptor)).await;
            }
            Err(err) => transformer.skip_source(&spec.identity(), err.to_string()),
        }
    }
    Ok(transformer.finalize(sink).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SourceSpec;
    use crate::storage::MemorySink;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_run_from_config() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("flags.csv"), "name,enabled\nbeta,true\n").unwrap();

        let config = TransformConfig::new().with_source(SourceSpec::new(temp.path().join("flags.csv")));
        let sink = MemorySink::new();
        let report = run(config, &sink).await.unwrap();

        assert!(report.is_success());
        assert_eq!(report.artifacts, vec!["flags.csv.ts"]);
        assert_eq!(
            sink.text("flags.csv.ts").unwrap(),
            "// Generated from flags.csv. Do not edit.\n\
             \n\
             export interface Flags {\n  readonly name: string; // name\n  readonly enabled: boolean; // enabled\n}\n\
             \n\
             export const flags: Flags = { name: \"beta\", enabled: true };\n"
        );
    }

    #[tokio::test]
    async fn test_unknown_format_fails_only_that_source() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("flags.csv"), "name\nbeta\n").unwrap();
        std::fs::write(temp.path().join("notes.xml"), "<notes/>").unwrap();

        let config = TransformConfig::new()
            .with_source(SourceSpec::new(temp.path().join("notes.xml")))
            .with_source(SourceSpec::new(temp.path().join("flags.csv")));
        let sink = MemorySink::new();
        let report = run(config, &sink).await.unwrap();

        assert!(!report.is_success());
        let failed: Vec<&str> = report.failed_sources().map(|s| s.identity.as_str()).collect();
        assert_eq!(failed, vec!["notes.xml"]);
        assert_eq!(report.sources.len(), 2);
        assert_eq!(report.artifacts, vec!["flags.csv.ts"]);
        assert!(sink.text("flags.csv.ts").is_some());
    }

    #[tokio::test]
    async fn test_run_requires_sources() {
        let sink = MemorySink::new();
        let result = run(TransformConfig::new(), &sink).await;
        assert!(matches!(result, Err(PipelineError::Config(_))));
        assert!(sink.results().is_empty());
    }
}
