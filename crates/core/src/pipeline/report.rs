//! Run reports

use serde::Serialize;

use crate::inference::InferenceStats;

/// Outcome of transforming one source
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceReport {
    /// Source identity
    pub identity: String,
    /// Module the source was declared in
    pub module: String,
    /// Rows read, including sampled rows
    pub rows: usize,
    /// Model statistics; `rows_sampled` is the number of rows inference used
    pub stats: InferenceStats,
    /// Fields left out of a row because they did not fit the model
    pub coercion_failures: usize,
    /// Every diagnostic raised for this source
    pub diagnostics: usize,
    /// Why the source failed, if it did
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SourceReport {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// An artifact that could not be persisted
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArtifactFailure {
    pub artifact: String,
    pub error: String,
}

/// Outcome of a whole run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformReport {
    /// One entry per source, in processing order
    pub sources: Vec<SourceReport>,
    /// Names of the persisted artifacts, in emission order
    pub artifacts: Vec<String>,
    /// Artifacts the sink refused, with the reason
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failed_artifacts: Vec<ArtifactFailure>,
    /// Total duration in milliseconds
    pub duration_ms: u64,
}

impl TransformReport {
    /// Check if every source was transformed and every artifact persisted
    pub fn is_success(&self) -> bool {
        self.sources.iter().all(SourceReport::is_success) && self.failed_artifacts.is_empty()
    }

    pub fn failed_sources(&self) -> impl Iterator<Item = &SourceReport> {
        self.sources.iter().filter(|report| !report.is_success())
    }

    /// Print summary to stderr
    pub fn print_summary(&self) {
        eprintln!();
        eprintln!(
            "Transformed {} source(s) into {} artifact(s) in {}ms",
            self.sources.len(),
            self.artifacts.len(),
            self.duration_ms
        );
        for report in &self.sources {
            match &report.error {
                Some(error) => eprintln!("  ✗ {}: {}", report.identity, error),
                None => eprintln!(
                    "  ✓ {} -> {} ({} rows, {} fields, {} coercion failures)",
                    report.identity,
                    report.module,
                    report.rows,
                    report.stats.fields_discovered,
                    report.coercion_failures
                ),
            }
        }
        for failure in &self.failed_artifacts {
            eprintln!("  ✗ {}: {}", failure.artifact, failure.error);
        }
    }
}
