//! Non-fatal diagnostics
//!
//! Coercion failures, declaration gaps, failed sources and refused artifacts
//! never abort a run.
//! They are reported to an [`ErrorHandler`] injected by the caller.

use thiserror::Error;
use tracing::warn;

/// A recoverable problem found while transforming or compiling
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Diagnostic {
    /// A row value did not match its inferred kind; the field is left out of that row
    #[error("{origin}: row {row}: field '{field}' expected {expected}, found {found}")]
    Coercion {
        origin: String,
        row: usize,
        field: String,
        expected: String,
        found: String,
    },

    /// A property could not be rendered as declared and was degraded
    #[error("declaration gap for '{field}': {reason}")]
    DeclarationGap { field: String, reason: String },

    /// A literal value could not be rendered and was left out
    #[error("content for '{field}' omitted: {reason}")]
    ContentOmitted { field: String, reason: String },

    /// A source could not be read; the remaining sources still run
    #[error("source '{origin}' failed: {message}")]
    SourceFailed { origin: String, message: String },

    /// A declaration was registered twice under the same name
    #[error("duplicate declaration '{name}' in module '{module}' ignored")]
    DuplicateDeclaration { module: String, name: String },

    /// The sink refused an artifact; the other artifacts are still emitted
    #[error("artifact '{artifact}' not emitted: {message}")]
    EmitFailed { artifact: String, message: String },
}

/// Receives diagnostics as they happen
pub trait ErrorHandler {
    fn report(&mut self, diagnostic: Diagnostic);
}

impl<F> ErrorHandler for F
where
    F: FnMut(Diagnostic),
{
    fn report(&mut self, diagnostic: Diagnostic) {
        self(diagnostic)
    }
}

/// Logs every diagnostic as a warning
#[derive(Debug, Default, Clone, Copy)]
pub struct LogErrorHandler;

impl ErrorHandler for LogErrorHandler {
    fn report(&mut self, diagnostic: Diagnostic) {
        warn!(%diagnostic, "diagnostic");
    }
}

/// Keeps every diagnostic in arrival order
#[derive(Debug, Default, Clone)]
pub struct CollectingErrorHandler {
    diagnostics: Vec<Diagnostic>,
}

impl CollectingErrorHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

impl ErrorHandler for CollectingErrorHandler {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_handler() {
        let mut seen = Vec::new();
        {
            let mut handler = |d: Diagnostic| seen.push(d.to_string());
            handler.report(Diagnostic::DeclarationGap {
                field: "deep".to_string(),
                reason: "too deep".to_string(),
            });
        }
        assert_eq!(seen, vec!["declaration gap for 'deep': too deep".to_string()]);
    }

    #[test]
    fn test_coercion_message() {
        let diagnostic = Diagnostic::Coercion {
            origin: "people.csv".to_string(),
            row: 3,
            field: "age".to_string(),
            expected: "numeric".to_string(),
            found: "\"old\"".to_string(),
        };
        assert_eq!(
            diagnostic.to_string(),
            "people.csv: row 3: field 'age' expected numeric, found \"old\""
        );
    }
}
