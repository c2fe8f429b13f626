//! Source-to-TypeScript orchestration

use std::time::Instant;

use tracing::{Instrument, debug, info, info_span, warn};

use super::report::{ArtifactFailure, SourceReport, TransformReport};
use crate::artifacts::{Artifacts, ContentDecl, ContentExpr, InterfaceDecl};
use crate::config::{Layout, TransformConfig};
use crate::declare::{CompileContext, content_literal, interface_members};
use crate::diagnostics::{Diagnostic, ErrorHandler, LogErrorHandler};
use crate::inference::{InferenceStats, ModelInferrer};
use crate::inflect;
use crate::source::{SourceDescriptor, SourceError};
use crate::storage::PersistenceSink;
use crate::transform::ContentTransformer;

/// Counts what passes through to the run's handler
struct CountingHandler<'a> {
    inner: &'a mut dyn ErrorHandler,
    coercions: usize,
    total: usize,
}

impl<'a> CountingHandler<'a> {
    fn new(inner: &'a mut dyn ErrorHandler) -> Self {
        Self {
            inner,
            coercions: 0,
            total: 0,
        }
    }
}

impl ErrorHandler for CountingHandler<'_> {
    fn report(&mut self, diagnostic: Diagnostic) {
        if matches!(diagnostic, Diagnostic::Coercion { .. }) {
            self.coercions += 1;
        }
        self.total += 1;
        self.inner.report(diagnostic);
    }
}

/// One source, compiled but not yet declared
struct CompiledSource {
    members: Vec<String>,
    value: ContentExpr,
    multi_row: bool,
    rows: usize,
    stats: InferenceStats,
    coercions: usize,
    diagnostics: usize,
}

/// Entry on the top-level declarations of the combined layout
struct CombinedEntry {
    key: String,
    type_name: String,
    value: ContentExpr,
    origin: String,
}

/// Turns row sources into TypeScript modules.
///
/// Sources are processed strictly in the order given. Declarations
/// accumulate in an [`Artifacts`] builder that is emitted once by
/// [`finalize`](Self::finalize).
///
/// ```rust,ignore
/// let mut transformer = TypeScriptTransformer::new(TransformConfig::default());
/// transformer
///     .transform_sources(&[SourceDescriptor::csv("people.csv")])
///     .await;
/// let report = transformer.finalize(&ConsoleSink::new()).await;
/// ```
pub struct TypeScriptTransformer {
    config: TransformConfig,
    handler: Box<dyn ErrorHandler>,
    artifacts: Artifacts,
    combined: Vec<CombinedEntry>,
    reports: Vec<SourceReport>,
    started: Instant,
}

impl TypeScriptTransformer {
    /// Create a transformer that logs diagnostics
    pub fn new(config: TransformConfig) -> Self {
        let artifacts = Artifacts::with_indent(config.declarations.indent.clone());
        Self {
            config,
            handler: Box::new(LogErrorHandler),
            artifacts,
            combined: Vec::new(),
            reports: Vec::new(),
            started: Instant::now(),
        }
    }

    /// Send diagnostics to `handler` instead of the log
    pub fn with_error_handler(mut self, handler: impl ErrorHandler + 'static) -> Self {
        self.handler = Box::new(handler);
        self
    }

    pub fn config(&self) -> &TransformConfig {
        &self.config
    }

    /// Declarations gathered so far. The combined layout's top-level
    /// declarations are only added by [`finalize`](Self::finalize).
    pub fn artifacts(&self) -> &Artifacts {
        &self.artifacts
    }

    pub fn reports(&self) -> &[SourceReport] {
        &self.reports
    }

    /// Transform every source in order. A source that fails is reported as a
    /// [`Diagnostic::SourceFailed`] and the remaining sources still run.
    pub async fn transform_sources(&mut self, sources: &[SourceDescriptor]) -> &[SourceReport] {
        for source in sources {
            let outcome = self.transform_source(source).await.map(|_| ());
            if let Err(err) = outcome {
                self.handler.report(Diagnostic::SourceFailed {
                    origin: source.identity().to_string(),
                    message: err.to_string(),
                });
            }
        }
        &self.reports
    }

    /// Record a source that could not be opened at all, such as one whose
    /// format is unknown. It is reported like a source that failed to read.
    pub fn skip_source(&mut self, identity: &str, message: impl Into<String>) {
        let message = message.into();
        let module = match self.config.layout {
            Layout::Separate => identity.to_string(),
            Layout::Combined => self.config.module_name.clone(),
        };
        warn!(source = %identity, error = %message, "Source skipped");
        self.handler.report(Diagnostic::SourceFailed {
            origin: identity.to_string(),
            message: message.clone(),
        });
        self.reports.push(SourceReport {
            identity: identity.to_string(),
            module,
            error: Some(message),
            ..Default::default()
        });
    }

    /// Transform one source and declare its interface and content.
    ///
    /// A read failure declares nothing for the source and is returned.
    pub async fn transform_source(
        &mut self,
        source: &SourceDescriptor,
    ) -> Result<&SourceReport, SourceError> {
        let span = info_span!("transform", source = %source.identity());
        let module = match self.config.layout {
            Layout::Separate => source.module_name(),
            Layout::Combined => self.config.module_name.clone(),
        };

        match self.compile(source).instrument(span).await {
            Ok(compiled) => {
                info!(
                    source = %source.identity(),
                    module = %module,
                    rows = compiled.rows,
                    fields = compiled.stats.fields_discovered,
                    "Transformed source"
                );
                let report = SourceReport {
                    identity: source.identity().to_string(),
                    module: module.clone(),
                    rows: compiled.rows,
                    stats: compiled.stats.clone(),
                    coercion_failures: compiled.coercions,
                    diagnostics: compiled.diagnostics,
                    error: None,
                };
                self.declare(source, &module, compiled);
                self.reports.push(report);
            }
            Err(err) => {
                warn!(source = %source.identity(), error = %err, "Source failed");
                self.reports.push(SourceReport {
                    identity: source.identity().to_string(),
                    module,
                    error: Some(err.to_string()),
                    ..Default::default()
                });
                return Err(err);
            }
        }

        let last = self.reports.len() - 1;
        Ok(&self.reports[last])
    }

    /// Read, infer and compile one source without touching the artifacts
    async fn compile(&mut self, source: &SourceDescriptor) -> Result<CompiledSource, SourceError> {
        let reader = source.reader();
        let mut rows = reader.open().await?;

        let sample_size = self.config.inference.effective_sample_size();
        let mut sampled = Vec::new();
        while sampled.len() < sample_size {
            match rows.next() {
                Some(row) => sampled.push(row?),
                None => break,
            }
        }

        let inferrer = ModelInferrer::with_config(self.config.inference.clone(), reader.encoding());
        let model = inferrer.infer(&sampled);
        let stats = InferenceStats::from_model(&model, sampled.len());
        debug!(sampled = sampled.len(), fields = model.len(), "Inferred model");

        let transformer = ContentTransformer::new(source.identity(), reader.encoding());
        let mut handler = CountingHandler::new(self.handler.as_mut());

        let mut literals = Vec::with_capacity(sampled.len());
        for (index, row) in sampled.iter().enumerate() {
            let content = transformer.transform_row(&model, row, index, &mut handler);
            literals.push(content_literal(&model, &content, &mut handler));
        }
        for (offset, row) in rows.enumerate() {
            let row = row?;
            let content = transformer.transform_row(&model, &row, sampled.len() + offset, &mut handler);
            literals.push(content_literal(&model, &content, &mut handler));
        }

        let ctx = CompileContext::new(&self.config.declarations);
        let members = interface_members(&model, &ctx, &mut handler);

        let row_count = literals.len();
        let single = row_count == 1 && self.config.single_row_as_object;
        let value = if single {
            ContentExpr::Object(literals.remove(0))
        } else {
            ContentExpr::Rows(literals)
        };

        Ok(CompiledSource {
            members,
            value,
            multi_row: !single,
            rows: row_count,
            stats,
            coercions: handler.coercions,
            diagnostics: handler.total,
        })
    }

    fn declare(&mut self, source: &SourceDescriptor, module_name: &str, compiled: CompiledSource) {
        let interface_name = source.interface_name();
        let constant_name = source.constant_name();
        let type_name = if compiled.multi_row {
            format!("{}[]", interface_name)
        } else {
            interface_name.clone()
        };

        let module = self.artifacts.declare_module(module_name);
        module.add_origin(source.identity());

        if module.interface(&interface_name).is_some() {
            self.handler.report(Diagnostic::DuplicateDeclaration {
                module: module_name.to_string(),
                name: interface_name.clone(),
            });
        } else {
            module.declare_interface(InterfaceDecl::new(&interface_name, compiled.members));
        }

        match self.config.layout {
            Layout::Separate => {
                if module.content(&constant_name).is_some() {
                    self.handler.report(Diagnostic::DuplicateDeclaration {
                        module: module_name.to_string(),
                        name: constant_name,
                    });
                } else {
                    module.declare_content(ContentDecl::new(constant_name, type_name, compiled.value));
                }
            }
            Layout::Combined => {
                if self.combined.iter().any(|entry| entry.key == constant_name) {
                    self.handler.report(Diagnostic::DuplicateDeclaration {
                        module: module_name.to_string(),
                        name: constant_name,
                    });
                } else {
                    self.combined.push(CombinedEntry {
                        key: constant_name,
                        type_name,
                        value: compiled.value,
                        origin: source.identity().to_string(),
                    });
                }
            }
        }
    }

    /// Add the combined layout's top-level interface and constant
    fn declare_combined(&mut self) {
        let module_name = self.config.module_name.clone();
        let base_name = self
            .config
            .interface_name
            .clone()
            .unwrap_or_else(|| inflect::interface_identifier(&module_name));
        let constant_name = self
            .config
            .constant_name
            .clone()
            .unwrap_or_else(|| inflect::constant_identifier(&module_name));
        let readonly = if self.config.declarations.readonly { "readonly " } else { "" };

        let entries = std::mem::take(&mut self.combined);
        let members = entries
            .iter()
            .map(|entry| format!("{}{}: {}; // {}", readonly, entry.key, entry.type_name, entry.origin))
            .collect();
        let record = entries
            .into_iter()
            .map(|entry| (entry.key, entry.value))
            .collect();

        let module = self.artifacts.declare_module(&module_name);

        // A source interface may already hold the name
        let mut interface_name = base_name.clone();
        let mut index = 2;
        while module.interface(&interface_name).is_some() {
            interface_name = format!("{}{}", base_name, index);
            index += 1;
        }
        if interface_name != base_name {
            debug!(taken = %base_name, name = %interface_name, "Renamed combined interface");
        }

        module.declare_interface(InterfaceDecl::new(&interface_name, members));
        module.declare_content(ContentDecl::new(
            constant_name,
            interface_name,
            ContentExpr::Record(record),
        ));
    }

    /// Emit every declared module through `sink`, once.
    ///
    /// An artifact the sink refuses is reported as a
    /// [`Diagnostic::EmitFailed`] and listed in the report.
    pub async fn finalize(mut self, sink: &dyn PersistenceSink) -> TransformReport {
        if self.config.layout == Layout::Combined && !self.combined.is_empty() {
            self.declare_combined();
        }

        let artifacts = std::mem::take(&mut self.artifacts);
        let outcome = artifacts.finalize(sink, self.config.emit_mode).await;

        let mut failed_artifacts = Vec::with_capacity(outcome.failures.len());
        for failure in outcome.failures {
            let error = failure.error.to_string();
            self.handler.report(Diagnostic::EmitFailed {
                artifact: failure.artifact.clone(),
                message: error.clone(),
            });
            failed_artifacts.push(ArtifactFailure {
                artifact: failure.artifact,
                error,
            });
        }

        TransformReport {
            sources: self.reports,
            artifacts: outcome.persisted,
            failed_artifacts,
            duration_ms: self.started.elapsed().as_millis() as u64,
        }
    }
}
