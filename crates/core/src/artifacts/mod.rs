//! Artifact assembly
//!
//! [`Artifacts`] gathers [`Module`]s for one run and emits them once through a
//! [`PersistenceSink`] when finalized. Registration is append-only: declaring
//! a module, interface or content name a second time returns the existing
//! entry unchanged.

mod module;

pub use module::{ContentDecl, ContentExpr, InterfaceDecl, Module};

use tracing::{Instrument, info, info_span, warn};

use crate::storage::{EmitMode, PersistenceSink, StorageError};

/// A module the sink refused
#[derive(Debug)]
pub struct EmitFailure {
    pub artifact: String,
    pub error: StorageError,
}

/// What [`Artifacts::finalize`] managed to persist
#[derive(Debug, Default)]
pub struct EmitOutcome {
    /// Persisted artifact names, in declaration order
    pub persisted: Vec<String>,
    pub failures: Vec<EmitFailure>,
}

impl EmitOutcome {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Modules declared during one run, in declaration order
#[derive(Debug, Clone)]
pub struct Artifacts {
    modules: Vec<Module>,
    indent: String,
}

impl Default for Artifacts {
    fn default() -> Self {
        Self::new()
    }
}

impl Artifacts {
    pub fn new() -> Self {
        Self::with_indent("  ")
    }

    /// Indentation used when rendering module bodies
    pub fn with_indent(indent: impl Into<String>) -> Self {
        Self {
            modules: Vec::new(),
            indent: indent.into(),
        }
    }

    /// Get or create the module called `name`
    pub fn declare_module(&mut self, name: &str) -> &mut Module {
        let index = match self.modules.iter().position(|m| m.name() == name) {
            Some(index) => index,
            None => {
                self.modules.push(Module::new(name, self.indent.clone()));
                self.modules.len() - 1
            }
        };
        &mut self.modules[index]
    }

    pub fn module(&self, name: &str) -> Option<&Module> {
        self.modules.iter().find(|m| m.name() == name)
    }

    pub fn modules(&self) -> &[Module] {
        &self.modules
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Render and persist every module, in declaration order.
    ///
    /// A module the sink refuses is recorded in the outcome and the
    /// remaining modules are still persisted.
    pub async fn finalize(self, sink: &dyn PersistenceSink, mode: EmitMode) -> EmitOutcome {
        let span = info_span!("emit", modules = self.modules.len(), ?mode);
        async move {
            let mut outcome = EmitOutcome::default();
            for module in &self.modules {
                let name = module.artifact_name();
                let text = module.render();
                match sink.persist(&name, &text, mode).await {
                    Ok(()) => {
                        info!(artifact = %name, bytes = text.len(), "Emitted module");
                        outcome.persisted.push(name);
                    }
                    Err(error) => {
                        warn!(artifact = %name, error = %error, "Failed to emit module");
                        outcome.failures.push(EmitFailure {
                            artifact: name,
                            error,
                        });
                    }
                }
            }
            outcome
        }
        .instrument(span)
        .await
    }
}
