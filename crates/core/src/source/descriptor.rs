//! Source descriptors

use std::fmt;
use std::path::PathBuf;

use super::{CsvSource, JsonSource, RowSource};
use crate::inflect;

/// One input origin plus its naming overrides
///
/// Names that are not overridden are inflected from the source identity:
/// `order-lines.csv` gives module `order-lines.csv`, interface `OrderLines`
/// and constant `orderLines`.
pub struct SourceDescriptor {
    source: Box<dyn RowSource>,
    module_name: Option<String>,
    interface_name: Option<String>,
    constant_name: Option<String>,
}

impl SourceDescriptor {
    pub fn new(source: impl RowSource + 'static) -> Self {
        Self {
            source: Box::new(source),
            module_name: None,
            interface_name: None,
            constant_name: None,
        }
    }

    /// Describe a CSV file
    pub fn csv(path: impl Into<PathBuf>) -> Self {
        Self::new(CsvSource::from_path(path))
    }

    /// Describe a JSON or NDJSON file
    pub fn json(path: impl Into<PathBuf>) -> Self {
        Self::new(JsonSource::from_path(path))
    }

    pub fn with_module_name(mut self, name: impl Into<String>) -> Self {
        self.module_name = Some(name.into());
        self
    }

    pub fn with_interface_name(mut self, name: impl Into<String>) -> Self {
        self.interface_name = Some(name.into());
        self
    }

    pub fn with_constant_name(mut self, name: impl Into<String>) -> Self {
        self.constant_name = Some(name.into());
        self
    }

    pub fn identity(&self) -> &str {
        self.source.identity()
    }

    pub fn reader(&self) -> &dyn RowSource {
        self.source.as_ref()
    }

    pub fn module_name(&self) -> String {
        self.module_name
            .clone()
            .unwrap_or_else(|| self.identity().to_string())
    }

    pub fn interface_name(&self) -> String {
        self.interface_name
            .clone()
            .unwrap_or_else(|| inflect::interface_identifier(self.identity()))
    }

    pub fn constant_name(&self) -> String {
        self.constant_name
            .clone()
            .unwrap_or_else(|| inflect::constant_identifier(self.identity()))
    }
}

impl fmt::Debug for SourceDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceDescriptor")
            .field("identity", &self.identity())
            .field("module_name", &self.module_name)
            .field("interface_name", &self.interface_name)
            .field("constant_name", &self.constant_name)
            .finish()
    }
}
