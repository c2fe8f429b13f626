//! Run configuration
//!
//! A [`TransformConfig`] describes one generation run: which sources to read,
//! how to lay out the emitted modules, and the inference and declaration
//! options. It is usually loaded from a TOML file:
//!
//! ```toml
//! layout = "combined"
//! moduleName = "fixtures"
//!
//! [inference]
//! refineRequired = true
//! sampleSize = 0
//!
//! [[sources]]
//! path = "people.csv"
//! interfaceName = "Person"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::declare::DeclarationOptions;
use crate::inference::InferenceConfig;
use crate::source::{CsvSource, JsonSource, SourceDescriptor};
use crate::storage::EmitMode;

/// Errors loading or validating configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read {path}: {message}")]
    Io { path: PathBuf, message: String },

    #[error("Invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// How sources are grouped into modules
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    /// One module per source
    #[default]
    Separate,
    /// One module holding every source
    Combined,
}

/// Input format of a source file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceFormat {
    Csv,
    /// JSON array, single object, or newline-delimited objects
    Json,
}

impl SourceFormat {
    /// Guess the format from a file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "csv" => Some(SourceFormat::Csv),
            "json" | "ndjson" | "jsonl" => Some(SourceFormat::Json),
            _ => None,
        }
    }
}

/// One `[[sources]]` entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceSpec {
    pub path: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<SourceFormat>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interface_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constant_name: Option<String>,
    /// CSV field delimiter (ASCII), `,` when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delimiter: Option<char>,
}

impl SourceSpec {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            format: None,
            module_name: None,
            interface_name: None,
            constant_name: None,
            delimiter: None,
        }
    }

    /// File name the source is reported under
    pub fn identity(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    /// Explicit format, else the one implied by the file extension
    pub fn resolved_format(&self) -> Result<SourceFormat, ConfigError> {
        self.format
            .or_else(|| SourceFormat::from_path(&self.path))
            .ok_or_else(|| {
                ConfigError::Invalid(format!(
                    "cannot tell the format of {}; set `format`",
                    self.path.display()
                ))
            })
    }

    /// Build the descriptor this entry describes
    pub fn to_descriptor(&self) -> Result<SourceDescriptor, ConfigError> {
        let mut descriptor = match self.resolved_format()? {
            SourceFormat::Csv => {
                let mut source = CsvSource::from_path(&self.path);
                if let Some(delimiter) = self.delimiter {
                    if !delimiter.is_ascii() {
                        return Err(ConfigError::Invalid(format!(
                            "delimiter {:?} for {} is not ASCII",
                            delimiter,
                            self.path.display()
                        )));
                    }
                    source = source.with_delimiter(delimiter as u8);
                }
                SourceDescriptor::new(source)
            }
            SourceFormat::Json => SourceDescriptor::new(JsonSource::from_path(&self.path)),
        };

        if let Some(name) = &self.module_name {
            descriptor = descriptor.with_module_name(name);
        }
        if let Some(name) = &self.interface_name {
            descriptor = descriptor.with_interface_name(name);
        }
        if let Some(name) = &self.constant_name {
            descriptor = descriptor.with_constant_name(name);
        }
        Ok(descriptor)
    }
}

/// Configuration for one generation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TransformConfig {
    pub layout: Layout,
    /// Module name used by the combined layout
    pub module_name: String,
    /// Top-level interface of the combined layout; PascalCase of `module_name` when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interface_name: Option<String>,
    /// Top-level constant of the combined layout; camelCase of `module_name` when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub constant_name: Option<String>,
    /// Emit a single-row source as a bare object rather than a one-element array
    pub single_row_as_object: bool,
    pub emit_mode: EmitMode,
    pub inference: InferenceConfig,
    pub declarations: DeclarationOptions,
    pub sources: Vec<SourceSpec>,
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            layout: Layout::Separate,
            module_name: "content".to_string(),
            interface_name: None,
            constant_name: None,
            single_row_as_object: true,
            emit_mode: EmitMode::Replace,
            inference: InferenceConfig::default(),
            declarations: DeclarationOptions::default(),
            sources: Vec::new(),
        }
    }
}

impl TransformConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Load configuration from a TOML file.
    ///
    /// Relative source paths are taken relative to the file's directory.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let mut config = Self::from_toml_str(&text)?;
        if let Some(base) = path.parent() {
            for source in &mut config.sources {
                if source.path.is_relative() {
                    source.path = base.join(&source.path);
                }
            }
        }
        Ok(config)
    }

    pub fn with_layout(mut self, layout: Layout) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_module_name(mut self, name: impl Into<String>) -> Self {
        self.module_name = name.into();
        self
    }

    pub fn with_single_row_as_object(mut self, enabled: bool) -> Self {
        self.single_row_as_object = enabled;
        self
    }

    pub fn with_emit_mode(mut self, mode: EmitMode) -> Self {
        self.emit_mode = mode;
        self
    }

    pub fn with_inference(mut self, inference: InferenceConfig) -> Self {
        self.inference = inference;
        self
    }

    pub fn with_declarations(mut self, declarations: DeclarationOptions) -> Self {
        self.declarations = declarations;
        self
    }

    pub fn with_source(mut self, source: SourceSpec) -> Self {
        self.sources.push(source);
        self
    }

    /// Check the configuration can drive a run
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sources.is_empty() {
            return Err(ConfigError::Invalid("no sources configured".to_string()));
        }
        if self.layout == Layout::Combined && self.module_name.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "combined layout needs a module name".to_string(),
            ));
        }
        Ok(())
    }
}
