//! Row sources
//!
//! A [`RowSource`] yields a lazy, finite, non-restartable sequence of rows
//! (field name -> raw value). Sources fail as a whole with a [`SourceError`]
//! when the origin is missing or corrupt.
//!
//! - [`CsvSource`]: header row + records, every cell kept as text
//! - [`JsonSource`]: array of objects, a single object, or NDJSON
//! - [`MemorySource`]: pre-built rows

mod csv;
mod descriptor;
mod json;
mod memory;

pub use self::csv::CsvSource;
pub use descriptor::SourceDescriptor;
pub use json::JsonSource;
pub use memory::MemorySource;

use std::path::PathBuf;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// One raw row; key order is the source's column/key order
pub type Row = serde_json::Map<String, Value>;

/// Lazy row sequence returned by [`RowSource::open`]
pub type Rows = Box<dyn Iterator<Item = Result<Row, SourceError>>>;

/// How scalar values are carried by a source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ValueEncoding {
    /// Every scalar arrives as text (CSV)
    Textual,
    /// Scalars keep their native JSON type
    Structured,
}

/// Error type for reading a source
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SourceError {
    #[error("Source not found: {0}")]
    NotFound(String),
    #[error("IO error reading {origin}: {message}")]
    Io { origin: String, message: String },
    #[error("CSV error in {origin}: {message}")]
    Csv { origin: String, message: String },
    #[error("JSON error in {origin}: {message}")]
    Json { origin: String, message: String },
    #[error("Invalid structure in {origin}: {message}")]
    InvalidStructure { origin: String, message: String },
}

/// Trait for row sources
#[async_trait(?Send)]
pub trait RowSource {
    /// Identity of the origin, usually the file name
    fn identity(&self) -> &str;

    /// How scalar values are carried
    fn encoding(&self) -> ValueEncoding;

    /// Read the origin and return its rows
    async fn open(&self) -> Result<Rows, SourceError>;
}

/// Where a text-based source reads from
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Origin {
    File { path: PathBuf, identity: String },
    Text { identity: String, text: String },
}

impl Origin {
    pub(crate) fn file(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let identity = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Origin::File { path, identity }
    }

    pub(crate) fn text(identity: impl Into<String>, text: impl Into<String>) -> Self {
        Origin::Text {
            identity: identity.into(),
            text: text.into(),
        }
    }

    pub(crate) fn identity(&self) -> &str {
        match self {
            Origin::File { identity, .. } | Origin::Text { identity, .. } => identity,
        }
    }

    pub(crate) async fn read_text(&self) -> Result<String, SourceError> {
        let text = match self {
            Origin::Text { text, .. } => text.clone(),
            Origin::File { path, .. } => tokio::fs::read_to_string(path).await.map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    SourceError::NotFound(path.display().to_string())
                } else {
                    SourceError::Io {
                        origin: path.display().to_string(),
                        message: e.to_string(),
                    }
                }
            })?,
        };

        Ok(match text.strip_prefix('\u{feff}') {
            Some(stripped) => stripped.to_string(),
            None => text,
        })
    }
}

pub(crate) fn value_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_identity_is_file_name() {
        let origin = Origin::file("fixtures/people.csv");
        assert_eq!(origin.identity(), "people.csv");
    }

    #[tokio::test]
    async fn test_missing_file() {
        let origin = Origin::file("/definitely/not/here.csv");
        let result = origin.read_text().await;
        assert!(matches!(result, Err(SourceError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_bom_stripped() {
        let origin = Origin::text("bom.csv", "\u{feff}id\n1\n");
        assert_eq!(origin.read_text().await.unwrap(), "id\n1\n");
    }
}
