//! JSON row source

use std::path::PathBuf;

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use super::{Origin, RowSource, Rows, SourceError, ValueEncoding, value_type_name};

/// JSON source
///
/// Accepts a top-level array of objects, a single object (one row), or a
/// stream of whitespace/newline separated objects (NDJSON).
#[derive(Debug, Clone)]
pub struct JsonSource {
    origin: Origin,
}

impl JsonSource {
    /// Read JSON from a file
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self {
            origin: Origin::file(path),
        }
    }

    /// Read JSON from in-memory text
    pub fn from_text(identity: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            origin: Origin::text(identity, text),
        }
    }
}

fn json_error(origin: &str, error: serde_json::Error) -> SourceError {
    SourceError::Json {
        origin: origin.to_string(),
        message: error.to_string(),
    }
}

#[async_trait(?Send)]
impl RowSource for JsonSource {
    fn identity(&self) -> &str {
        self.origin.identity()
    }

    fn encoding(&self) -> ValueEncoding {
        ValueEncoding::Structured
    }

    async fn open(&self) -> Result<Rows, SourceError> {
        let text = self.origin.read_text().await?;
        let identity = self.identity().to_string();
        let body = text.trim_start();

        let values = if body.starts_with('[') {
            match serde_json::from_str::<Value>(body).map_err(|e| json_error(&identity, e))? {
                Value::Array(items) => items,
                other => {
                    return Err(SourceError::InvalidStructure {
                        origin: identity,
                        message: format!("expected array, found {}", value_type_name(&other)),
                    });
                }
            }
        } else {
            serde_json::Deserializer::from_str(body)
                .into_iter::<Value>()
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| json_error(&identity, e))?
        };
        debug!(source = %identity, rows = values.len(), "Opened JSON source");

        let rows = values
            .into_iter()
            .enumerate()
            .map(move |(index, value)| match value {
                Value::Object(fields) => Ok(fields),
                other => Err(SourceError::InvalidStructure {
                    origin: identity.clone(),
                    message: format!(
                        "row {} is {}, expected an object",
                        index,
                        value_type_name(&other)
                    ),
                }),
            });

        Ok(Box::new(rows))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::Row;

    async fn collect(source: &JsonSource) -> Result<Vec<Row>, SourceError> {
        source.open().await?.collect()
    }

    #[tokio::test]
    async fn test_array_of_objects() {
        let source = JsonSource::from_text("a.json", r#"[{"id": 1}, {"id": 2}]"#);
        let rows = collect(&source).await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1]["id"], Value::from(2));
        assert_eq!(source.encoding(), ValueEncoding::Structured);
    }

    #[tokio::test]
    async fn test_single_object() {
        let source = JsonSource::from_text("one.json", r#"{"b": true, "a": null}"#);
        let rows = collect(&source).await.unwrap();
        assert_eq!(rows.len(), 1);
        let keys: Vec<&String> = rows[0].keys().collect();
        assert_eq!(keys, vec!["b", "a"]);
    }

    #[tokio::test]
    async fn test_ndjson() {
        let source = JsonSource::from_text("log.ndjson", "{\"n\": 1}\n{\"n\": 2}\n{\"n\": 3}\n");
        assert_eq!(collect(&source).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_non_object_row() {
        let source = JsonSource::from_text("mixed.json", r#"[{"a": 1}, 5]"#);
        let result = collect(&source).await;
        assert!(matches!(result, Err(SourceError::InvalidStructure { .. })));
    }

    #[tokio::test]
    async fn test_corrupt_json() {
        let source = JsonSource::from_text("broken.json", r#"[{"a": 1"#);
        let result = source.open().await;
        assert!(matches!(result, Err(SourceError::Json { .. })));
    }
}
