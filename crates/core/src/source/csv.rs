//! CSV row source

use std::io::Cursor;
use std::path::PathBuf;

use ::csv::{ReaderBuilder, Trim};
use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use super::{Origin, Row, RowSource, Rows, SourceError, ValueEncoding};

/// CSV source with a header row
///
/// Cells are kept as text; the inferrer and transformer recognise numbers,
/// booleans and dates from that text.
#[derive(Debug, Clone)]
pub struct CsvSource {
    origin: Origin,
    delimiter: u8,
}

impl CsvSource {
    /// Read CSV from a file
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self {
            origin: Origin::file(path),
            delimiter: b',',
        }
    }

    /// Read CSV from in-memory text
    pub fn from_text(identity: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            origin: Origin::text(identity, text),
            delimiter: b',',
        }
    }

    /// Use a delimiter other than `,`
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }
}

fn csv_error(origin: &str, error: ::csv::Error) -> SourceError {
    SourceError::Csv {
        origin: origin.to_string(),
        message: error.to_string(),
    }
}

#[async_trait(?Send)]
impl RowSource for CsvSource {
    fn identity(&self) -> &str {
        self.origin.identity()
    }

    fn encoding(&self) -> ValueEncoding {
        ValueEncoding::Textual
    }

    async fn open(&self) -> Result<Rows, SourceError> {
        let text = self.origin.read_text().await?;
        let identity = self.identity().to_string();

        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .delimiter(self.delimiter)
            .trim(Trim::Headers)
            .from_reader(Cursor::new(text.into_bytes()));

        let headers = reader
            .headers()
            .map_err(|e| csv_error(&identity, e))?
            .clone();
        if headers.is_empty() {
            return Err(SourceError::InvalidStructure {
                origin: identity,
                message: "missing header row".to_string(),
            });
        }
        debug!(source = %identity, columns = headers.len(), "Opened CSV source");

        let rows = reader.into_records().map(move |record| {
            let record = record.map_err(|e| csv_error(&identity, e))?;
            Ok(headers
                .iter()
                .zip(record.iter())
                .map(|(name, cell)| (name.to_string(), Value::String(cell.to_string())))
                .collect::<Row>())
        });

        Ok(Box::new(rows))
    }
}
