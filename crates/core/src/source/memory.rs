//! In-memory row source

use async_trait::async_trait;

use super::{Row, RowSource, Rows, SourceError, ValueEncoding};

/// Source over rows that are already in memory
#[derive(Debug, Clone)]
pub struct MemorySource {
    identity: String,
    encoding: ValueEncoding,
    rows: Vec<Row>,
}

impl MemorySource {
    pub fn new(identity: impl Into<String>, encoding: ValueEncoding, rows: Vec<Row>) -> Self {
        Self {
            identity: identity.into(),
            encoding,
            rows,
        }
    }

    /// Structured rows, as a parsed JSON document would produce
    pub fn structured(identity: impl Into<String>, rows: Vec<Row>) -> Self {
        Self::new(identity, ValueEncoding::Structured, rows)
    }
}

#[async_trait(?Send)]
impl RowSource for MemorySource {
    fn identity(&self) -> &str {
        &self.identity
    }

    fn encoding(&self) -> ValueEncoding {
        self.encoding
    }

    async fn open(&self) -> Result<Rows, SourceError> {
        Ok(Box::new(self.rows.clone().into_iter().map(Ok)))
    }
}
