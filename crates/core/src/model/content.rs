//! Coerced row content

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde_json::{Number, Value};

/// A timestamp that keeps the text it was parsed from
#[derive(Debug, Clone, PartialEq)]
pub struct DateTimeValue {
    /// Text exactly as it appeared in the source
    pub text: String,
    /// Parsed instant; naive values are taken as UTC
    pub instant: DateTime<Utc>,
}

/// One coerced field value
#[derive(Debug, Clone, PartialEq)]
pub enum ContentValue {
    Number(Number),
    Boolean(bool),
    DateTime(DateTimeValue),
    Text(String),
    /// Object or array of objects, kept as-is for structural serialization
    Structured(Value),
}

impl ContentValue {
    pub fn kind_label(&self) -> &'static str {
        match self {
            ContentValue::Number(_) => "number",
            ContentValue::Boolean(_) => "boolean",
            ContentValue::DateTime(_) => "date-time",
            ContentValue::Text(_) => "text",
            ContentValue::Structured(_) => "structured",
        }
    }
}

/// Source field name -> coerced value for one row
pub type ContentObject = IndexMap<String, ContentValue>;
