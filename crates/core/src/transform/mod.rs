//! Content transformer
//!
//! Applies a [`ContentModel`] to raw rows. Every field is coerced to the kind
//! the model recorded for it; a value that does not fit is left out of that
//! row's [`ContentObject`] and reported as a [`Diagnostic::Coercion`]. The row
//! itself is always returned.

use serde_json::Value;
use tracing::debug;

use crate::diagnostics::{Diagnostic, ErrorHandler};
use crate::inference::{parse_boolean, parse_date, parse_number};
use crate::model::{ContentModel, ContentObject, ContentValue, DateTimeValue, PropertyKind};
use crate::source::{Row, ValueEncoding, value_type_name};

/// Why a value could not be coerced
#[derive(Debug, Clone, PartialEq)]
pub struct CoercionFailure {
    /// Short rendering of the offending value
    pub found: String,
}

/// Coerces raw rows of one source into content objects
#[derive(Debug, Clone)]
pub struct ContentTransformer {
    identity: String,
    encoding: ValueEncoding,
}

impl ContentTransformer {
    /// `identity` names the source in diagnostics
    pub fn new(identity: impl Into<String>, encoding: ValueEncoding) -> Self {
        Self {
            identity: identity.into(),
            encoding,
        }
    }

    pub fn identity(&self) -> &str {
        &self.identity
    }

    /// Coerce one row. Fields missing from the model are ignored; `index` is
    /// only used in diagnostics.
    pub fn transform_row(
        &self,
        model: &ContentModel,
        row: &Row,
        index: usize,
        handler: &mut dyn ErrorHandler,
    ) -> ContentObject {
        let mut content = ContentObject::with_capacity(model.len());

        for (name, definition) in model {
            let Some(value) = row.get(name) else {
                continue;
            };
            match coerce(&definition.kind, value, self.encoding) {
                Ok(Some(coerced)) => {
                    content.insert(name.clone(), coerced);
                }
                Ok(None) => {}
                Err(failure) => handler.report(Diagnostic::Coercion {
                    origin: self.identity.clone(),
                    row: index,
                    field: name.clone(),
                    expected: definition.kind.label().to_string(),
                    found: failure.found,
                }),
            }
        }

        debug!(source = %self.identity, row = index, fields = content.len(), "Transformed row");
        content
    }
}

/// Coerce one raw value to `kind`.
///
/// `Ok(None)` means there is no value to carry: the kind is `Unknown`, or the
/// value is null or (for non-text kinds) empty text.
pub fn coerce(
    kind: &PropertyKind,
    value: &Value,
    encoding: ValueEncoding,
) -> Result<Option<ContentValue>, CoercionFailure> {
    if kind.is_unknown() || value.is_null() {
        return Ok(None);
    }
    if let Value::String(text) = value
        && text.trim().is_empty()
        && !matches!(kind, PropertyKind::Text)
    {
        return Ok(None);
    }

    let coerced = match (kind, value) {
        (PropertyKind::Numeric, Value::Number(number)) => Some(ContentValue::Number(number.clone())),
        (PropertyKind::Numeric, Value::String(text)) => parse_number(text).map(ContentValue::Number),

        (PropertyKind::Boolean, Value::Bool(flag)) => Some(ContentValue::Boolean(*flag)),
        (PropertyKind::Boolean, Value::String(text)) => {
            parse_boolean(text).map(ContentValue::Boolean)
        }

        (PropertyKind::DateTime, Value::String(text)) => {
            parse_date(text).map(|instant| {
                ContentValue::DateTime(DateTimeValue {
                    text: text.trim().to_string(),
                    instant,
                })
            })
        }

        (PropertyKind::Text, Value::String(text)) => Some(ContentValue::Text(text.clone())),
        (PropertyKind::Text, Value::Number(number)) => Some(ContentValue::Text(number.to_string())),
        (PropertyKind::Text, Value::Bool(flag)) => Some(ContentValue::Text(flag.to_string())),

        (PropertyKind::Object { .. }, Value::Object(_)) => {
            Some(ContentValue::Structured(value.clone()))
        }
        (PropertyKind::ObjectArray { .. }, Value::Array(items))
            if items.iter().all(Value::is_object) =>
        {
            Some(ContentValue::Structured(value.clone()))
        }

        _ => None,
    };

    match coerced {
        Some(coerced) => Ok(Some(coerced)),
        None => {
            // Textual encodings only ever carry strings, so echo the text
            let found = match (encoding, value) {
                (_, Value::String(text)) => format!("{:?}", text),
                (ValueEncoding::Structured, Value::Number(_) | Value::Bool(_)) => {
                    value.to_string()
                }
                _ => value_type_name(value).to_string(),
            };
            Err(CoercionFailure { found })
        }
    }
}
