//! Property definitions

use serde::{Deserialize, Serialize};

use super::ContentModel;

/// Raw shape recorded for a field whose kind could not be inferred
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UnknownShape {
    /// Null, empty text, or any other indeterminate scalar
    Scalar,
    /// Empty array, or an array whose first element is not an object
    Array,
    /// Empty object, or an object nested deeper than the configured limit
    Object,
}

/// Value kind of one field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum PropertyKind {
    Unknown { shape: UnknownShape },
    Numeric,
    Boolean,
    DateTime,
    Text,
    /// Nested object with its own model
    Object { model: ContentModel },
    /// Array of objects, modelled from its first element
    ObjectArray { model: ContentModel },
}

impl PropertyKind {
    /// Short label used in diagnostics and CLI output
    pub fn label(&self) -> &'static str {
        match self {
            PropertyKind::Unknown { .. } => "unknown",
            PropertyKind::Numeric => "numeric",
            PropertyKind::Boolean => "boolean",
            PropertyKind::DateTime => "date-time",
            PropertyKind::Text => "text",
            PropertyKind::Object { .. } => "object",
            PropertyKind::ObjectArray { .. } => "object array",
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, PropertyKind::Unknown { .. })
    }

    /// Nested model for `Object` and `ObjectArray`
    pub fn nested_model(&self) -> Option<&ContentModel> {
        match self {
            PropertyKind::Object { model } | PropertyKind::ObjectArray { model } => Some(model),
            _ => None,
        }
    }
}

/// Typed description of one field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDefinition {
    #[serde(flatten)]
    pub kind: PropertyKind,
    pub description: String,
    pub value_required: bool,
}

impl PropertyDefinition {
    /// Create a definition; `Unknown` kinds are never required
    pub fn new(kind: PropertyKind, description: impl Into<String>) -> Self {
        let value_required = !kind.is_unknown();
        Self {
            kind,
            description: description.into(),
            value_required,
        }
    }

    /// Override required-ness. Ignored for `Unknown` kinds.
    pub fn with_required(mut self, required: bool) -> Self {
        self.value_required = required && !self.kind.is_unknown();
        self
    }
}
