//! Model inference engine

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use super::config::InferenceConfig;
use super::formats::{detect_date_format, parse_boolean, parse_number};
use crate::model::{ContentModel, PropertyDefinition, PropertyKind, UnknownShape};
use crate::source::{Row, ValueEncoding};

/// Statistics about an inferred model
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InferenceStats {
    /// Rows consumed by inference
    pub rows_sampled: usize,
    /// Total fields in the model, nested fields included
    pub fields_discovered: usize,
    /// Fields left as `Unknown`
    pub unknown_fields: usize,
    /// Fields rendered with the optional marker
    pub optional_fields: usize,
    /// Deepest nested model
    pub max_depth: usize,
}

impl InferenceStats {
    /// Collect statistics for a model inferred from `rows_sampled` rows
    pub fn from_model(model: &ContentModel, rows_sampled: usize) -> Self {
        let mut stats = InferenceStats {
            rows_sampled,
            ..Default::default()
        };
        stats.walk(model, 0);
        stats
    }

    fn walk(&mut self, model: &ContentModel, depth: usize) {
        self.max_depth = self.max_depth.max(depth);
        for (_, definition) in model {
            self.fields_discovered += 1;
            if definition.kind.is_unknown() {
                self.unknown_fields += 1;
            }
            if !definition.value_required {
                self.optional_fields += 1;
            }
            if let Some(nested) = definition.kind.nested_model() {
                self.walk(nested, depth + 1);
            }
        }
    }
}

/// Model inference engine
///
/// Classifies each field of the sampled row(s) into a [`PropertyDefinition`].
/// Classification is a pure function of the sampled values and never fails:
/// anything indeterminate becomes `Unknown`.
#[derive(Debug, Clone)]
pub struct ModelInferrer {
    config: InferenceConfig,
    encoding: ValueEncoding,
}

impl ModelInferrer {
    /// Create an inferrer with default configuration
    pub fn new(encoding: ValueEncoding) -> Self {
        Self::with_config(InferenceConfig::default(), encoding)
    }

    /// Create an inferrer with custom configuration
    pub fn with_config(config: InferenceConfig, encoding: ValueEncoding) -> Self {
        Self { config, encoding }
    }

    pub fn config(&self) -> &InferenceConfig {
        &self.config
    }

    /// Infer a model from leading rows.
    ///
    /// The first row defines the model. Later rows, up to the configured sample
    /// size, are only consulted when `refine_required` is enabled.
    pub fn infer(&self, rows: &[Row]) -> ContentModel {
        let mut sampled = rows.iter().take(self.config.effective_sample_size());
        let Some(first) = sampled.next() else {
            return ContentModel::new();
        };

        let mut model = self.infer_object(first, 0);
        if self.config.refine_required {
            for (index, row) in sampled.enumerate() {
                self.refine(&mut model, row, 0);
                debug!(row = index + 1, fields = model.len(), "Refined model");
            }
        }
        model
    }

    /// Infer a model from a single row
    pub fn infer_row(&self, row: &Row) -> ContentModel {
        self.infer_object(row, 0)
    }

    /// Classify one top-level field value
    pub fn classify(&self, name: &str, value: &Value) -> PropertyDefinition {
        PropertyDefinition::new(self.classify_kind(value, 0), name)
    }

    fn infer_object(&self, fields: &Map<String, Value>, depth: usize) -> ContentModel {
        fields
            .iter()
            .map(|(name, value)| {
                let definition = PropertyDefinition::new(self.classify_kind(value, depth), name);
                (name.clone(), definition)
            })
            .collect()
    }

    fn classify_kind(&self, value: &Value, depth: usize) -> PropertyKind {
        match value {
            Value::Null => unknown(UnknownShape::Scalar),
            Value::Bool(_) => PropertyKind::Boolean,
            Value::Number(_) => PropertyKind::Numeric,
            Value::String(text) => self.classify_text(text),
            Value::Object(fields) => {
                if fields.is_empty() {
                    return unknown(UnknownShape::Object);
                }
                if depth >= self.config.max_depth {
                    debug!(depth, max = self.config.max_depth, "Object nested too deep");
                    return unknown(UnknownShape::Object);
                }
                PropertyKind::Object {
                    model: self.infer_object(fields, depth + 1),
                }
            }
            Value::Array(items) => match items.first() {
                Some(Value::Object(first))
                    if !first.is_empty() && depth < self.config.max_depth =>
                {
                    PropertyKind::ObjectArray {
                        model: self.infer_object(first, depth + 1),
                    }
                }
                _ => unknown(UnknownShape::Array),
            },
        }
    }

    fn classify_text(&self, text: &str) -> PropertyKind {
        let text = text.trim();
        if text.is_empty() {
            return unknown(UnknownShape::Scalar);
        }

        if self.encoding == ValueEncoding::Textual {
            if parse_number(text).is_some() {
                return PropertyKind::Numeric;
            }
            if parse_boolean(text).is_some() {
                return PropertyKind::Boolean;
            }
        }

        if self.config.detect_dates && detect_date_format(text).is_some() {
            return PropertyKind::DateTime;
        }

        PropertyKind::Text
    }

    /// Fold a later sampled row into the model
    fn refine(&self, model: &mut ContentModel, fields: &Map<String, Value>, depth: usize) {
        let names: Vec<String> = model.field_names().map(str::to_owned).collect();
        for name in names {
            let Some(definition) = model.get_mut(&name) else {
                continue;
            };

            let value = match fields.get(&name) {
                Some(value) if !is_empty_value(value) => value,
                _ => {
                    definition.value_required = false;
                    continue;
                }
            };

            if definition.kind.is_unknown() {
                // Typed late, so it stays optional
                let kind = self.classify_kind(value, depth);
                if !kind.is_unknown() {
                    definition.kind = kind;
                }
                continue;
            }

            match (&mut definition.kind, value) {
                (PropertyKind::Object { model: nested }, Value::Object(inner)) => {
                    self.refine(nested, inner, depth + 1);
                }
                (PropertyKind::ObjectArray { model: nested }, Value::Array(items)) => {
                    for item in items {
                        if let Value::Object(inner) = item {
                            self.refine(nested, inner, depth + 1);
                        }
                    }
                }
                _ => {}
            }
        }

        for (name, value) in fields {
            if model.get(name).is_none() {
                let definition =
                    PropertyDefinition::new(self.classify_kind(value, depth), name.as_str())
                        .with_required(false);
                model.insert(name.clone(), definition);
            }
        }
    }
}

fn unknown(shape: UnknownShape) -> PropertyKind {
    PropertyKind::Unknown { shape }
}

fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(text) => text.trim().is_empty(),
        _ => false,
    }
}
