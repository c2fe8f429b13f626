//! Content model types
//!
//! A [`ContentModel`] is the inferred schema of one source: an ordered mapping
//! from source field name to [`PropertyDefinition`]. Insertion order is the
//! order fields were first seen and drives declaration order downstream.
//!
//! A [`ContentObject`] is one coerced row, produced by the transformer and
//! consumed only when rendering literals.

mod content;
mod property;

pub use content::{ContentObject, ContentValue, DateTimeValue};
pub use property::{PropertyDefinition, PropertyKind, UnknownShape};

use indexmap::IndexMap;
use indexmap::map::Iter;
use serde::{Deserialize, Serialize};

/// Inferred schema: field name -> property definition, in first-seen order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentModel {
    properties: IndexMap<String, PropertyDefinition>,
}

impl ContentModel {
    /// Create an empty model
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a property, keeping the position of an existing entry with the same name
    pub fn insert(&mut self, name: impl Into<String>, definition: PropertyDefinition) {
        self.properties.insert(name.into(), definition);
    }

    /// Look up a property by source field name
    pub fn get(&self, name: &str) -> Option<&PropertyDefinition> {
        self.properties.get(name)
    }

    pub(crate) fn get_mut(&mut self, name: &str) -> Option<&mut PropertyDefinition> {
        self.properties.get_mut(name)
    }

    /// Iterate properties in declaration order
    /// Position of a property in model order
    pub fn position(&self, name: &str) -> Option<usize> {
        self.properties.get_index_of(name)
    }

    pub fn iter(&self) -> Iter<'_, String, PropertyDefinition> {
        self.properties.iter()
    }

    /// Source field names in declaration order
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.properties.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Number of properties that are not `Unknown`, counted recursively
    pub fn typed_field_count(&self) -> usize {
        self.properties
            .values()
            .map(|definition| match &definition.kind {
                PropertyKind::Unknown { .. } => 0,
                PropertyKind::Object { model } | PropertyKind::ObjectArray { model } => {
                    1 + model.typed_field_count()
                }
                _ => 1,
            })
            .sum()
    }
}

impl<'a> IntoIterator for &'a ContentModel {
    type Item = (&'a String, &'a PropertyDefinition);
    type IntoIter = Iter<'a, String, PropertyDefinition>;

    fn into_iter(self) -> Self::IntoIter {
        self.properties.iter()
    }
}

impl<K: Into<String>> FromIterator<(K, PropertyDefinition)> for ContentModel {
    fn from_iter<T: IntoIterator<Item = (K, PropertyDefinition)>>(iter: T) -> Self {
        let mut model = ContentModel::new();
        for (name, definition) in iter {
            model.insert(name, definition);
        }
        model
    }
}
