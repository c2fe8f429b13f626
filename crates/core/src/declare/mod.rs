//! TypeScript declaration compiler
//!
//! Renders a [`ContentModel`] as interface members and a [`ContentObject`] as
//! an object literal. Both walks dispatch on [`PropertyKind`] and never fail:
//! problems are reported to the [`ErrorHandler`] and the affected field is
//! degraded (interface) or left out (literal).
//!
//! ```text
//! readonly id: number; // id
//! readonly nickname?: unknown; // nickname
//! readonly address: {
//!   readonly city: string; // city
//! }; // address
//! ```

mod literal;

pub use literal::{quote_string, to_literal};

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::diagnostics::{Diagnostic, ErrorHandler};
use crate::inflect;
use crate::model::{
    ContentModel, ContentObject, ContentValue, PropertyDefinition, PropertyKind, UnknownShape,
};

/// Rendering options for declarations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeclarationOptions {
    /// Prefix members with `readonly`
    pub readonly: bool,
    /// One level of indentation
    pub indent: String,
    /// Deepest nested member block rendered before degrading to `object`
    pub max_depth: usize,
}

impl Default for DeclarationOptions {
    fn default() -> Self {
        Self {
            readonly: true,
            indent: "  ".to_string(),
            max_depth: 10,
        }
    }
}

impl DeclarationOptions {
    pub fn with_readonly(mut self, readonly: bool) -> Self {
        self.readonly = readonly;
        self
    }

    pub fn with_indent(mut self, indent: impl Into<String>) -> Self {
        self.indent = indent.into();
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

/// Position of the compiler within a nested model
#[derive(Debug, Clone, Copy)]
pub struct CompileContext<'a> {
    options: &'a DeclarationOptions,
    /// Nesting level of the members being rendered; top-level members are 1
    level: usize,
}

impl<'a> CompileContext<'a> {
    pub fn new(options: &'a DeclarationOptions) -> Self {
        Self { options, level: 1 }
    }

    pub fn options(&self) -> &DeclarationOptions {
        self.options
    }

    pub fn level(&self) -> usize {
        self.level
    }

    fn nested(&self) -> Self {
        Self {
            options: self.options,
            level: self.level + 1,
        }
    }

    fn indent(&self, level: usize) -> String {
        self.options.indent.repeat(level)
    }
}

/// TypeScript property name for a source field name.
///
/// Field names are camelCased; anything that is still not a valid identifier
/// is kept verbatim as a quoted property name.
pub fn property_identifier(name: &str) -> String {
    let (key, quoted) = property_key(name);
    if quoted { quote_string(&key) } else { key }
}

/// Unquoted property key and whether it needs quoting
fn property_key(name: &str) -> (String, bool) {
    let inflected = inflect::camel_case(name);
    if inflect::is_valid_identifier(&inflected) {
        (inflected, false)
    } else {
        (name.to_string(), true)
    }
}

/// Property names for a set of sibling field names, in order.
///
/// Like [`property_identifier`], but a name that would repeat an earlier
/// sibling's property gets a numeric suffix (`firstName`, `firstName2`).
pub fn unique_identifiers<'a>(names: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut used = HashSet::new();
    names
        .into_iter()
        .map(|name| {
            let (base, quoted) = property_key(name);
            let mut key = base.clone();
            let mut index = 2;
            while !used.insert(key.clone()) {
                key = format!("{}{}", base, index);
                index += 1;
            }
            if quoted { quote_string(&key) } else { key }
        })
        .collect()
}

/// Property names for every field of `model`, in model order
pub fn model_identifiers(model: &ContentModel) -> Vec<String> {
    unique_identifiers(model.field_names())
}

/// Source text such as a CSV header, flattened for a `//` comment
fn comment_text(text: &str) -> String {
    text.replace("\r\n", " ")
        .replace(['\r', '\n', '\u{2028}', '\u{2029}'], " ")
}

/// Render every member of `model`, one entry per field, in model order.
///
/// Entries carry no leading indentation on their first line; nested blocks
/// are indented for `ctx.level()`.
pub fn interface_members(
    model: &ContentModel,
    ctx: &CompileContext<'_>,
    handler: &mut dyn ErrorHandler,
) -> Vec<String> {
    model
        .iter()
        .zip(model_identifiers(model))
        .map(|((name, definition), identifier)| {
            interface_member(&identifier, name, definition, ctx, handler)
        })
        .collect()
}

/// Render one interface member
pub fn property_interface_decl(
    name: &str,
    definition: &PropertyDefinition,
    ctx: &CompileContext<'_>,
    handler: &mut dyn ErrorHandler,
) -> String {
    interface_member(&property_identifier(name), name, definition, ctx, handler)
}

fn interface_member(
    identifier: &str,
    name: &str,
    definition: &PropertyDefinition,
    ctx: &CompileContext<'_>,
    handler: &mut dyn ErrorHandler,
) -> String {
    let type_text = match &definition.kind {
        PropertyKind::Unknown { shape } => match shape {
            UnknownShape::Scalar => "unknown".to_string(),
            UnknownShape::Array => "unknown[]".to_string(),
            UnknownShape::Object => "object".to_string(),
        },
        PropertyKind::Numeric => "number".to_string(),
        PropertyKind::Boolean => "boolean".to_string(),
        PropertyKind::DateTime => "Date".to_string(),
        PropertyKind::Text => "string".to_string(),
        PropertyKind::Object { model } => nested_type(name, model, "", ctx, handler),
        PropertyKind::ObjectArray { model } => nested_type(name, model, "[]", ctx, handler),
    };

    format!(
        "{}{}{}: {}; // {}",
        if ctx.options.readonly { "readonly " } else { "" },
        identifier,
        if definition.value_required { "" } else { "?" },
        type_text,
        comment_text(&definition.description)
    )
}

fn nested_type(
    name: &str,
    model: &ContentModel,
    suffix: &str,
    ctx: &CompileContext<'_>,
    handler: &mut dyn ErrorHandler,
) -> String {
    let gap = if ctx.level >= ctx.options.max_depth {
        Some(format!("nested deeper than {} levels", ctx.options.max_depth))
    } else if model.is_empty() {
        Some("nested model has no fields".to_string())
    } else {
        None
    };
    if let Some(reason) = gap {
        debug!(field = name, %reason, "Degrading nested member");
        handler.report(Diagnostic::DeclarationGap {
            field: name.to_string(),
            reason,
        });
        return format!("object{}", suffix);
    }

    let inner = ctx.nested();
    let member_indent = inner.indent(inner.level);
    let mut text = String::from("{\n");
    for member in interface_members(model, &inner, handler) {
        text.push_str(&member_indent);
        text.push_str(&member);
        text.push('\n');
    }
    text.push_str(&ctx.indent(ctx.level));
    text.push('}');
    text.push_str(suffix);
    text
}

/// Render one literal field as `<identifier>: <literal>`.
///
/// Returns `None` when the field has no value in `content`, is `Unknown`, or
/// holds a value that does not fit its kind (reported as
/// [`Diagnostic::ContentOmitted`]).
pub fn property_content_decl(
    name: &str,
    definition: &PropertyDefinition,
    content: &ContentObject,
    handler: &mut dyn ErrorHandler,
) -> Option<String> {
    content_entry(&property_identifier(name), name, definition, content, handler)
}

fn content_entry(
    identifier: &str,
    name: &str,
    definition: &PropertyDefinition,
    content: &ContentObject,
    handler: &mut dyn ErrorHandler,
) -> Option<String> {
    if definition.kind.is_unknown() {
        return None;
    }
    let value = content.get(name)?;

    let literal = match (&definition.kind, value) {
        (PropertyKind::Numeric, ContentValue::Number(number)) => number.to_string(),
        (PropertyKind::Boolean, ContentValue::Boolean(flag)) => flag.to_string(),
        (PropertyKind::DateTime, ContentValue::DateTime(date)) => literal::date_literal(&date.text),
        (PropertyKind::Text, ContentValue::Text(text)) => quote_string(text),
        (
            kind @ (PropertyKind::Object { .. } | PropertyKind::ObjectArray { .. }),
            ContentValue::Structured(structured),
        ) => literal::structured_literal(structured, kind, name, handler),
        (kind, other) => {
            handler.report(Diagnostic::ContentOmitted {
                field: name.to_string(),
                reason: format!("{} value for {} property", other.kind_label(), kind.label()),
            });
            return None;
        }
    };

    Some(format!("{}: {}", identifier, literal))
}

/// Render one content object as a single-line literal, fields in model order
pub fn content_literal(
    model: &ContentModel,
    content: &ContentObject,
    handler: &mut dyn ErrorHandler,
) -> String {
    literal::object_literal(
        model
            .iter()
            .zip(model_identifiers(model))
            .filter_map(|((name, definition), identifier)| {
                content_entry(&identifier, name, definition, content, handler)
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::CollectingErrorHandler;
    use crate::inference::ModelInferrer;
    use crate::model::DateTimeValue;
    use crate::source::{Row, ValueEncoding};
    use crate::transform::ContentTransformer;
    use serde_json::{Value, json};

    fn row(value: Value) -> Row {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    fn compile(value: Value) -> (Vec<String>, String, CollectingErrorHandler) {
        let first = row(value);
        let model = ModelInferrer::new(ValueEncoding::Structured).infer(std::slice::from_ref(&first));
        let options = DeclarationOptions::default();
        let ctx = CompileContext::new(&options);
        let mut handler = CollectingErrorHandler::new();
        let content = ContentTransformer::new("test.json", ValueEncoding::Structured)
            .transform_row(&model, &first, 0, &mut handler);
        let members = interface_members(&model, &ctx, &mut handler);
        let literal = content_literal(&model, &content, &mut handler);
        (members, literal, handler)
    }

    #[test]
    fn test_scalar_members() {
        let (members, literal, handler) = compile(json!({"id": 1, "active": true}));
        assert_eq!(
            members,
            vec!["readonly id: number; // id", "readonly active: boolean; // active"]
        );
        assert_eq!(literal, "{ id: 1, active: true }");
        assert!(handler.is_empty());
    }

    #[test]
    fn test_unknown_members_have_no_literal() {
        let (members, literal, _) = compile(json!({
            "name": "Ada",
            "nickname": null,
            "tags": [],
            "extra": {},
        }));
        assert_eq!(
            members,
            vec![
                "readonly name: string; // name",
                "readonly nickname?: unknown; // nickname",
                "readonly tags?: unknown[]; // tags",
                "readonly extra?: object; // extra",
            ]
        );
        assert_eq!(literal, "{ name: \"Ada\" }");
    }

    #[test]
    fn test_date_and_text_literals() {
        let (members, literal, _) = compile(json!({
            "created at": "2024-01-15T10:30:00Z",
            "quote": "She said \"hi\"",
        }));
        assert_eq!(members[0], "readonly createdAt: Date; // created at");
        assert_eq!(
            literal,
            "{ createdAt: new Date(\"2024-01-15T10:30:00Z\"), quote: \"She said \\\"hi\\\"\" }"
        );
    }

    #[test]
    fn test_nested_members() {
        let (members, literal, _) = compile(json!({
            "address": {"city": "Oslo", "zip": "0150"},
            "lines": [{"sku": "A-1", "qty": 2}],
        }));
        assert_eq!(
            members[0],
            "readonly address: {\n    readonly city: string; // city\n    readonly zip: string; // zip\n  }; // address"
        );
        assert_eq!(
            members[1],
            "readonly lines: {\n    readonly sku: string; // sku\n    readonly qty: number; // qty\n  }[]; // lines"
        );
        assert_eq!(
            literal,
            "{ address: { city: \"Oslo\", zip: \"0150\" }, lines: [{ sku: \"A-1\", qty: 2 }] }"
        );
    }

    #[test]
    fn test_colliding_field_names_get_suffixes() {
        let (members, literal, _) = compile(json!({
            "first_name": "a",
            "firstName": "b",
            "first name": "c",
        }));
        assert_eq!(
            members,
            vec![
                "readonly firstName: string; // first_name",
                "readonly firstName2: string; // firstName",
                "readonly firstName3: string; // first name",
            ]
        );
        assert_eq!(literal, "{ firstName: \"a\", firstName2: \"b\", firstName3: \"c\" }");
    }

    #[test]
    fn test_nested_collisions_match_between_interface_and_literal() {
        let (members, literal, _) = compile(json!({
            "owner": {"e_mail": "x@y.z", "eMail": "y@z.x"},
        }));
        assert_eq!(
            members[0],
            "readonly owner: {\n    readonly eMail: string; // e_mail\n    readonly eMail2: string; // eMail\n  }; // owner"
        );
        assert_eq!(literal, "{ owner: { eMail: \"x@y.z\", eMail2: \"y@z.x\" } }");
    }

    #[test]
    fn test_quoted_names_stay_unique() {
        assert_eq!(
            unique_identifiers(["2fa", "2fa ", "id"]),
            vec!["\"2fa\"", "\"2fa \"", "id"]
        );
        assert_eq!(unique_identifiers(["2fa", "2fa"]), vec!["\"2fa\"", "\"2fa2\""]);
    }

    #[test]
    fn test_line_breaks_in_names_stay_in_comment() {
        let (members, _, _) = compile(json!({
            "id\nx = 1": 1,
            "a\r\nb\u{2028}c": "t",
        }));
        assert_eq!(members[0], "readonly idX1: number; // id x = 1");
        assert_eq!(members[1], "readonly aBC: string; // a b c");
        assert!(members.iter().all(|member| !member.contains('\n')));
    }

    #[test]
    fn test_depth_gap_degrades_to_object() {
        let first = row(json!({"a": {"b": {"c": 1}}}));
        let model = ModelInferrer::new(ValueEncoding::Structured).infer(&[first]);
        let options = DeclarationOptions::default().with_max_depth(2);
        let ctx = CompileContext::new(&options);
        let mut handler = CollectingErrorHandler::new();

        let members = interface_members(&model, &ctx, &mut handler);
        assert_eq!(
            members[0],
            "readonly a: {\n    readonly b: object; // b\n  }; // a"
        );
        assert_eq!(
            handler.diagnostics(),
            &[Diagnostic::DeclarationGap {
                field: "b".to_string(),
                reason: "nested deeper than 2 levels".to_string(),
            }]
        );
    }

    #[test]
    fn test_optional_marker_and_mutable_members() {
        let definition =
            PropertyDefinition::new(PropertyKind::Text, "Full Name").with_required(false);
        let options = DeclarationOptions::default().with_readonly(false);
        let ctx = CompileContext::new(&options);
        let mut handler = CollectingErrorHandler::new();
        assert_eq!(
            property_interface_decl("Full Name", &definition, &ctx, &mut handler),
            "fullName?: string; // Full Name"
        );
    }

    #[test]
    fn test_invalid_identifier_is_quoted() {
        let (members, literal, _) = compile(json!({"2fa": true}));
        assert_eq!(members[0], "readonly \"2fa\": boolean; // 2fa");
        assert_eq!(literal, "{ \"2fa\": true }");
    }

    #[test]
    fn test_mismatched_content_is_omitted() {
        let definition = PropertyDefinition::new(PropertyKind::Numeric, "n");
        let mut content = ContentObject::new();
        content.insert(
            "n".to_string(),
            ContentValue::DateTime(DateTimeValue {
                text: "2024-01-01".to_string(),
                instant: chrono::DateTime::<chrono::Utc>::default(),
            }),
        );
        let mut handler = CollectingErrorHandler::new();
        assert_eq!(property_content_decl("n", &definition, &content, &mut handler), None);
        assert_eq!(handler.diagnostics().len(), 1);
    }

    #[test]
    fn test_empty_content() {
        let model = ContentModel::new();
        let mut handler = CollectingErrorHandler::new();
        assert_eq!(content_literal(&model, &ContentObject::new(), &mut handler), "{}");
    }
}
