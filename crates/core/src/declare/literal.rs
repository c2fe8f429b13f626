//! TypeScript literal serialization

use serde_json::Value;

use crate::diagnostics::{Diagnostic, ErrorHandler};
use crate::inference::parse_date;
use crate::model::{ContentModel, PropertyKind};

use super::{model_identifiers, unique_identifiers};

/// Quote text as a TypeScript string literal
pub fn quote_string(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for ch in text.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            ch if ch.is_control() => out.push_str(&format!("\\u{:04x}", ch as u32)),
            ch => out.push(ch),
        }
    }
    out.push('"');
    out
}

/// Serialize any JSON value as a single-line TypeScript literal.
///
/// Object keys are inflected like interface members and null-valued keys are
/// dropped.
pub fn to_literal(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(flag) => flag.to_string(),
        Value::Number(number) => number.to_string(),
        Value::String(text) => quote_string(text),
        Value::Array(items) => array_literal(items.iter().map(to_literal).collect()),
        Value::Object(fields) => {
            let fields: Vec<_> = fields.iter().filter(|(_, value)| !value.is_null()).collect();
            let keys = unique_identifiers(fields.iter().map(|(key, _)| key.as_str()));
            object_literal(
                fields
                    .iter()
                    .zip(keys)
                    .map(|((_, value), key)| format!("{}: {}", key, to_literal(value)))
                    .collect(),
            )
        }
    }
}

pub(crate) fn object_literal(entries: Vec<String>) -> String {
    if entries.is_empty() {
        "{}".to_string()
    } else {
        format!("{{ {} }}", entries.join(", "))
    }
}

fn array_literal(items: Vec<String>) -> String {
    format!("[{}]", items.join(", "))
}

/// Serialize a nested value against the model of the interface it must satisfy.
///
/// Keys the model does not declare are left out with a diagnostic, and text
/// under a date-time property becomes a `Date`. Everything else goes through
/// [`to_literal`].
pub(crate) fn structured_literal(
    value: &Value,
    kind: &PropertyKind,
    path: &str,
    handler: &mut dyn ErrorHandler,
) -> String {
    match (kind, value) {
        (PropertyKind::Object { model }, Value::Object(fields)) => {
            modelled_object(fields, model, path, handler)
        }
        (PropertyKind::ObjectArray { model }, Value::Array(items)) => array_literal(
            items
                .iter()
                .map(|item| match item {
                    Value::Object(fields) => modelled_object(fields, model, path, handler),
                    other => to_literal(other),
                })
                .collect(),
        ),
        (PropertyKind::DateTime, Value::String(text)) if parse_date(text).is_some() => {
            date_literal(text.trim())
        }
        _ => to_literal(value),
    }
}

fn modelled_object(
    fields: &serde_json::Map<String, Value>,
    model: &ContentModel,
    path: &str,
    handler: &mut dyn ErrorHandler,
) -> String {
    let identifiers = model_identifiers(model);
    let mut entries = Vec::with_capacity(fields.len());
    for (key, value) in fields {
        if value.is_null() {
            continue;
        }
        let (Some(position), Some(definition)) = (model.position(key), model.get(key)) else {
            handler.report(Diagnostic::ContentOmitted {
                field: format!("{}.{}", path, key),
                reason: "not declared by the nested interface".to_string(),
            });
            continue;
        };
        let nested_path = format!("{}.{}", path, key);
        entries.push(format!(
            "{}: {}",
            identifiers[position],
            structured_literal(value, &definition.kind, &nested_path, handler)
        ));
    }
    object_literal(entries)
}

pub(crate) fn date_literal(text: &str) -> String {
    format!("new Date({})", quote_string(text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::CollectingErrorHandler;
    use crate::inference::ModelInferrer;
    use crate::source::ValueEncoding;
    use serde_json::json;

    #[test]
    fn test_quote_string() {
        assert_eq!(quote_string("plain"), "\"plain\"");
        assert_eq!(quote_string("say \"hi\""), "\"say \\\"hi\\\"\"");
        assert_eq!(quote_string("a\\b"), "\"a\\\\b\"");
        assert_eq!(quote_string("line\nbreak"), "\"line\\nbreak\"");
        assert_eq!(quote_string("\u{1}"), "\"\\u0001\"");
        assert_eq!(quote_string("\u{2028}"), "\"\\u2028\"");
    }

    #[test]
    fn test_to_literal() {
        let value = json!({
            "first_name": "Ada",
            "age": 36,
            "tags": ["x", 1, true],
            "spouse": null,
            "meta": {},
        });
        assert_eq!(
            to_literal(&value),
            "{ firstName: \"Ada\", age: 36, tags: [\"x\", 1, true], meta: {} }"
        );
        assert_eq!(to_literal(&json!([])), "[]");
        assert_eq!(to_literal(&json!({"2fa": false})), "{ \"2fa\": false }");
    }

    #[test]
    fn test_structured_literal_follows_model() {
        let first = json!({"lines": [{"sku": "A", "shipped": "2024-02-01"}]});
        let model = ModelInferrer::new(ValueEncoding::Structured)
            .infer(&[first.as_object().unwrap().clone()]);
        let kind = &model.get("lines").unwrap().kind;
        let mut handler = CollectingErrorHandler::new();

        let literal = structured_literal(
            &json!([
                {"sku": "A", "shipped": "2024-02-01"},
                {"sku": "B", "gift": true},
            ]),
            kind,
            "lines",
            &mut handler,
        );

        assert_eq!(
            literal,
            "[{ sku: \"A\", shipped: new Date(\"2024-02-01\") }, { sku: \"B\" }]"
        );
        assert_eq!(
            handler.diagnostics(),
            &[Diagnostic::ContentOmitted {
                field: "lines.gift".to_string(),
                reason: "not declared by the nested interface".to_string(),
            }]
        );
    }
}
