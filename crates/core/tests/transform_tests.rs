//! End-to-end generation tests

use std::cell::RefCell;
use std::rc::Rc;

use fixturegen_core::config::{Layout, TransformConfig};
use fixturegen_core::diagnostics::Diagnostic;
use fixturegen_core::inference::InferenceConfig;
use fixturegen_core::pipeline::TypeScriptTransformer;
use fixturegen_core::source::{CsvSource, JsonSource, SourceDescriptor};
use fixturegen_core::storage::MemorySink;

fn json(identity: &str, text: &str) -> SourceDescriptor {
    SourceDescriptor::new(JsonSource::from_text(identity, text))
}

fn csv(identity: &str, text: &str) -> SourceDescriptor {
    SourceDescriptor::new(CsvSource::from_text(identity, text))
}

/// Run `sources` through a fresh transformer and return every artifact text
async fn generate(
    config: TransformConfig,
    sources: &[SourceDescriptor],
) -> (Vec<(String, String)>, Vec<Diagnostic>) {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let handler = {
        let seen = Rc::clone(&seen);
        move |diagnostic: Diagnostic| seen.borrow_mut().push(diagnostic)
    };

    let mut transformer = TypeScriptTransformer::new(config).with_error_handler(handler);
    transformer.transform_sources(sources).await;
    let sink = MemorySink::new();
    transformer.finalize(&sink).await;

    let artifacts = sink
        .results()
        .into_iter()
        .map(|artifact| (artifact.name, artifact.text))
        .collect();
    let diagnostics = seen.borrow().clone();
    (artifacts, diagnostics)
}

mod scenario_tests {
    use super::*;

    #[tokio::test]
    async fn test_single_row_scalars() {
        let (artifacts, diagnostics) = generate(
            TransformConfig::default(),
            &[json("account.json", r#"{"id": 1, "active": true}"#)],
        )
        .await;

        assert!(diagnostics.is_empty());
        assert_eq!(artifacts.len(), 1);
        assert_eq!(artifacts[0].0, "account.json.ts");
        assert_eq!(
            artifacts[0].1,
            "// Generated from account.json. Do not edit.\n\
             \n\
             export interface Account {\n  readonly id: number; // id\n  readonly active: boolean; // active\n}\n\
             \n\
             export const account: Account = { id: 1, active: true };\n"
        );
    }

    #[tokio::test]
    async fn test_unknown_fields_stay_out_of_literals() {
        let (artifacts, _) = generate(
            TransformConfig::default(),
            &[json("notes.json", r#"[{"id": 1, "note": null, "tags": []}]"#)],
        )
        .await;

        let text = &artifacts[0].1;
        assert!(text.contains("  readonly note?: unknown; // note\n"));
        assert!(text.contains("  readonly tags?: unknown[]; // tags\n"));
        assert!(text.contains("export const notes: Notes = { id: 1 };"));
    }

    #[tokio::test]
    async fn test_embedded_quotes_are_escaped() {
        let (artifacts, _) = generate(
            TransformConfig::default(),
            &[csv("quotes.csv", "text\n\"He said \"\"no\"\"\"\n")],
        )
        .await;

        assert!(
            artifacts[0]
                .1
                .contains("export const quotes: Quotes = { text: \"He said \\\"no\\\"\" };")
        );
    }
}

mod required_tests {
    use super::*;

    const ROWS: &str = r#"[{"name": "a"}, {"name": null}]"#;

    #[tokio::test]
    async fn test_first_row_decides_required() {
        let (artifacts, _) = generate(TransformConfig::default(), &[json("names.json", ROWS)]).await;

        assert_eq!(
            artifacts[0].1,
            "// Generated from names.json. Do not edit.\n\
             \n\
             export interface Names {\n  readonly name: string; // name\n}\n\
             \n\
             export const names: Names[] = [\n  { name: \"a\" },\n  {},\n];\n"
        );
    }

    #[tokio::test]
    async fn test_refinement_makes_field_optional() {
        let config = TransformConfig::default().with_inference(
            InferenceConfig::builder()
                .refine_required(true)
                .sample_size(0)
                .build(),
        );
        let (artifacts, _) = generate(config, &[json("names.json", ROWS)]).await;

        assert!(
            artifacts[0]
                .1
                .contains("export interface Names {\n  readonly name?: string; // name\n}")
        );
    }

    #[tokio::test]
    async fn test_field_missing_from_first_row_is_optional() {
        let (artifacts, _) = generate(
            TransformConfig::default(),
            &[json("people.json", r#"{"name": "Ada", "email": null}"#)],
        )
        .await;

        assert!(artifacts[0].1.contains("  readonly name: string; // name\n"));
        assert!(artifacts[0].1.contains("  readonly email?: unknown; // email\n"));
    }
}

mod layout_tests {
    use super::*;

    fn sources() -> Vec<SourceDescriptor> {
        vec![
            json("people.json", r#"{"id": 1}"#),
            json("flags.json", r#"{"on": true}"#),
        ]
    }

    #[tokio::test]
    async fn test_combined_single_row_as_object() {
        let config = TransformConfig::default().with_layout(Layout::Combined);
        let (artifacts, _) = generate(config, &sources()).await;

        assert_eq!(artifacts.len(), 1);
        assert_eq!(artifacts[0].0, "content.ts");
        assert_eq!(
            artifacts[0].1,
            "// Generated from people.json, flags.json. Do not edit.\n\
             \n\
             export interface People {\n  readonly id: number; // id\n}\n\
             \n\
             export interface Flags {\n  readonly on: boolean; // on\n}\n\
             \n\
             export interface Content {\n  readonly people: People; // people.json\n  readonly flags: Flags; // flags.json\n}\n\
             \n\
             export const content: Content = {\n  people: { id: 1 },\n  flags: { on: true },\n};\n"
        );
    }

    #[tokio::test]
    async fn test_combined_rows_as_arrays() {
        let config = TransformConfig::default()
            .with_layout(Layout::Combined)
            .with_module_name("fixtures")
            .with_single_row_as_object(false);
        let (artifacts, _) = generate(config, &sources()).await;

        assert_eq!(artifacts[0].0, "fixtures.ts");
        let text = &artifacts[0].1;
        assert!(text.contains(
            "export interface Fixtures {\n  readonly people: People[]; // people.json\n  readonly flags: Flags[]; // flags.json\n}"
        ));
        assert!(text.ends_with(
            "export const fixtures: Fixtures = {\n  people: [\n    { id: 1 },\n  ],\n  flags: [\n    { on: true },\n  ],\n};\n"
        ));
    }

    #[tokio::test]
    async fn test_layouts_carry_the_same_declarations() {
        let (separate, _) = generate(TransformConfig::default(), &sources()).await;
        let (combined, _) =
            generate(TransformConfig::default().with_layout(Layout::Combined), &sources()).await;

        assert_eq!(separate.len(), 2);
        for (_, text) in &separate {
            let interface = text
                .split("\n\n")
                .find(|block| block.starts_with("export interface"))
                .unwrap();
            assert!(combined[0].1.contains(interface));
        }
        assert!(separate[0].1.contains("export const people: People = { id: 1 };"));
        assert!(combined[0].1.contains("  people: { id: 1 },\n"));
    }

    #[tokio::test]
    async fn test_combined_interface_avoids_source_interface_name() {
        let config = TransformConfig::default().with_layout(Layout::Combined);
        let (artifacts, diagnostics) = generate(
            config,
            &[
                json("content.json", r#"{"id": 1}"#),
                json("other.json", r#"{"x": true}"#),
            ],
        )
        .await;

        assert!(diagnostics.is_empty());
        assert_eq!(
            artifacts[0].1,
            "// Generated from content.json, other.json. Do not edit.\n\
             \n\
             export interface Content {\n  readonly id: number; // id\n}\n\
             \n\
             export interface Other {\n  readonly x: boolean; // x\n}\n\
             \n\
             export interface Content2 {\n  readonly content: Content; // content.json\n  readonly other: Other; // other.json\n}\n\
             \n\
             export const content: Content2 = {\n  content: { id: 1 },\n  other: { x: true },\n};\n"
        );
    }

    #[tokio::test]
    async fn test_naming_overrides() {
        let source = json("p.json", r#"{"id": 1}"#)
            .with_module_name("models/person")
            .with_interface_name("Person")
            .with_constant_name("defaultPerson");
        let (artifacts, _) = generate(TransformConfig::default(), &[source]).await;

        assert_eq!(artifacts[0].0, "models/person.ts");
        assert!(artifacts[0].1.contains("export interface Person {"));
        assert!(artifacts[0].1.contains("export const defaultPerson: Person = { id: 1 };"));
    }
}

mod robustness_tests {
    use super::*;

    #[tokio::test]
    async fn test_deterministic_output() {
        let sources = || {
            vec![
                json(
                    "orders.json",
                    r#"[{"id": 7, "placed": "2024-03-01T08:00:00Z", "lines": [{"sku": "A", "qty": 2}]}]"#,
                ),
                csv("stock.csv", "sku,count,checked\nA,3,2024-02-28\nB,,\n"),
            ]
        };
        let (first, _) = generate(TransformConfig::default(), &sources()).await;
        let (second, _) = generate(TransformConfig::default(), &sources()).await;
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_failing_source_does_not_block_others() {
        let sources = vec![
            json("broken.json", r#"[{"id": 1"#),
            csv("ok.csv", "id\n1\n"),
        ];

        let seen = Rc::new(RefCell::new(Vec::new()));
        let handler = {
            let seen = Rc::clone(&seen);
            move |diagnostic: Diagnostic| seen.borrow_mut().push(diagnostic)
        };
        let mut transformer =
            TypeScriptTransformer::new(TransformConfig::default()).with_error_handler(handler);
        transformer.transform_sources(&sources).await;

        let sink = MemorySink::new();
        let report = transformer.finalize(&sink).await;

        assert!(!report.is_success());
        assert_eq!(report.failed_sources().count(), 1);
        assert_eq!(report.artifacts, vec!["ok.csv.ts"]);
        assert!(sink.text("ok.csv.ts").unwrap().contains("export const ok: Ok = { id: 1 };"));
        assert!(matches!(
            seen.borrow().as_slice(),
            [Diagnostic::SourceFailed { origin, .. }] if origin == "broken.json"
        ));
    }

    #[tokio::test]
    async fn test_coercion_failure_omits_field() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let handler = {
            let seen = Rc::clone(&seen);
            move |diagnostic: Diagnostic| seen.borrow_mut().push(diagnostic)
        };
        let mut transformer =
            TypeScriptTransformer::new(TransformConfig::default()).with_error_handler(handler);
        transformer
            .transform_sources(&[csv("ages.csv", "id,age\n1,30\n2,old\n")])
            .await;

        assert_eq!(transformer.reports()[0].coercion_failures, 1);
        let sink = MemorySink::new();
        transformer.finalize(&sink).await;

        assert!(
            sink.text("ages.csv.ts")
                .unwrap()
                .ends_with("export const ages: Ages[] = [\n  { id: 1, age: 30 },\n  { id: 2 },\n];\n")
        );
        assert_eq!(
            seen.borrow()[0].to_string(),
            "ages.csv: row 1: field 'age' expected numeric, found \"old\""
        );
    }

    #[tokio::test]
    async fn test_empty_source() {
        let (artifacts, diagnostics) =
            generate(TransformConfig::default(), &[csv("empty.csv", "id,name\n")]).await;

        assert!(diagnostics.is_empty());
        assert_eq!(
            artifacts[0].1,
            "// Generated from empty.csv. Do not edit.\n\
             \n\
             export interface Empty {}\n\
             \n\
             export const empty: Empty[] = [];\n"
        );
    }
}
