//! The `infer` command

use std::path::PathBuf;

use clap::{Args, ValueEnum};
use fixturegen_core::config::SourceSpec;
use fixturegen_core::inference::{InferenceConfig, InferenceStats, ModelInferrer};
use fixturegen_core::model::ContentModel;
use serde::Serialize;

use crate::error::CliError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
}

/// Arguments for the `infer` command
#[derive(Args, Debug)]
pub struct InferArgs {
    /// CSV or JSON file to sample
    #[arg(value_name = "SOURCE")]
    pub source: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Rows sampled when refining required fields (0 = all rows)
    #[arg(long, value_name = "N")]
    pub sample_size: Option<usize>,

    /// Mark fields optional when later sampled rows leave them empty
    #[arg(long, default_value_t = false)]
    pub refine_required: bool,

    /// Include inference statistics in the output
    #[arg(long, default_value_t = false)]
    pub stats: bool,

    /// Output file path (stdout if not provided)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ModelWithStats<'a> {
    model: &'a ContentModel,
    stats: &'a InferenceStats,
}

/// Sample `args.source` and infer its content model
pub async fn infer_model(args: &InferArgs) -> Result<(ContentModel, InferenceStats), CliError> {
    let mut config = InferenceConfig::builder()
        .refine_required(args.refine_required)
        .build();
    if let Some(size) = args.sample_size {
        config.sample_size = size;
    }

    let descriptor = SourceSpec::new(&args.source).to_descriptor()?;
    let reader = descriptor.reader();
    let sampled = reader
        .open()
        .await?
        .take(config.effective_sample_size())
        .collect::<Result<Vec<_>, _>>()?;

    let inferrer = ModelInferrer::with_config(config, reader.encoding());
    let model = inferrer.infer(&sampled);
    let stats = InferenceStats::from_model(&model, sampled.len());
    Ok((model, stats))
}

fn render(args: &InferArgs, model: &ContentModel, stats: &InferenceStats) -> Result<String, CliError> {
    let output = match (args.format, args.stats) {
        (OutputFormat::Json, false) => serde_json::to_string_pretty(model)
            .map_err(|e| CliError::Output(e.to_string()))?,
        (OutputFormat::Json, true) => serde_json::to_string_pretty(&ModelWithStats { model, stats })
            .map_err(|e| CliError::Output(e.to_string()))?,
        (OutputFormat::Yaml, false) => {
            serde_yaml::to_string(model).map_err(|e| CliError::Output(e.to_string()))?
        }
        (OutputFormat::Yaml, true) => serde_yaml::to_string(&ModelWithStats { model, stats })
            .map_err(|e| CliError::Output(e.to_string()))?,
    };
    Ok(output)
}

/// Handle the `infer` command
pub async fn handle_infer(args: &InferArgs) -> Result<(), CliError> {
    let (model, stats) = infer_model(args).await?;

    eprintln!("Inferred model for {}:", args.source.display());
    eprintln!("  Rows sampled: {}", stats.rows_sampled);
    eprintln!("  Fields discovered: {}", stats.fields_discovered);

    let output = render(args, &model, &stats)?;
    match &args.output {
        Some(path) => {
            std::fs::write(path, &output).map_err(|e| CliError::Output(e.to_string()))?;
            eprintln!("  Written to: {}", path.display());
        }
        None => println!("{}", output),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn args(source: PathBuf) -> InferArgs {
        InferArgs {
            source,
            format: OutputFormat::Json,
            sample_size: None,
            refine_required: false,
            stats: false,
            output: None,
        }
    }

    #[tokio::test]
    async fn test_infer_csv_model() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("items.csv");
        std::fs::write(&path, "sku,price\nA1,9.5\nB2,\n").unwrap();

        let (model, stats) = infer_model(&args(path)).await.unwrap();
        assert_eq!(model.len(), 2);
        assert_eq!(stats.rows_sampled, 1);
        assert_eq!(stats.fields_discovered, 2);
    }

    #[tokio::test]
    async fn test_refinement_reads_more_rows() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("items.json");
        std::fs::write(&path, r#"[{"a": 1}, {"a": null}, {"a": 3}]"#).unwrap();

        let mut args = args(path);
        args.refine_required = true;
        args.sample_size = Some(2);
        let (_, stats) = infer_model(&args).await.unwrap();
        assert_eq!(stats.rows_sampled, 2);
        assert_eq!(stats.optional_fields, 1);
    }

    #[tokio::test]
    async fn test_render_with_stats_as_yaml() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("one.json");
        std::fs::write(&path, r#"{"name": "x"}"#).unwrap();

        let mut args = args(path);
        args.format = OutputFormat::Yaml;
        args.stats = true;
        let (model, stats) = infer_model(&args).await.unwrap();
        let text = render(&args, &model, &stats).unwrap();

        assert!(text.contains("model:"));
        assert!(text.contains("rowsSampled: 1"));
    }

    #[tokio::test]
    async fn test_unknown_extension_rejected() {
        let result = infer_model(&args(PathBuf::from("data.parquet"))).await;
        assert!(matches!(result, Err(CliError::Config(_))));
    }
}
