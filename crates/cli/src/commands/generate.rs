//! The `generate` command

use std::path::PathBuf;

use clap::{Args, ValueEnum};
use fixturegen_core::config::{Layout, SourceSpec, TransformConfig};
use fixturegen_core::pipeline::run;
use fixturegen_core::storage::{ConsoleSink, EmitMode, FileSystemSink, PersistenceSink};
use tracing::info;

use crate::error::CliError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LayoutArg {
    /// One module per source
    Separate,
    /// One module holding every source
    Combined,
}

impl From<LayoutArg> for Layout {
    fn from(arg: LayoutArg) -> Self {
        match arg {
            LayoutArg::Separate => Layout::Separate,
            LayoutArg::Combined => Layout::Combined,
        }
    }
}

/// Arguments for the `generate` command
#[derive(Args, Debug, Default)]
pub struct GenerateArgs {
    /// CSV or JSON files to transform, after any listed in the config file
    #[arg(value_name = "SOURCE")]
    pub sources: Vec<PathBuf>,

    /// TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Module layout
    #[arg(long, value_enum)]
    pub layout: Option<LayoutArg>,

    /// Module name for the combined layout
    #[arg(long)]
    pub module_name: Option<String>,

    /// Directory for generated modules (stdout if not provided)
    #[arg(short, long, value_name = "DIR")]
    pub out_dir: Option<PathBuf>,

    /// Append to existing artifacts instead of replacing them
    #[arg(long, default_value_t = false)]
    pub append: bool,

    /// Rows sampled when refining required fields (0 = all rows)
    #[arg(long, value_name = "N")]
    pub sample_size: Option<usize>,

    /// Mark fields optional when later sampled rows leave them empty
    #[arg(long, default_value_t = false)]
    pub refine_required: bool,
}

impl GenerateArgs {
    /// Merge the flags over the config file, if any
    pub fn to_config(&self) -> Result<TransformConfig, CliError> {
        let mut config = match &self.config {
            Some(path) => TransformConfig::from_file(path)?,
            None => TransformConfig::default(),
        };

        for path in &self.sources {
            config = config.with_source(SourceSpec::new(path));
        }
        if let Some(layout) = self.layout {
            config = config.with_layout(layout.into());
        }
        if let Some(name) = &self.module_name {
            config = config.with_module_name(name);
        }
        if self.append {
            config = config.with_emit_mode(EmitMode::Append);
        }
        if let Some(size) = self.sample_size {
            config.inference.sample_size = size;
        }
        if self.refine_required {
            config.inference.refine_required = true;
        }

        if config.sources.is_empty() {
            return Err(CliError::InvalidArgument(
                "no sources given; pass files or a --config listing them".to_string(),
            ));
        }
        Ok(config)
    }
}

/// Handle the `generate` command
pub async fn handle_generate(args: &GenerateArgs) -> Result<(), CliError> {
    let config = args.to_config()?;

    let sink: Box<dyn PersistenceSink> = match &args.out_dir {
        Some(dir) => {
            info!(out_dir = %dir.display(), "Writing modules to directory");
            Box::new(FileSystemSink::new(dir))
        }
        None => Box::new(ConsoleSink::new()),
    };

    let report = run(config, sink.as_ref()).await?;
    report.print_summary();

    let failed = report.failed_sources().count() + report.failed_artifacts.len();
    if failed > 0 {
        return Err(CliError::PartialFailure(failed));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_flags_override_config_file() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join("fixturegen.toml");
        std::fs::write(
            &config_path,
            "layout = \"separate\"\nmoduleName = \"data\"\n\n[[sources]]\npath = \"a.csv\"\n",
        )
        .unwrap();

        let args = GenerateArgs {
            sources: vec![PathBuf::from("b.json")],
            config: Some(config_path),
            layout: Some(LayoutArg::Combined),
            append: true,
            sample_size: Some(5),
            refine_required: true,
            ..Default::default()
        };
        let config = args.to_config().unwrap();

        assert_eq!(config.layout, Layout::Combined);
        assert_eq!(config.module_name, "data");
        assert_eq!(config.emit_mode, EmitMode::Append);
        assert_eq!(config.sources.len(), 2);
        assert_eq!(config.sources[0].path, temp.path().join("a.csv"));
        assert_eq!(config.sources[1].path, PathBuf::from("b.json"));
        assert_eq!(config.inference.effective_sample_size(), 5);
    }

    #[test]
    fn test_requires_sources() {
        let result = GenerateArgs::default().to_config();
        assert!(matches!(result, Err(CliError::InvalidArgument(_))));
    }

    #[tokio::test]
    async fn test_generate_to_out_dir() {
        let temp = TempDir::new().unwrap();
        let csv_path = temp.path().join("users.csv");
        std::fs::write(&csv_path, "id,name\n1,Ada\n2,Linus\n").unwrap();
        let out_dir = temp.path().join("out");

        let args = GenerateArgs {
            sources: vec![csv_path],
            out_dir: Some(out_dir.clone()),
            ..Default::default()
        };
        handle_generate(&args).await.unwrap();

        let text = std::fs::read_to_string(out_dir.join("users.csv.ts")).unwrap();
        assert!(text.contains("export interface Users {"));
        assert!(text.contains("export const users: Users[] = ["));
    }

    #[tokio::test]
    async fn test_missing_source_fails_with_partial_status() {
        let temp = TempDir::new().unwrap();
        let args = GenerateArgs {
            sources: vec![temp.path().join("missing.csv")],
            out_dir: Some(temp.path().join("out")),
            ..Default::default()
        };

        let err = handle_generate(&args).await.unwrap_err();
        assert!(matches!(err, CliError::PartialFailure(1)));
        assert_eq!(err.exit_code(), 2);
    }
}
