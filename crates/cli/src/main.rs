//! fixturegen - generate TypeScript declarations from CSV and JSON samples

mod commands;
mod error;
mod logging;

use std::process::ExitCode;

use clap::{Parser, Subcommand};

use commands::generate::{GenerateArgs, handle_generate};
use commands::infer::{InferArgs, handle_infer};
use error::CliError;

#[derive(Parser, Debug)]
#[command(name = "fixturegen", version, about = "TypeScript declarations from sample data")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Transform sources into TypeScript modules
    Generate(GenerateArgs),
    /// Print the content model inferred for one source
    Infer(InferArgs),
}

async fn dispatch(command: Command) -> Result<(), CliError> {
    match command {
        Command::Generate(args) => handle_generate(&args).await,
        Command::Infer(args) => handle_infer(&args).await,
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(err) = logging::init(cli.verbose) {
        eprintln!("warning: {err:#}");
    }

    match dispatch(cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::from(err.exit_code())
        }
    }
}
