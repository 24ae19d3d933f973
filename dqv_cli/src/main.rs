mod commands;
mod logging;
mod output;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dqv_config::AppConfig;
use std::path::PathBuf;
use std::process::ExitCode;

use crate::output::OutputFormat;

#[derive(Parser)]
#[command(name = "dqv")]
#[command(version, about = "Data Quality Validator CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the configuration file (YAML or TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the catalog rules of a table
    Validate {
        /// Target table whose rules are run
        table: String,

        /// Dataset to validate, as split or record JSON
        #[arg(short, long, conflicts_with = "query")]
        dataset: Option<PathBuf>,

        /// Query fetching the dataset to validate
        #[arg(short, long)]
        query: Option<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Also write the log as JSON to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List the catalog rules of a table in run order
    Rules {
        /// Target table
        table: String,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            tracing::error!("{:#}", err);
            eprintln!("Error: {err:?}");
            ExitCode::from(2)
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let config = match &cli.config {
        Some(path) => AppConfig::load(path)
            .with_context(|| format!("Failed to load config file: {}", path.display()))?,
        None => AppConfig::default(),
    };

    logging::init(&config.logs, cli.verbose)?;

    match cli.command {
        Commands::Validate {
            table,
            dataset,
            query,
            format,
            output,
        } => {
            let args = commands::validate::ValidateArgs {
                table,
                dataset,
                query,
                format,
                output,
            };
            let passed = commands::validate::execute(&config, &args)?;
            Ok(if passed {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }

        Commands::Rules { table, format } => {
            commands::rules::execute(&config, &table, format)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}
