//! Terminal client for the document analysis server.
//!
//! ```bash
//! # One analysis, summarized and exported
//! report_app run --query refunds --limit 5 --summary --export reports
//!
//! # Interactive session reading commands from stdin
//! report_app --config report_client.ron shell
//! ```

mod platform;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use platform::{AppConfig, LogDestination, ScriptOptions};
use report_core::JobMode;

#[derive(Parser)]
#[command(name = "report_app")]
#[command(about = "Run document analyses and build summary reports", long_about = None)]
struct Cli {
    /// Configuration file (defaults to ./report_client.ron when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Analysis server base URL
    #[arg(long)]
    base_url: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long)]
    log_level: Option<String>,

    /// Where log output goes
    #[arg(long, value_enum)]
    log_destination: Option<LogDestination>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one analysis and print the grouped results
    Run {
        /// Query text
        #[arg(short, long)]
        query: String,
        /// Ask the server to summarize with the language model
        #[arg(long)]
        summarize_mode: bool,
        /// Maximum number of results (pure similarity mode)
        #[arg(short, long)]
        limit: Option<String>,
        /// Generate a summary report from the results
        #[arg(long)]
        summary: bool,
        /// Save the summary report into this directory
        #[arg(long, requires = "summary")]
        export: Option<PathBuf>,
    },
    /// Interactive session; type `help` for commands
    Shell,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(base_url) = cli.base_url {
        config.base_url = base_url;
    }
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }
    if let Some(destination) = cli.log_destination {
        config.log_destination = destination;
    }
    platform::initialize_logging(config.log_destination, config.level_filter());

    match cli.command {
        Commands::Run {
            query,
            summarize_mode,
            limit,
            summary,
            export,
        } => platform::run_script(
            &config,
            ScriptOptions {
                query,
                mode: JobMode::from_use_llm(summarize_mode),
                limit,
                summary,
                export,
            },
        ),
        Commands::Shell => platform::run_shell(&config),
    }
}
