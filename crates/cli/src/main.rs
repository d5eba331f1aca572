//! IntelliRAG CLI
//!
//! Main entry point for the intellirag command-line tool.
//! Asks questions against the IntelliRAG service and renders cited answers.

mod commands;
mod render;

use clap::{Parser, Subcommand};
use commands::{AskCommand, CiteCommand, UploadCommand};
use intellirag_core::{config::AppConfig, logging, AppError, AppResult};
use std::io::IsTerminal;
use std::process::ExitCode;

/// IntelliRAG CLI - cited answers from your indexed PDFs
#[derive(Parser, Debug)]
#[command(name = "intellirag")]
#[command(about = "Ask questions about indexed PDFs and inspect cited evidence", long_about = None)]
#[command(version)]
struct Cli {
    /// Base URL of the IntelliRAG service
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Ask a question about the indexed documents
    Ask(AskCommand),

    /// Upload a PDF for indexing
    Upload(UploadCommand),

    /// Extract citation tokens from answer text (offline)
    Cite(CiteCommand),
}

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", failure_message(&e));
            ExitCode::FAILURE
        }
    }
}

/// Line printed to stderr when a command fails.
fn failure_message(error: &AppError) -> String {
    format!("Error: {error}")
}

async fn run() -> AppResult<()> {
    // Parse command-line arguments first (needed for logging config)
    let cli = Cli::parse();

    // Load base configuration from file and environment
    let config = AppConfig::load()?;

    // Apply CLI overrides
    let config = config.with_overrides(
        cli.api_url,
        cli.timeout,
        cli.log_level,
        cli.verbose,
        cli.no_color,
    );

    // Initialize logging with final configuration
    logging::init_logging(config.log_level.as_deref(), config.no_color)?;

    let color = !config.no_color && std::io::stdout().is_terminal();
    colored::control::set_override(color);

    tracing::info!("IntelliRAG CLI starting");
    tracing::debug!("Config file: {:?}", config.config_path());
    tracing::debug!("Service: {}", config.api_base_url);
    tracing::debug!("Timeout: {}s", config.timeout_secs);

    let command_name = match &cli.command {
        Commands::Ask(_) => "ask",
        Commands::Upload(_) => "upload",
        Commands::Cite(_) => "cite",
    };
    let _span = tracing::info_span!("command", name = command_name).entered();

    // Route to command handlers
    let result = match cli.command {
        Commands::Ask(cmd) => cmd.execute(&config, color).await,
        Commands::Upload(cmd) => cmd.execute(&config).await,
        Commands::Cite(cmd) => cmd.execute(),
    };

    match &result {
        Ok(_) => tracing::info!("Command completed successfully"),
        Err(e) => tracing::debug!("Command failed: {:?}", e),
    }

    result
}
