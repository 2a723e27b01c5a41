//! Ideaforge CLI
//!
//! Main entry point for the ideaforge command-line tool.
//! Delivers encrypted private prompts, executes them, and resolves
//! template chains against a completion backend.

mod commands;

use clap::{Parser, Subcommand};
use commands::{
    ComposeCommand, DeliverCommand, ExecuteCommand, KeygenCommand, RunCommand, TemplatesCommand,
};
use ideaforge_core::{config::AppConfig, logging, AppResult};
use std::path::PathBuf;

/// Ideaforge - secure prompt templating for idea generation
#[derive(Parser, Debug)]
#[command(name = "ideaforge")]
#[command(about = "Secure prompt templating for idea generation", long_about = None)]
#[command(version)]
struct Cli {
    /// Directory holding .prompt templates
    #[arg(short, long, global = true, env = "IDEAFORGE_TEMPLATES")]
    templates: Option<PathBuf>,

    /// Path to config file
    #[arg(short, long, global = true, env = "IDEAFORGE_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, env = "RUST_LOG")]
    log_level: Option<String>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    no_color: bool,

    /// Completion provider (ollama, mock)
    #[arg(short, long, global = true, env = "IDEAFORGE_PROVIDER")]
    provider: Option<String>,

    /// Model identifier
    #[arg(short, long, global = true, env = "IDEAFORGE_MODEL")]
    model: Option<String>,

    /// Provider endpoint URL
    #[arg(long, global = true, env = "IDEAFORGE_ENDPOINT")]
    endpoint: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Refine a private prompt and print it encrypted
    Deliver(DeliverCommand),

    /// Run an encrypted prompt
    Execute(ExecuteCommand),

    /// Resolve a chain of templates into one prompt and run it
    Compose(ComposeCommand),

    /// Run a single template
    Run(RunCommand),

    /// List available templates
    Templates(TemplatesCommand),

    /// Generate a prompt encryption key
    Keygen(KeygenCommand),
}

impl Commands {
    fn name(&self) -> &'static str {
        match self {
            Commands::Deliver(_) => "deliver",
            Commands::Execute(_) => "execute",
            Commands::Compose(_) => "compose",
            Commands::Run(_) => "run",
            Commands::Templates(_) => "templates",
            Commands::Keygen(_) => "keygen",
        }
    }
}

#[tokio::main]
async fn main() -> AppResult<()> {
    // Parse command-line arguments first (needed for logging config)
    let cli = Cli::parse();

    let mut config = AppConfig::load_with(cli.config)?.with_overrides(
        cli.templates,
        cli.provider,
        cli.model,
        cli.log_level,
        cli.verbose,
        cli.no_color,
    );

    if let Some(endpoint) = cli.endpoint {
        config.endpoint = Some(endpoint);
    }

    logging::init_logging(config.log_level.as_deref(), config.no_color)?;

    tracing::info!("Ideaforge starting");
    tracing::debug!("Templates: {:?}", config.templates_dir);
    tracing::debug!("Provider: {}", config.provider);
    tracing::debug!("Model: {:?}", config.model);

    let _span = tracing::info_span!("command", name = cli.command.name()).entered();

    let result = match cli.command {
        Commands::Deliver(cmd) => cmd.execute(&config).await,
        Commands::Execute(cmd) => cmd.execute(&config).await,
        Commands::Compose(cmd) => cmd.execute(&config).await,
        Commands::Run(cmd) => cmd.execute(&config).await,
        Commands::Templates(cmd) => cmd.execute(&config).await,
        Commands::Keygen(cmd) => cmd.execute(),
    };

    match &result {
        Ok(_) => tracing::info!("Command completed successfully"),
        Err(e) => tracing::error!("Command failed: {}", e),
    }

    result
}
