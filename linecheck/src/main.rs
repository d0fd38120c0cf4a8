use anyhow::Result;
use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};
use linecheck_core::config::HarnessConfig;
use std::process::ExitCode;
use tracing::info;

mod app;

#[derive(Parser, Debug)]
#[command(author, version, about = "linecheck - conformance and load checks for line-protocol TCP servers", long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<Utf8PathBuf>,

    /// Server host
    #[arg(short = 'H', long)]
    host: Option<String>,

    /// Server port
    #[arg(short, long)]
    port: Option<u16>,

    /// Client count for a concurrency batch (repeat for several batches)
    #[arg(long = "clients", value_name = "N")]
    clients: Vec<usize>,

    /// ECHO commands sent by each simulated client
    #[arg(long, value_name = "M")]
    commands: Option<usize>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the full conformance and load suite (default)
    Run,
    /// Send a single command and print the reply
    Send {
        /// Command line to send, without the trailing newline
        line: String,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .init();

    info!("Starting linecheck v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let mut config = if let Some(config_path) = &args.config {
        HarnessConfig::load_from_path(config_path)?
    } else {
        HarnessConfig::load_or_default()?
    };

    // Override with CLI arguments
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if !args.clients.is_empty() {
        config.load.client_counts = args.clients;
    }
    if let Some(commands) = args.commands {
        config.load.commands_per_client = commands;
    }
    config.validate()?;

    info!("Target server: {}", config.address());

    let passed = match args.command.unwrap_or(Command::Run) {
        Command::Run => app::run(&config).await,
        Command::Send { line } => app::send(&config, &line).await,
    };

    Ok(if passed {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
