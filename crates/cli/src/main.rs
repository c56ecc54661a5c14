//! # sitelog-cli: submit construction-site photos from a terminal
//!
//! Reads a photo, runs it through OCR and field extraction, and upserts the
//! site into the shared spreadsheet through the credential-hiding proxies.

mod analyze;
mod check;
mod config;
mod find;
mod pipeline;
mod submit;

use anyhow::Result;
use clap::{Parser, Subcommand};
use sitelog::SiteError;
use std::{fs::File, process::ExitCode};
use tracing_subscriber::{fmt, EnvFilter};

// --- CLI Definition ---

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to a YAML config file (default: ./sitelog.yml, if present)
    #[arg(long, global = true, env = "SITELOG_CONFIG")]
    config: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Read a photo and print the fields found on it
    Analyze(analyze::AnalyzeArgs),
    /// Read a photo and add or update its site in the sheet
    Submit(submit::SubmitArgs),
    /// Look up which sheet row holds a site
    Find(find::FindArgs),
    /// Inspect the client configuration
    #[command(subcommand)]
    Config(check::ConfigCommands),
}

impl Commands {
    fn name(&self) -> &'static str {
        match self {
            Commands::Analyze(_) => "Analyze",
            Commands::Submit(_) => "Submit",
            Commands::Find(_) => "Find",
            Commands::Config(_) => "Config check",
        }
    }
}

// --- Main Application Entry ---

#[tokio::main]
async fn main() -> Result<ExitCode> {
    dotenvy::dotenv().ok();

    // Setup logging to a file
    let log_file = File::create("sitelog-cli.log")?;
    let subscriber = fmt::Subscriber::builder()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(EnvFilter::from_default_env())
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let cli = Cli::parse();

    match run(&cli).await {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(e) => {
            tracing::error!("{} failed: {e:?}", cli.command.name());
            eprintln!("{} failed: {e}", cli.command.name());
            if let Some(site_error) = e.downcast_ref::<SiteError>() {
                eprintln!("{}", site_error.remediation());
            }
            Ok(ExitCode::FAILURE)
        }
    }
}

async fn run(cli: &Cli) -> Result<()> {
    let config = config::load_config(cli.config.as_deref())?;
    match &cli.command {
        Commands::Analyze(args) => analyze::handle_analyze(args, &config).await,
        Commands::Submit(args) => submit::handle_submit(args, &config).await,
        Commands::Find(args) => find::handle_find(args, &config).await,
        Commands::Config(command) => check::handle_config(command, &config),
    }
}
