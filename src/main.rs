// ABOUTME: Entry point for the playground server.
// ABOUTME: Parses arguments, loads configuration and runs the API.

mod cli;

use clap::Parser;
use cli::{Cli, Commands};
use playground::api;
use playground::config::{Config, ListenAddress};
use playground::error::Result;
use playground::runtime;
use playground::sandbox::Sandbox;
use std::env;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // RUST_LOG wins over the verbose flag when set.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("playground=info,warn")
        }
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    let result = run(cli).await;

    if let Err(e) = result {
        eprintln!("Error: {e}");
        if let Some(hint) = e.hint() {
            eprintln!("Hint: {hint}");
        }
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Serve { address, config } => serve(address, config).await,
    }
}

async fn serve(address: Option<ListenAddress>, config_path: Option<PathBuf>) -> Result<()> {
    let mut config = match config_path {
        Some(path) => Config::load(&path)?,
        None => {
            let cwd = env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
            Config::discover(&cwd)?
        }
    };
    if let Some(address) = address {
        config.address = address;
    }

    let runtime = runtime::connect(&config.runtime).await?;
    tracing::info!(
        runtime = %runtime.runtime_type(),
        config_root = %config.sandbox.config_root.display(),
        "connected to container runtime"
    );

    let sandbox = Sandbox::new(runtime, config.sandbox);
    api::serve(&config.address, sandbox).await
}
