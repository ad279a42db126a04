// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Defines the serve subcommand and global flags.

use clap::{Parser, Subcommand};
use playground::config::ListenAddress;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "playground")]
#[command(about = "HTTP API for sandboxed desktop containers on Docker and Podman")]
#[command(version)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the server
    Serve {
        /// Serve address, e.g. ":9090" or "127.0.0.1:9090"
        #[arg(short, long)]
        address: Option<ListenAddress>,

        /// Configuration file (defaults to playground.yml in the current directory)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}
