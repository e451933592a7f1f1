pub mod commands;
pub mod config;

use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;

use config::LogFormat;

#[derive(Parser)]
#[command(name = "txstats")]
#[command(about = "Rolling 60-second transaction statistics over HTTP")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP server
    Serve(ServeArgs),
    /// Write a default .txstats.toml in the current directory
    Init(InitArgs),
}

#[derive(clap::Args, Debug, Default)]
pub struct ServeArgs {
    /// Address to listen on (overrides config file)
    #[arg(long, env = "TXSTATS_LISTEN")]
    pub listen: Option<SocketAddr>,

    /// Path to config file (defaults to ./.txstats.toml when present)
    #[arg(long, env = "TXSTATS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log output format (overrides config file)
    #[arg(long, value_enum, env = "TXSTATS_LOG_FORMAT")]
    pub log_format: Option<LogFormat>,
}

#[derive(clap::Args, Debug)]
pub struct InitArgs {
    /// Overwrite an existing config file
    #[arg(long)]
    pub force: bool,
}
