use clap::Parser;
use txstats::cli::{commands, Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve(args) => commands::execute_serve(args).await?,
        Commands::Init(args) => commands::execute_init(args)?,
    }

    Ok(())
}
