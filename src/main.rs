use anyhow::Result;
use clap::Parser;

use pagedex::cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Records(args) => pagedex::cli::records::run(args).await,
        Commands::Dates { texts } => pagedex::cli::dates::run(&texts),
    }
}
