use anyhow::Result;
use clap::Parser;
use std::io;
use tcsw_cli::{commands, Cli, Commands};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::builder()
        .with_default_directive(cli.log_level.into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    match &cli.command {
        Commands::Path(args) => commands::path::handle(args),
        Commands::Random(args) => commands::random::handle(args),
    }
}
