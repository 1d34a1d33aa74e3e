use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use std::path::Path;

use mws_client::cli::{Cli, handle_command};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_file.as_deref())?;

    info!("Starting mws-client");
    handle_command(cli).await
}

/// Log to stderr, or to a file truncated on each run
fn init_logging(log_file: Option<&Path>) -> Result<()> {
    let mut builder = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));

    if let Some(path) = log_file {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)
            .with_context(|| format!("Failed to open log file: {}", path.display()))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }

    builder.init();
    Ok(())
}
