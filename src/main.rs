mod api;
mod cli;
mod config;
mod error;
mod models;
mod tui;
mod view;
mod workflow;

use anyhow::Result;
use clap::Parser;
use std::fs::File;

/// Interactive sessions log to a file so output never lands on the TUI.
fn init_logging(cli_args: &cli::Cli) -> Result<()> {
    let level = if cli_args.verbose { "debug" } else { "info" };
    let mut builder = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level));
    builder.format_timestamp_secs();

    if !cli_args.headless {
        let path = cli_args
            .log_file
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join("deptlist.log"));
        let file = File::create(&path)?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    builder.init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = cli::Cli::parse();
    init_logging(&cli_args)?;

    // Delegate the main application logic to the workflow module
    workflow::run_deptlist(cli_args).await
}
