// ABOUTME: Entry point for the stagehand CLI application.
// ABOUTME: Parses arguments, loads configuration, and dispatches to the task runner.

mod cli;
mod commands;

use clap::Parser;
use cli::Cli;
use stagehand::config::Config;
use stagehand::deploy::TaskPlan;
use stagehand::error::Result;
use stagehand::output::{Output, OutputMode};
use std::env;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let mode = if cli.json {
        OutputMode::Json
    } else if cli.quiet {
        OutputMode::Quiet
    } else {
        OutputMode::Normal
    };

    if let Err(e) = run(cli, mode).await {
        Output::new(mode).error(&e.to_string());
        std::process::exit(1);
    }
}

async fn run(cli: Cli, mode: OutputMode) -> Result<()> {
    if cli.list {
        commands::list_tasks();
        return Ok(());
    }

    let plan = TaskPlan::parse(&cli.tasks)?;
    let config = Config::load(&cli.config)?;
    let local_dir = match cli.local_dir {
        Some(dir) => dir,
        None => env::current_dir()?,
    };

    commands::run_tasks(&plan, &config, &local_dir, cli.dry_run, Output::new(mode)).await
}
