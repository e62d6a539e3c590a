// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Tasks are positional and run in order: `stagehand staging bootstrap`.

use clap::Parser;
use stagehand::config::CONFIG_PATH;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "stagehand")]
#[command(about = "Deploy a Python app to staging or production over SSH and rsync")]
#[command(
    after_help = "Select an environment, then the operations to run against it:\n  \
                  stagehand staging bootstrap\n  \
                  stagehand production deploy update_requirements"
)]
#[command(version)]
pub struct Cli {
    /// Tasks to run, in order
    #[arg(value_name = "TASK", required_unless_present = "list")]
    pub tasks: Vec<String>,

    /// Path to the server configuration file
    #[arg(short, long, default_value = CONFIG_PATH)]
    pub config: PathBuf,

    /// Local source tree to sync (defaults to the current directory)
    #[arg(long)]
    pub local_dir: Option<PathBuf>,

    /// Print the commands that would run without connecting to any host
    #[arg(long)]
    pub dry_run: bool,

    /// List available tasks
    #[arg(short, long)]
    pub list: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Only print the final result
    #[arg(short, long, conflicts_with = "json")]
    pub quiet: bool,

    /// Emit JSON lines instead of human-readable output
    #[arg(long)]
    pub json: bool,
}
