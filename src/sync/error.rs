// ABOUTME: Errors from transferring the local tree to remote hosts.
// ABOUTME: Covers a missing rsync binary, bad local paths, and failed transfers.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("rsync is not installed or not in PATH")]
    Unavailable,

    #[error("local directory does not exist: {0}")]
    LocalDirMissing(PathBuf),

    #[error("invalid exclude pattern '{pattern}': {message}")]
    Pattern { pattern: String, message: String },

    #[error("failed to start rsync: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("rsync to {host} failed with exit code {}{}", exit_code_label(.exit_code), stderr_suffix(.stderr))]
    Failed {
        host: String,
        exit_code: Option<i32>,
        stderr: String,
    },

    #[error("failed to scan local directory: {0}")]
    Walk(String),
}

fn exit_code_label(code: &Option<i32>) -> String {
    code.map_or_else(|| "unknown".to_string(), |c| c.to_string())
}

fn stderr_suffix(stderr: &str) -> String {
    match stderr.trim() {
        "" => String::new(),
        s => format!(": {s}"),
    }
}
