// ABOUTME: Library root for stagehand - exposes public types for testing.
// ABOUTME: The main binary is in main.rs.

pub mod config;
pub mod confirm;
pub mod context;
pub mod deploy;
pub mod diagnostics;
pub mod dry_run;
pub mod error;
pub mod output;
pub mod remote;
pub mod ssh;
pub mod sync;
pub mod types;
