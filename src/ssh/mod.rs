// ABOUTME: SSH transport for remote command execution.
// ABOUTME: Supports SSH agent and key-based authentication with known_hosts verification.

mod client;
mod error;
mod handler;

pub use client::{CommandOutput, Session, SessionConfig};
pub use error::{Error, Result};
