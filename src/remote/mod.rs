// ABOUTME: Remote command execution across an environment's hosts.
// ABOUTME: Defines the executor seam and its SSH implementation.

mod command;
mod error;
mod ssh_executor;

pub use command::{Privilege, RemoteCommand, shell_quote};
pub use error::RemoteError;
pub use ssh_executor::SshExecutor;

use async_trait::async_trait;

/// Output of one command on one host.
#[derive(Debug, Clone)]
pub struct HostOutput {
    pub host: String,
    pub stdout: String,
    pub stderr: String,
}

/// Runs commands on the hosts of the selected environment.
///
/// Implementations run the command on every host in order and return the
/// first failure without touching the remaining hosts.
#[async_trait]
pub trait RemoteExecutor: Send + Sync {
    async fn run(&self, command: &RemoteCommand) -> Result<Vec<HostOutput>, RemoteError>;
}
