// ABOUTME: RemoteExecutor backed by one russh session per host.
// ABOUTME: Sessions are opened up front and closed together after the last operation.

use super::{HostOutput, RemoteCommand, RemoteError, RemoteExecutor};
use crate::context::DeploymentContext;
use crate::diagnostics::{Diagnostics, Warning};
use crate::ssh::Session;
use async_trait::async_trait;

pub struct SshExecutor {
    sessions: Vec<Session>,
}

impl SshExecutor {
    /// Connect to every host of the context, failing on the first host that refuses.
    pub async fn connect(ctx: &DeploymentContext) -> Result<Self, RemoteError> {
        let mut sessions = Vec::with_capacity(ctx.hosts().len());
        for server in ctx.hosts() {
            let config = server.ssh_session_config(ctx.user(), ctx.command_timeout());
            let session = Session::connect(config)
                .await
                .map_err(|source| RemoteError::Session {
                    host: server.host.clone(),
                    source,
                })?;
            sessions.push(session);
        }
        Ok(Self { sessions })
    }

    /// Close every session. Disconnect failures are recorded, not returned.
    pub async fn disconnect(self, diag: &mut Diagnostics) {
        for session in self.sessions {
            let host = session.host().to_string();
            if let Err(e) = session.disconnect().await {
                diag.warn(Warning::ssh_disconnect(format!(
                    "SSH disconnect failed for {host}: {e}"
                )));
            }
        }
    }
}

#[async_trait]
impl RemoteExecutor for SshExecutor {
    async fn run(&self, command: &RemoteCommand) -> Result<Vec<HostOutput>, RemoteError> {
        let line = command.to_shell();
        let mut outputs = Vec::with_capacity(self.sessions.len());

        for session in &self.sessions {
            let host = session.host().to_string();
            tracing::info!(%host, command = %line, "run");

            let output = session
                .exec(&line)
                .await
                .map_err(|source| RemoteError::Session {
                    host: host.clone(),
                    source,
                })?;

            if !output.success() {
                return Err(RemoteError::CommandFailed {
                    host,
                    command: line,
                    exit_code: output.exit_code,
                    stderr: output.stderr,
                });
            }

            tracing::debug!(%host, stdout = %output.stdout.trim_end(), "command finished");
            outputs.push(HostOutput {
                host,
                stdout: output.stdout,
                stderr: output.stderr,
            });
        }

        Ok(outputs)
    }
}
