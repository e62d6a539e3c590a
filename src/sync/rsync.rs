// ABOUTME: FileSynchronizer that shells out to the local rsync binary over ssh.
// ABOUTME: Runs one rsync per host, in configuration order, stopping at the first failure.

use super::{DEFAULT_RSYNC_FLAGS, FileSynchronizer, SyncError, SyncRequest};
use crate::config::ServerConfig;
use crate::context::DeploymentContext;
use async_trait::async_trait;
use std::process::Stdio;
use tokio::process::Command;

/// One rsync target.
#[derive(Debug, Clone)]
struct Target {
    destination: String,
    server: ServerConfig,
}

pub struct RsyncSynchronizer {
    targets: Vec<Target>,
    show_progress: bool,
}

impl RsyncSynchronizer {
    pub fn new(ctx: &DeploymentContext) -> Self {
        let targets = ctx
            .hosts()
            .iter()
            .map(|server| Target {
                destination: server.destination(ctx.user()),
                server: server.clone(),
            })
            .collect();
        Self {
            targets,
            show_progress: false,
        }
    }

    /// Stream rsync's own output to the terminal instead of the debug log.
    pub fn show_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    pub async fn check_available() -> bool {
        Command::new("rsync")
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map(|s| s.success())
            .unwrap_or(false)
    }

    /// Full rsync argument list for `request` against the host at `index`.
    pub fn rsync_args(&self, request: &SyncRequest, index: usize) -> Option<Vec<String>> {
        self.targets
            .get(index)
            .map(|target| build_args(request, &target.server, &target.destination))
    }
}

fn build_args(request: &SyncRequest, server: &ServerConfig, destination: &str) -> Vec<String> {
    let mut args = vec![DEFAULT_RSYNC_FLAGS.to_string()];
    args.extend(request.extra_opts.iter().cloned());
    if request.delete {
        args.push("--delete".to_string());
    }
    args.extend(
        request
            .excludes
            .patterns()
            .iter()
            .map(|pattern| format!("--exclude={pattern}")),
    );
    args.push(format!("--rsh={}", ssh_command(server)));
    args.push(request.source_arg());
    args.push(format!("{destination}:{}", request.remote_dir));
    args
}

/// Remote shell for rsync, mirroring the SSH session settings for this host.
fn ssh_command(server: &ServerConfig) -> String {
    let mut rsh = format!("ssh -p {}", server.port);
    if let Some(key) = &server.key_path {
        rsh.push_str(&format!(" -i {}", crate::remote::shell_quote(&key.display().to_string())));
    }
    if server.trust_first_connection {
        rsh.push_str(" -o StrictHostKeyChecking=accept-new");
    }
    rsh
}

#[async_trait]
impl FileSynchronizer for RsyncSynchronizer {
    async fn sync(&self, request: &SyncRequest) -> Result<(), SyncError> {
        if !request.local_dir.is_dir() {
            return Err(SyncError::LocalDirMissing(request.local_dir.clone()));
        }
        if !Self::check_available().await {
            return Err(SyncError::Unavailable);
        }

        for target in &self.targets {
            let args = build_args(request, &target.server, &target.destination);
            tracing::info!(host = %target.server.host, args = ?args, "rsync");

            let mut cmd = Command::new("rsync");
            cmd.args(&args).stdin(Stdio::null()).stderr(Stdio::piped());
            if self.show_progress {
                cmd.stdout(Stdio::inherit());
            } else {
                cmd.stdout(Stdio::piped());
            }

            let output = cmd.output().await.map_err(SyncError::Spawn)?;
            if !output.stdout.is_empty() {
                tracing::debug!(
                    host = %target.server.host,
                    "{}",
                    String::from_utf8_lossy(&output.stdout).trim_end()
                );
            }

            if !output.status.success() {
                return Err(SyncError::Failed {
                    host: target.server.host.clone(),
                    exit_code: output.status.code(),
                    stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
                });
            }
        }

        Ok(())
    }
}
