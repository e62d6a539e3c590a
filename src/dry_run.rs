// ABOUTME: Executor and synchronizer that print what would happen instead of doing it.
// ABOUTME: Backs the --dry-run flag; no connection is opened.

use crate::context::DeploymentContext;
use crate::output::Output;
use crate::remote::{HostOutput, RemoteCommand, RemoteError, RemoteExecutor};
use crate::sync::{FileSynchronizer, RsyncSynchronizer, SyncError, SyncRequest};
use async_trait::async_trait;

pub struct DryRunExecutor<'a> {
    hosts: Vec<String>,
    output: &'a Output,
}

impl<'a> DryRunExecutor<'a> {
    pub fn new(ctx: &DeploymentContext, output: &'a Output) -> Self {
        Self {
            hosts: ctx.hosts().iter().map(|s| s.host.clone()).collect(),
            output,
        }
    }
}

#[async_trait]
impl RemoteExecutor for DryRunExecutor<'_> {
    async fn run(&self, command: &RemoteCommand) -> Result<Vec<HostOutput>, RemoteError> {
        let line = command.to_shell();
        Ok(self
            .hosts
            .iter()
            .map(|host| {
                self.output.progress(&format!("    [{host}] run: {line}"));
                HostOutput {
                    host: host.clone(),
                    stdout: String::new(),
                    stderr: String::new(),
                }
            })
            .collect())
    }
}

pub struct DryRunSynchronizer<'a> {
    hosts: Vec<String>,
    rsync: RsyncSynchronizer,
    output: &'a Output,
}

impl<'a> DryRunSynchronizer<'a> {
    pub fn new(ctx: &DeploymentContext, output: &'a Output) -> Self {
        Self {
            hosts: ctx.hosts().iter().map(|s| s.host.clone()).collect(),
            rsync: RsyncSynchronizer::new(ctx),
            output,
        }
    }
}

#[async_trait]
impl FileSynchronizer for DryRunSynchronizer<'_> {
    async fn sync(&self, request: &SyncRequest) -> Result<(), SyncError> {
        let files = request.excludes.transfer_set(&request.local_dir)?;
        for (index, host) in self.hosts.iter().enumerate() {
            if let Some(args) = self.rsync.rsync_args(request, index) {
                self.output
                    .progress(&format!("    [{host}] rsync {}", args.join(" ")));
            }
        }
        self.output.progress(&format!(
            "    {} file(s) would be transferred from {}",
            files.len(),
            request.local_dir.display()
        ));
        for file in &files {
            tracing::debug!(file = %file.display(), "would transfer");
        }
        Ok(())
    }
}
