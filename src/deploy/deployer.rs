// ABOUTME: Deployment sequencer: runs operations against a selected environment.
// ABOUTME: Collaborators are injected so the sequence can run against stubs.

use super::{Operation, steps};
use crate::confirm::Confirmer;
use crate::context::{DeploymentContext, Environment};
use crate::error::{Error, Result};
use crate::output::Output;
use crate::remote::{RemoteCommand, RemoteExecutor};
use crate::sync::FileSynchronizer;

/// Ask before deploying to a guarded environment. The default answer is no.
pub fn confirm_deploy(confirmer: &dyn Confirmer, environment: Environment) -> Result<()> {
    if !environment.requires_confirmation() {
        return Ok(());
    }
    let prompt = format!("Are you sure you want to deploy {environment}?");
    if confirmer.confirm(&prompt, false)? {
        Ok(())
    } else {
        tracing::warn!(%environment, "deployment declined by operator");
        Err(Error::UserAbort(environment))
    }
}

/// Runs deployment operations. Each operation fails fast: the first failing
/// remote command ends it and nothing already done is rolled back.
pub struct Deployer<'a> {
    executor: &'a dyn RemoteExecutor,
    synchronizer: &'a dyn FileSynchronizer,
    confirmer: &'a dyn Confirmer,
    output: &'a Output,
}

impl<'a> Deployer<'a> {
    pub fn new(
        executor: &'a dyn RemoteExecutor,
        synchronizer: &'a dyn FileSynchronizer,
        confirmer: &'a dyn Confirmer,
        output: &'a Output,
    ) -> Self {
        Self {
            executor,
            synchronizer,
            confirmer,
            output,
        }
    }

    pub async fn run(&self, ctx: &DeploymentContext, operation: Operation) -> Result<()> {
        self.output.step(ctx.environment().as_str(), operation.name());
        match operation {
            Operation::Bootstrap => self.bootstrap(ctx).await,
            Operation::CreateVirtualenv => self.create_virtualenv(ctx).await,
            Operation::Deploy => self.deploy(ctx).await,
            Operation::UpdateRequirements => self.update_requirements(ctx).await,
        }
    }

    /// First-time provisioning: directories, virtualenv, code, dependencies.
    pub async fn bootstrap(&self, ctx: &DeploymentContext) -> Result<()> {
        self.output.progress("  → Creating remote directories...");
        self.exec(&steps::make_dir(ctx.root())).await?;
        self.exec(&steps::make_dir(ctx.log_dir())).await?;

        self.create_virtualenv(ctx).await?;
        self.deploy(ctx).await?;
        self.update_requirements(ctx).await
    }

    pub async fn create_virtualenv(&self, ctx: &DeploymentContext) -> Result<()> {
        self.output.progress(&format!(
            "  → Creating virtualenv at {}...",
            ctx.virtualenv_root()
        ));
        self.exec(&steps::create_virtualenv(ctx)).await
    }

    /// Sync the local tree and install the supervisor config.
    ///
    /// Production asks for confirmation first; declining aborts before anything
    /// is transferred or run.
    pub async fn deploy(&self, ctx: &DeploymentContext) -> Result<()> {
        confirm_deploy(self.confirmer, ctx.environment())?;

        self.output.progress(&format!(
            "  → Syncing {} to {}...",
            ctx.local_dir().display(),
            ctx.root()
        ));
        self.synchronizer.sync(&steps::sync_code(ctx)).await?;

        self.output.progress("  → Installing supervisor config...");
        self.exec(&steps::install_supervisor_config(ctx)).await
    }

    pub async fn update_requirements(&self, ctx: &DeploymentContext) -> Result<()> {
        self.output.progress("  → Installing requirements...");
        self.exec(&steps::install_requirements(ctx)).await
    }

    async fn exec(&self, command: &RemoteCommand) -> Result<()> {
        self.executor.run(command).await?;
        Ok(())
    }
}
