// ABOUTME: Runs resolved task stages against remote hosts (or prints them for --dry-run).
// ABOUTME: Opens SSH sessions per stage and always closes them, even on failure.

use stagehand::config::Config;
use stagehand::confirm::{Confirmer, FixedAnswer, TerminalConfirmer};
use stagehand::deploy::{Deployer, Stage, TaskPlan, confirm_deploy};
use stagehand::diagnostics::Diagnostics;
use stagehand::dry_run::{DryRunExecutor, DryRunSynchronizer};
use stagehand::error::Result;
use stagehand::output::{Output, OutputMode};
use stagehand::remote::SshExecutor;
use stagehand::sync::RsyncSynchronizer;
use std::path::Path;

pub async fn run_tasks(
    plan: &TaskPlan,
    config: &Config,
    local_dir: &Path,
    dry_run: bool,
    mut output: Output,
) -> Result<()> {
    output.start_timer();
    let mut diag = Diagnostics::default();

    let result = run_stages(plan, config, local_dir, dry_run, &output, &mut diag).await;

    for warning in diag.warnings() {
        output.warning(&warning.message);
    }

    result?;
    let summary = if dry_run { "Dry run complete" } else { "Done" };
    if diag.has_warnings() {
        output.success(&format!(
            "{summary} with {} warning(s).",
            diag.warnings().len()
        ));
    } else {
        output.success(&format!("{summary}."));
    }
    Ok(())
}

async fn run_stages(
    plan: &TaskPlan,
    config: &Config,
    local_dir: &Path,
    dry_run: bool,
    output: &Output,
    diag: &mut Diagnostics,
) -> Result<()> {
    let stages = plan.resolve(config, local_dir, diag)?;

    for stage in &stages {
        let ctx = &stage.context;
        output.progress(&format!(
            "Using {} environment: {} host(s), root {}",
            ctx.environment(),
            ctx.hosts().len(),
            ctx.root()
        ));

        if dry_run {
            dry_run_stage(stage, output).await?;
        } else {
            run_stage(stage, output, diag).await?;
        }
    }

    Ok(())
}

async fn run_stage(stage: &Stage, output: &Output, diag: &mut Diagnostics) -> Result<()> {
    let ctx = &stage.context;

    // Asked once, before any host is contacted or its key recorded.
    let prompted = stage.requires_confirmation();
    if prompted {
        confirm_deploy(&TerminalConfirmer, ctx.environment())?;
    }

    for server in ctx.hosts() {
        output.progress(&format!("  → Connecting to {server}..."));
    }
    let executor = SshExecutor::connect(ctx).await?;
    let synchronizer =
        RsyncSynchronizer::new(ctx).show_progress(output.mode() == OutputMode::Normal);
    let answered = FixedAnswer(true);
    let confirmer: &dyn Confirmer = if prompted {
        &answered
    } else {
        &TerminalConfirmer
    };

    let deployer = Deployer::new(&executor, &synchronizer, confirmer, output);
    let mut result = Ok(());
    for operation in &stage.operations {
        result = deployer.run(ctx, *operation).await;
        if result.is_err() {
            break;
        }
    }

    executor.disconnect(diag).await;
    result
}

async fn dry_run_stage(stage: &Stage, output: &Output) -> Result<()> {
    let ctx = &stage.context;
    let executor = DryRunExecutor::new(ctx, output);
    let synchronizer = DryRunSynchronizer::new(ctx, output);
    let confirmer = FixedAnswer(true);

    let deployer = Deployer::new(&executor, &synchronizer, &confirmer, output);
    for operation in &stage.operations {
        deployer.run(ctx, *operation).await?;
    }
    Ok(())
}
