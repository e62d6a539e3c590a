// ABOUTME: Integration tests for the deployment sequencer.
// ABOUTME: Runs operations against recording stubs and checks order, guards, and fail-fast.

mod support;

use stagehand::context::Environment;
use stagehand::deploy::{Deployer, Operation};
use stagehand::error::Error;
use stagehand::output::{Output, OutputMode};
use stagehand::remote::RemoteError;
use stagehand::sync::SyncError;
use support::{Call, CallLog, RecordingExecutor, RecordingSynchronizer, ScriptedConfirmer, context};

fn quiet() -> Output {
    Output::new(OutputMode::Quiet)
}

mod bootstrap {
    use super::*;

    /// Test: bootstrap runs mkdir root, mkdir log, virtualenv, deploy, requirements.
    #[tokio::test]
    async fn runs_steps_in_fixed_order() {
        support::init_tracing();
        let log = CallLog::default();
        let executor = RecordingExecutor::new(&log);
        let synchronizer = RecordingSynchronizer::new(&log);
        let confirmer = ScriptedConfirmer::yes();
        let output = quiet();
        let deployer = Deployer::new(&executor, &synchronizer, &confirmer, &output);

        let ctx = context(Environment::Staging);
        deployer.bootstrap(&ctx).await.unwrap();

        let calls = log.calls();
        assert_eq!(calls.len(), 6, "unexpected calls: {calls:#?}");
        assert_eq!(
            calls[0],
            Call::Run("mkdir -p /home/ubuntu/testapp/www/staging".to_string())
        );
        assert_eq!(
            calls[1],
            Call::Run("mkdir -p /home/ubuntu/testapp/www/log".to_string())
        );
        assert_eq!(
            calls[2],
            Call::Run(
                "virtualenv --clear --distribute /home/ubuntu/testapp/www/staging/env".to_string()
            )
        );
        assert!(matches!(calls[3], Call::Sync(_)));
        assert_eq!(
            calls[4],
            Call::Run(
                "cd /home/ubuntu/testapp/www/staging && sudo -n -- cp ./configs/_supervisord.conf /etc/supervisord.conf"
                    .to_string()
            )
        );
        assert_eq!(
            calls[5],
            Call::Run(
                "cd /home/ubuntu/testapp/www/staging/configs && pip install -E \
                 /home/ubuntu/testapp/www/staging/env --requirement \
                 /home/ubuntu/testapp/www/staging/configs/requirements.txt"
                    .to_string()
            )
        );
    }

    /// Test: a failing step stops the sequence; earlier steps are not undone.
    #[tokio::test]
    async fn stops_at_first_failure() {
        let log = CallLog::default();
        let executor = RecordingExecutor::failing_on(&log, "virtualenv");
        let synchronizer = RecordingSynchronizer::new(&log);
        let confirmer = ScriptedConfirmer::yes();
        let output = quiet();
        let deployer = Deployer::new(&executor, &synchronizer, &confirmer, &output);

        let err = deployer
            .bootstrap(&context(Environment::Staging))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            Error::Remote(RemoteError::CommandFailed { exit_code: 1, .. })
        ));
        assert_eq!(log.commands().len(), 3, "mkdir, mkdir, virtualenv only");
        assert!(log.syncs().is_empty(), "deploy must not start");
    }

    /// Test: production bootstrap declined at the deploy gate keeps earlier steps.
    #[tokio::test]
    async fn production_decline_aborts_mid_sequence() {
        let log = CallLog::default();
        let executor = RecordingExecutor::new(&log);
        let synchronizer = RecordingSynchronizer::new(&log);
        let confirmer = ScriptedConfirmer::no();
        let output = quiet();
        let deployer = Deployer::new(&executor, &synchronizer, &confirmer, &output);

        let err = deployer
            .bootstrap(&context(Environment::Production))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::UserAbort(Environment::Production)));
        assert_eq!(log.commands().len(), 3);
        assert!(log.syncs().is_empty());
    }
}

mod deploy {
    use super::*;

    /// Test: declined production deploy performs no sync and no remote command.
    #[tokio::test]
    async fn declined_production_has_no_side_effects() {
        let log = CallLog::default();
        let executor = RecordingExecutor::new(&log);
        let synchronizer = RecordingSynchronizer::new(&log);
        let confirmer = ScriptedConfirmer::no();
        let output = quiet();
        let deployer = Deployer::new(&executor, &synchronizer, &confirmer, &output);

        let err = deployer
            .deploy(&context(Environment::Production))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::UserAbort(Environment::Production)));
        assert_eq!(err.to_string(), "Production deployment aborted.");
        assert!(log.is_empty());
        assert_eq!(
            confirmer.prompts(),
            vec!["Are you sure you want to deploy production?".to_string()]
        );
    }

    /// Test: confirmed production deploy syncs then installs supervisor config.
    #[tokio::test]
    async fn confirmed_production_syncs_and_installs_config() {
        let log = CallLog::default();
        let executor = RecordingExecutor::new(&log);
        let synchronizer = RecordingSynchronizer::new(&log);
        let confirmer = ScriptedConfirmer::yes();
        let output = quiet();
        let deployer = Deployer::new(&executor, &synchronizer, &confirmer, &output);

        deployer
            .deploy(&context(Environment::Production))
            .await
            .unwrap();

        let syncs = log.syncs();
        assert_eq!(syncs.len(), 1);
        assert_eq!(
            syncs[0].remote_dir.as_str(),
            "/home/ubuntu/testapp/www/production"
        );
        assert_eq!(log.commands().len(), 1);
        assert!(log.commands()[0].contains("/etc/supervisord.conf"));
    }

    /// Test: staging deploys without asking.
    #[tokio::test]
    async fn staging_never_prompts() {
        let log = CallLog::default();
        let executor = RecordingExecutor::new(&log);
        let synchronizer = RecordingSynchronizer::new(&log);
        let confirmer = ScriptedConfirmer::no();
        let output = quiet();
        let deployer = Deployer::new(&executor, &synchronizer, &confirmer, &output);

        deployer.deploy(&context(Environment::Staging)).await.unwrap();

        assert!(confirmer.prompts().is_empty());
        assert_eq!(log.syncs().len(), 1);
    }

    /// Test: the sync request keeps remote-only files and omits directory times.
    #[tokio::test]
    async fn sync_request_shape() {
        let log = CallLog::default();
        let executor = RecordingExecutor::new(&log);
        let synchronizer = RecordingSynchronizer::new(&log);
        let confirmer = ScriptedConfirmer::yes();
        let output = quiet();
        let deployer = Deployer::new(&executor, &synchronizer, &confirmer, &output);

        deployer.deploy(&context(Environment::Staging)).await.unwrap();

        let request = &log.syncs()[0];
        assert!(!request.delete);
        assert_eq!(request.extra_opts, vec!["--omit-dir-times".to_string()]);
        assert_eq!(request.local_dir.to_str(), Some("/work/testapp"));
        assert!(request.excludes.patterns().iter().any(|p| p == "local_settings.py"));
    }
}

mod sync_failure {
    use super::*;

    /// Test: a failed sync ends deploy before the supervisor config is copied.
    #[tokio::test]
    async fn deploy_stops_before_supervisor_config() {
        let log = CallLog::default();
        let executor = RecordingExecutor::new(&log);
        let synchronizer = RecordingSynchronizer::failing(&log);
        let confirmer = ScriptedConfirmer::yes();
        let output = quiet();
        let deployer = Deployer::new(&executor, &synchronizer, &confirmer, &output);

        let err = deployer
            .deploy(&context(Environment::Staging))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            Error::Sync(SyncError::Failed { exit_code: Some(12), .. })
        ));
        assert_eq!(log.syncs().len(), 1);
        assert!(log.commands().is_empty());
    }

    /// Test: a failed sync during bootstrap skips the requirements install.
    #[tokio::test]
    async fn bootstrap_stops_before_requirements() {
        let log = CallLog::default();
        let executor = RecordingExecutor::new(&log);
        let synchronizer = RecordingSynchronizer::failing(&log);
        let confirmer = ScriptedConfirmer::yes();
        let output = quiet();
        let deployer = Deployer::new(&executor, &synchronizer, &confirmer, &output);

        let err = deployer
            .bootstrap(&context(Environment::Staging))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Sync(_)));
        assert!(matches!(log.calls().last(), Some(Call::Sync(_))));
        let commands = log.commands();
        assert_eq!(commands.len(), 3, "mkdir, mkdir, virtualenv only");
        assert!(!commands.iter().any(|c| c.contains("pip install")));
        assert!(!commands.iter().any(|c| c.contains("supervisord")));
    }
}

mod dispatch {
    use super::*;

    /// Test: run() dispatches each operation to its own steps.
    #[tokio::test]
    async fn run_dispatches_single_operations() {
        let log = CallLog::default();
        let executor = RecordingExecutor::new(&log);
        let synchronizer = RecordingSynchronizer::new(&log);
        let confirmer = ScriptedConfirmer::yes();
        let output = quiet();
        let deployer = Deployer::new(&executor, &synchronizer, &confirmer, &output);
        let ctx = context(Environment::Staging);

        deployer.run(&ctx, Operation::CreateVirtualenv).await.unwrap();
        deployer.run(&ctx, Operation::UpdateRequirements).await.unwrap();

        let commands = log.commands();
        assert_eq!(commands.len(), 2);
        assert!(commands[0].starts_with("virtualenv "));
        assert!(commands[1].contains("pip install"));
        assert!(log.syncs().is_empty());
    }
}
