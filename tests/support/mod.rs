// ABOUTME: Test support utilities.
// ABOUTME: Recording stubs for the executor and synchronizer, a scripted confirmer, and fixtures.

use async_trait::async_trait;
use parking_lot::Mutex;
use stagehand::config::Config;
use stagehand::confirm::Confirmer;
use stagehand::context::{DeploymentContext, Environment};
use stagehand::remote::{HostOutput, RemoteCommand, RemoteError, RemoteExecutor};
use stagehand::sync::{FileSynchronizer, SyncError, SyncRequest};
use std::path::Path;
use std::sync::Arc;
use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for tests. Safe to call multiple times.
#[allow(dead_code)]
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::EnvFilter;
        let filter = EnvFilter::from_default_env()
            .add_directive("stagehand=debug".parse().unwrap());
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init()
            .ok();
    });
}

pub const CONFIG_YAML: &str = r#"
servers:
  staging:
    - stage1.example.com
  production:
    - prod1.example.com
    - deploy@prod2.example.com:2222
"#;

#[allow(dead_code)]
pub fn config() -> Config {
    Config::from_yaml(CONFIG_YAML).unwrap()
}

#[allow(dead_code)]
pub fn context(environment: Environment) -> DeploymentContext {
    DeploymentContext::select(environment, &config(), Path::new("/work/testapp")).unwrap()
}

/// A call made to one of the recording stubs, in the order it happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Run(String),
    Sync(SyncRequest),
}

/// Shared, ordered log of calls across executor and synchronizer.
#[derive(Debug, Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<Call>>>);

#[allow(dead_code)]
impl CallLog {
    pub fn calls(&self) -> Vec<Call> {
        self.0.lock().clone()
    }

    pub fn commands(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Run(line) => Some(line),
                Call::Sync(_) => None,
            })
            .collect()
    }

    pub fn syncs(&self) -> Vec<SyncRequest> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Sync(request) => Some(request),
                Call::Run(_) => None,
            })
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.0.lock().is_empty()
    }

    fn push(&self, call: Call) {
        self.0.lock().push(call);
    }
}

/// Records every command; fails the first one whose program matches `fail_on`.
pub struct RecordingExecutor {
    log: CallLog,
    fail_on: Option<String>,
}

#[allow(dead_code)]
impl RecordingExecutor {
    pub fn new(log: &CallLog) -> Self {
        Self {
            log: log.clone(),
            fail_on: None,
        }
    }

    pub fn failing_on(log: &CallLog, program: &str) -> Self {
        Self {
            log: log.clone(),
            fail_on: Some(program.to_string()),
        }
    }
}

#[async_trait]
impl RemoteExecutor for RecordingExecutor {
    async fn run(&self, command: &RemoteCommand) -> Result<Vec<HostOutput>, RemoteError> {
        let line = command.to_shell();
        self.log.push(Call::Run(line.clone()));
        if self.fail_on.as_deref() == Some(command.program()) {
            return Err(RemoteError::CommandFailed {
                host: "stage1.example.com".to_string(),
                command: line,
                exit_code: 1,
                stderr: "simulated failure".to_string(),
            });
        }
        Ok(vec![HostOutput {
            host: "stage1.example.com".to_string(),
            stdout: String::new(),
            stderr: String::new(),
        }])
    }
}

/// Records every sync request; when `failing`, each one fails like a broken rsync.
pub struct RecordingSynchronizer {
    log: CallLog,
    failing: bool,
}

#[allow(dead_code)]
impl RecordingSynchronizer {
    pub fn new(log: &CallLog) -> Self {
        Self {
            log: log.clone(),
            failing: false,
        }
    }

    pub fn failing(log: &CallLog) -> Self {
        Self {
            log: log.clone(),
            failing: true,
        }
    }
}

#[async_trait]
impl FileSynchronizer for RecordingSynchronizer {
    async fn sync(&self, request: &SyncRequest) -> Result<(), SyncError> {
        self.log.push(Call::Sync(request.clone()));
        if self.failing {
            return Err(SyncError::Failed {
                host: "stage1.example.com".to_string(),
                exit_code: Some(12),
                stderr: "rsync: connection unexpectedly closed".to_string(),
            });
        }
        Ok(())
    }
}

/// Answers confirmation prompts from a script and remembers the prompts.
pub struct ScriptedConfirmer {
    answer: bool,
    prompts: Mutex<Vec<String>>,
}

#[allow(dead_code)]
impl ScriptedConfirmer {
    pub fn yes() -> Self {
        Self {
            answer: true,
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn no() -> Self {
        Self {
            answer: false,
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().clone()
    }
}

impl Confirmer for ScriptedConfirmer {
    fn confirm(&self, prompt: &str, default: bool) -> stagehand::error::Result<bool> {
        assert!(!default, "guarded prompts must default to no");
        self.prompts.lock().push(prompt.to_string());
        Ok(self.answer)
    }
}
