// ABOUTME: Resolves a CLI task list into per-environment stages.
// ABOUTME: Enforces that operations only run after an environment was selected.

use super::Operation;
use crate::config::Config;
use crate::context::{DeploymentContext, Environment};
use crate::diagnostics::{Diagnostics, Warning};
use crate::error::{Error, Result};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// One CLI task: either an environment selector or an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    Select(Environment),
    Run(Operation),
}

impl Task {
    pub fn name(&self) -> &'static str {
        match self {
            Task::Select(env) => env.as_str(),
            Task::Run(op) => op.name(),
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Task::Select(_) => "use this environment on remote hosts",
            Task::Run(op) => op.description(),
        }
    }

    /// Every task, environment selectors first.
    pub fn all() -> impl Iterator<Item = Task> {
        Environment::ALL
            .into_iter()
            .map(Task::Select)
            .chain(Operation::ALL.into_iter().map(Task::Run))
    }
}

impl FromStr for Task {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if let Ok(env) = s.parse::<Environment>() {
            return Ok(Task::Select(env));
        }
        s.parse::<Operation>()
            .map(Task::Run)
            .map_err(|_| Error::UnknownTask(s.to_string()))
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Operations to run against one selected environment.
#[derive(Debug, Clone)]
pub struct Stage {
    pub context: DeploymentContext,
    pub operations: Vec<Operation>,
}

impl Stage {
    /// Whether any operation in this stage deploys to a guarded environment.
    pub fn requires_confirmation(&self) -> bool {
        self.context.environment().requires_confirmation()
            && self
                .operations
                .iter()
                .any(|op| matches!(op, Operation::Deploy | Operation::Bootstrap))
    }
}

/// An ordered task list as given on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskPlan {
    tasks: Vec<Task>,
}

impl TaskPlan {
    pub fn parse<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let tasks = names
            .into_iter()
            .map(|name| name.as_ref().parse())
            .collect::<Result<Vec<Task>>>()?;
        Ok(Self { tasks })
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Resolve the task list into stages without touching any remote host.
    ///
    /// A later selector replaces the current one; a selector with no
    /// operations after it is dropped with a warning. An operation before any
    /// selector is a precondition error.
    pub fn resolve(
        &self,
        config: &Config,
        local_dir: &Path,
        diag: &mut Diagnostics,
    ) -> Result<Vec<Stage>> {
        let mut stages = Vec::new();
        let mut current: Option<Stage> = None;

        for task in &self.tasks {
            match *task {
                Task::Select(environment) => {
                    if let Some(stage) = current.take() {
                        finish_stage(stage, &mut stages, diag);
                    }
                    current = Some(Stage {
                        context: DeploymentContext::select(environment, config, local_dir)?,
                        operations: Vec::new(),
                    });
                }
                Task::Run(operation) => match current.as_mut() {
                    Some(stage) => stage.operations.push(operation),
                    None => {
                        return Err(Error::Precondition {
                            task: operation.name().to_string(),
                            field: operation.required_field(),
                        });
                    }
                },
            }
        }

        if let Some(stage) = current {
            finish_stage(stage, &mut stages, diag);
        }
        Ok(stages)
    }
}

fn finish_stage(stage: Stage, stages: &mut Vec<Stage>, diag: &mut Diagnostics) {
    if stage.operations.is_empty() {
        diag.warn(Warning::unused_selection(format!(
            "environment '{}' selected but no operation followed it",
            stage.context.environment()
        )));
    } else {
        stages.push(stage);
    }
}
