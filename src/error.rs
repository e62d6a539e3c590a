// ABOUTME: Application-wide error types for stagehand.
// ABOUTME: Uses thiserror for ergonomic error handling.

use crate::context::Environment;
use crate::remote::RemoteError;
use crate::sync::SyncError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("configuration file not found: {0}")]
    ConfigNotFound(PathBuf),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("no servers configured for environment '{0}' (missing key servers.{0})")]
    UnknownEnvironment(String),

    #[error("unknown task: {0}")]
    UnknownTask(String),

    #[error(
        "required context field not set: {field} (provided by staging, production); \
         select an environment before '{task}'"
    )]
    Precondition { task: String, field: &'static str },

    #[error("{} deployment aborted.", .0.title())]
    UserAbort(Environment),

    #[error("confirmation prompt failed: {0}")]
    Prompt(String),

    #[error(transparent)]
    Remote(#[from] RemoteError),

    #[error(transparent)]
    Sync(#[from] SyncError),

    #[error("SSH error: {0}")]
    Ssh(#[from] crate::ssh::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl Error {
    /// Whether this error stems from the configuration file or its contents.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Error::ConfigNotFound(_)
                | Error::InvalidConfig(_)
                | Error::UnknownEnvironment(_)
                | Error::Yaml(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
