// ABOUTME: Environment selection and the resolved deployment context.
// ABOUTME: Every remote path and identifier is derived here, once, from project/user/environment.

mod environment;

pub use environment::Environment;

use crate::config::{Config, ServerConfig};
use crate::error::Result;
use crate::types::{ProjectName, RemotePath};
use nonempty::NonEmpty;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Parent of every deployment user's home directory.
const HOME_ROOT: &str = "/home";

/// Resolved parameters for one selected environment.
///
/// Built only through [`DeploymentContext::select`]; the derived paths have no
/// setters, so they always agree with `project`, `user` and `environment`.
#[derive(Debug, Clone)]
pub struct DeploymentContext {
    project: ProjectName,
    environment: Environment,
    user: String,
    home: RemotePath,
    root: RemotePath,
    code_root: RemotePath,
    virtualenv_root: RemotePath,
    log_dir: RemotePath,
    settings_module: String,
    hosts: NonEmpty<ServerConfig>,
    local_dir: PathBuf,
    command_timeout: Duration,
}

impl DeploymentContext {
    /// Select `environment`, reading its hosts from `servers.<environment>`.
    pub fn select(environment: Environment, config: &Config, local_dir: &Path) -> Result<Self> {
        let hosts = config.hosts(environment)?.clone();
        let project = config.project.clone();
        let user = config.user.clone();

        let home = RemotePath::new(HOME_ROOT)
            .join(&user)
            .join(project.as_str());
        let www = home.join("www");
        let root = www.join(environment.as_str());
        let code_root = root.clone();
        let virtualenv_root = root.join("env");
        let log_dir = www.join("log");
        let settings_module = settings_module(&project, environment);

        tracing::debug!(
            %environment,
            %root,
            hosts = hosts.len(),
            "selected environment"
        );

        Ok(Self {
            project,
            environment,
            user,
            home,
            root,
            code_root,
            virtualenv_root,
            log_dir,
            settings_module,
            hosts,
            local_dir: local_dir.to_path_buf(),
            command_timeout: config.command_timeout,
        })
    }

    pub fn project(&self) -> &ProjectName {
        &self.project
    }

    pub fn environment(&self) -> Environment {
        self.environment
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn home(&self) -> &RemotePath {
        &self.home
    }

    pub fn root(&self) -> &RemotePath {
        &self.root
    }

    pub fn code_root(&self) -> &RemotePath {
        &self.code_root
    }

    pub fn virtualenv_root(&self) -> &RemotePath {
        &self.virtualenv_root
    }

    pub fn log_dir(&self) -> &RemotePath {
        &self.log_dir
    }

    /// Django settings module for this environment.
    pub fn settings_module(&self) -> &str {
        &self.settings_module
    }

    pub fn hosts(&self) -> &NonEmpty<ServerConfig> {
        &self.hosts
    }

    pub fn local_dir(&self) -> &Path {
        &self.local_dir
    }

    pub fn command_timeout(&self) -> Duration {
        self.command_timeout
    }
}

pub fn settings_module(project: &ProjectName, environment: Environment) -> String {
    format!("{project}.settings_{environment}")
}
