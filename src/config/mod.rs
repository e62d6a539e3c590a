// ABOUTME: Deployment configuration loaded from configs/server.yaml.
// ABOUTME: Maps environment names to host lists plus a few project-wide settings.

mod deserialize;
mod server;

pub use server::ServerConfig;

use crate::context::Environment;
use crate::error::{Error, Result};
use crate::types::ProjectName;
use deserialize::{deserialize_project_name, deserialize_server_map};
use nonempty::NonEmpty;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

/// Location of the configuration file, relative to the working directory.
pub const CONFIG_PATH: &str = "configs/server.yaml";

pub const DEFAULT_USER: &str = "ubuntu";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default, deserialize_with = "deserialize_project_name")]
    pub project: ProjectName,

    #[serde(default = "default_user")]
    pub user: String,

    /// Upper bound for a single remote command.
    #[serde(default = "default_command_timeout", with = "humantime_serde")]
    pub command_timeout: Duration,

    #[serde(deserialize_with = "deserialize_server_map")]
    pub servers: BTreeMap<String, NonEmpty<ServerConfig>>,
}

fn default_user() -> String {
    DEFAULT_USER.to_string()
}

fn default_command_timeout() -> Duration {
    Duration::from_secs(300)
}

impl Config {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(yaml)?;
        if config.user.trim().is_empty() {
            return Err(Error::InvalidConfig("user cannot be empty".to_string()));
        }
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(Error::ConfigNotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_yaml(&content)?;
        tracing::debug!(
            path = %path.display(),
            environments = config.servers.len(),
            "loaded configuration"
        );
        Ok(config)
    }

    /// Load the configuration from its fixed location under `dir`.
    pub fn discover(dir: &Path) -> Result<Self> {
        Self::load(&dir.join(CONFIG_PATH))
    }

    /// Host list for an environment (the `servers.<environment>` key).
    pub fn hosts(&self, environment: Environment) -> Result<&NonEmpty<ServerConfig>> {
        self.servers
            .get(environment.as_str())
            .ok_or_else(|| Error::UnknownEnvironment(environment.to_string()))
    }
}
