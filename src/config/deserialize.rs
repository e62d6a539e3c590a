// ABOUTME: Custom serde deserializers for config types.
// ABOUTME: Handles project names and per-environment server lists.

use nonempty::NonEmpty;
use serde::Deserialize;
use serde::de::Error as _;
use std::collections::BTreeMap;

use super::ServerConfig;
use crate::types::ProjectName;

pub fn deserialize_project_name<'de, D>(deserializer: D) -> Result<ProjectName, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    ProjectName::new(&s).map_err(serde::de::Error::custom)
}

pub fn deserialize_server_map<'de, D>(
    deserializer: D,
) -> Result<BTreeMap<String, NonEmpty<ServerConfig>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw: BTreeMap<String, Vec<ServerEntry>> = BTreeMap::deserialize(deserializer)?;
    raw.into_iter()
        .map(|(environment, entries)| {
            let servers = entries
                .into_iter()
                .map(ServerEntry::into_server_config)
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| D::Error::custom(format!("servers.{environment}: {e}")))?;

            let servers = NonEmpty::from_vec(servers).ok_or_else(|| {
                D::Error::custom(format!(
                    "servers.{environment}: at least one server is required"
                ))
            })?;
            Ok((environment, servers))
        })
        .collect()
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ServerEntry {
    Simple(String),
    Detailed(ServerConfig),
}

impl ServerEntry {
    fn into_server_config(self) -> Result<ServerConfig, String> {
        match self {
            ServerEntry::Simple(s) => ServerConfig::parse(&s),
            ServerEntry::Detailed(c) => Ok(c),
        }
    }
}
