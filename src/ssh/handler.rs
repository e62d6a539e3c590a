// ABOUTME: russh client handler that verifies server host keys.
// ABOUTME: Checks known_hosts and optionally records unknown hosts (trust on first use).

use russh::client;
use russh::keys::known_hosts::{
    check_known_hosts, check_known_hosts_path, learn_known_hosts, learn_known_hosts_path,
};
use russh::keys::ssh_key;
use std::path::PathBuf;

pub(crate) struct HostKeyVerifier {
    pub(crate) host: String,
    pub(crate) port: u16,
    pub(crate) trust_on_first_use: bool,
    pub(crate) known_hosts_path: Option<PathBuf>,
}

impl HostKeyVerifier {
    fn check(&self, key: &ssh_key::PublicKey) -> Result<bool, russh::keys::Error> {
        match &self.known_hosts_path {
            Some(path) => check_known_hosts_path(&self.host, self.port, key, path),
            None => check_known_hosts(&self.host, self.port, key),
        }
    }

    fn learn(&self, key: &ssh_key::PublicKey) -> Result<(), russh::keys::Error> {
        match &self.known_hosts_path {
            Some(path) => learn_known_hosts_path(&self.host, self.port, key, path),
            None => learn_known_hosts(&self.host, self.port, key),
        }
    }
}

impl client::Handler for HostKeyVerifier {
    type Error = russh::Error;

    async fn check_server_key(
        &mut self,
        server_public_key: &ssh_key::PublicKey,
    ) -> Result<bool, Self::Error> {
        match self.check(server_public_key) {
            Ok(true) => Ok(true),
            Ok(false) if self.trust_on_first_use => {
                tracing::warn!(
                    host = %self.host,
                    port = self.port,
                    "accepting unknown host key (trust on first use)"
                );
                if let Err(e) = self.learn(server_public_key) {
                    tracing::warn!("failed to record host key in known_hosts: {e}");
                }
                Ok(true)
            }
            Ok(false) => {
                tracing::error!(host = %self.host, "host key not found in known_hosts");
                Ok(false)
            }
            Err(russh::keys::Error::KeyChanged { line }) => {
                tracing::error!(
                    host = %self.host,
                    line,
                    "host key does not match known_hosts entry"
                );
                Ok(false)
            }
            Err(e) => {
                tracing::debug!("known_hosts lookup failed: {e}");
                Ok(self.trust_on_first_use)
            }
        }
    }
}
