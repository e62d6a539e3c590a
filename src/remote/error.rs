// ABOUTME: Errors from running commands on remote hosts.
// ABOUTME: A non-zero exit on any host aborts the current operation.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("command `{command}` failed on {host} with exit code {exit_code}{}", stderr_suffix(.stderr))]
    CommandFailed {
        host: String,
        command: String,
        exit_code: u32,
        stderr: String,
    },

    #[error("{host}: {source}")]
    Session {
        host: String,
        #[source]
        source: crate::ssh::Error,
    },
}

fn stderr_suffix(stderr: &str) -> String {
    let stderr = stderr.trim();
    if stderr.is_empty() {
        String::new()
    } else {
        format!(": {stderr}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_failure_includes_stderr() {
        let err = RemoteError::CommandFailed {
            host: "web1".into(),
            command: "virtualenv --clear /srv/env".into(),
            exit_code: 2,
            stderr: "no such option\n".into(),
        };
        assert_eq!(
            err.to_string(),
            "command `virtualenv --clear /srv/env` failed on web1 with exit code 2: no such option"
        );
    }
}
