// ABOUTME: Structured remote command descriptors.
// ABOUTME: Arguments stay a list until rendering, where each one is single-quoted.

use crate::types::RemotePath;
use std::fmt;

/// Privilege a remote command runs with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Privilege {
    /// The deployment user.
    User,
    /// Root via non-interactive `sudo`.
    Sudo,
}

/// A program invocation to run on every host of an environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteCommand {
    program: String,
    args: Vec<String>,
    cwd: Option<RemotePath>,
    privilege: Privilege,
}

impl RemoteCommand {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
            privilege: Privilege::User,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Run from `dir` instead of the login directory.
    pub fn current_dir(mut self, dir: &RemotePath) -> Self {
        self.cwd = Some(dir.clone());
        self
    }

    /// Run as root with `sudo -n`. Hosts need passwordless sudo for the
    /// deployment user; a password prompt fails the command instead of hanging.
    pub fn sudo(mut self) -> Self {
        self.privilege = Privilege::Sudo;
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn get_args(&self) -> &[String] {
        &self.args
    }

    pub fn get_current_dir(&self) -> Option<&RemotePath> {
        self.cwd.as_ref()
    }

    pub fn privilege(&self) -> Privilege {
        self.privilege
    }

    /// Render as a POSIX shell command line.
    pub fn to_shell(&self) -> String {
        let mut line = String::new();
        if let Some(dir) = &self.cwd {
            line.push_str("cd ");
            line.push_str(&shell_quote(dir.as_str()));
            line.push_str(" && ");
        }
        if self.privilege == Privilege::Sudo {
            line.push_str("sudo -n -- ");
        }
        line.push_str(&shell_quote(&self.program));
        for arg in &self.args {
            line.push(' ');
            line.push_str(&shell_quote(arg));
        }
        line
    }
}

impl fmt::Display for RemoteCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_shell())
    }
}

/// Quote a word for a POSIX shell. Plain words are left alone for readable logs.
pub fn shell_quote(s: &str) -> String {
    let plain = !s.is_empty()
        && s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '/' | '.' | '_' | '-' | '=' | ':' | ','));
    if plain {
        s.to_string()
    } else {
        format!("'{}'", s.replace('\'', "'\\''"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_plain_command() {
        let cmd = RemoteCommand::new("mkdir").arg("-p").arg("/home/ubuntu/testapp/www/staging");
        assert_eq!(cmd.to_shell(), "mkdir -p /home/ubuntu/testapp/www/staging");
    }

    #[test]
    fn renders_cwd_and_sudo() {
        let cmd = RemoteCommand::new("cp")
            .args(["./configs/_supervisord.conf", "/etc/supervisord.conf"])
            .current_dir(&RemotePath::new("/srv/app"))
            .sudo();
        assert_eq!(
            cmd.to_shell(),
            "cd /srv/app && sudo -n -- cp ./configs/_supervisord.conf /etc/supervisord.conf"
        );
    }

    #[test]
    fn quotes_shell_metacharacters() {
        let cmd = RemoteCommand::new("mkdir").arg("/tmp/x; rm -rf /");
        assert_eq!(cmd.to_shell(), "mkdir '/tmp/x; rm -rf /'");
    }

    #[test]
    fn quotes_embedded_single_quotes() {
        assert_eq!(shell_quote("it's"), r"'it'\''s'");
        assert_eq!(shell_quote(""), "''");
        assert_eq!(shell_quote("$HOME"), "'$HOME'");
    }
}
