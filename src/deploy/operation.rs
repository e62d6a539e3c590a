// ABOUTME: The four deployment operations that run against a selected environment.
// ABOUTME: Names match the CLI task names.

use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Bootstrap,
    CreateVirtualenv,
    Deploy,
    UpdateRequirements,
}

impl Operation {
    pub const ALL: [Operation; 4] = [
        Operation::Bootstrap,
        Operation::CreateVirtualenv,
        Operation::Deploy,
        Operation::UpdateRequirements,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Operation::Bootstrap => "bootstrap",
            Operation::CreateVirtualenv => "create_virtualenv",
            Operation::Deploy => "deploy",
            Operation::UpdateRequirements => "update_requirements",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Operation::Bootstrap => "initialize remote host environment (virtualenv, deploy, update)",
            Operation::CreateVirtualenv => "setup virtualenv on remote host",
            Operation::Deploy => "rsync code to remote host",
            Operation::UpdateRequirements => "update external dependencies on remote host",
        }
    }

    /// Context field the operation cannot run without.
    pub fn required_field(&self) -> &'static str {
        match self {
            Operation::Bootstrap | Operation::Deploy => "root",
            Operation::CreateVirtualenv => "virtualenv_root",
            Operation::UpdateRequirements => "code_root",
        }
    }
}

impl FromStr for Operation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operation::ALL
            .into_iter()
            .find(|op| op.name() == s)
            .ok_or_else(|| format!("unknown operation: {s}"))
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
