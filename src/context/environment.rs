// ABOUTME: Named deployment targets.
// ABOUTME: Parsed from CLI task names and used as keys into the server map.

use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Environment {
    Staging,
    Production,
}

impl Environment {
    pub const ALL: [Environment; 2] = [Environment::Staging, Environment::Production];

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Staging => "staging",
            Environment::Production => "production",
        }
    }

    /// Capitalized name for user-facing messages.
    pub fn title(&self) -> &'static str {
        match self {
            Environment::Staging => "Staging",
            Environment::Production => "Production",
        }
    }

    /// Whether deployments to this environment need operator confirmation.
    pub fn requires_confirmation(&self) -> bool {
        matches!(self, Environment::Production)
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "staging" => Ok(Environment::Staging),
            "production" => Ok(Environment::Production),
            other => Err(format!(
                "unknown environment '{other}', expected one of: staging, production"
            )),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_str() {
        for env in Environment::ALL {
            assert_eq!(env.as_str().parse::<Environment>().unwrap(), env);
        }
    }

    #[test]
    fn only_production_is_guarded() {
        assert!(Environment::Production.requires_confirmation());
        assert!(!Environment::Staging.requires_confirmation());
    }

    #[test]
    fn unknown_name_is_rejected() {
        assert!("prod".parse::<Environment>().is_err());
    }
}
