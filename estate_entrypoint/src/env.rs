//! Typed runtime environment detection.

use std::fmt::Display;
use std::str::FromStr;

use thiserror::Error;

/// the env var the environment is read from
const ENVIRONMENT_VAR: &str = "ENVIRONMENT";

/// The current environment the application is running in
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// production
    Production,
    /// dev / staging
    Develop,
    /// running on localhost
    Local,
}

/// An error which can occur when constructing an [Environment]
#[derive(Debug, Error)]
pub enum EnvironmentErr {
    /// the env var was missing or unreadable
    #[error("could not read {ENVIRONMENT_VAR}: {0}")]
    VarErr(#[from] std::env::VarError),
    /// the value was not recognized
    #[error(transparent)]
    InvalidValue(#[from] UnknownValue),
}

impl Environment {
    /// read [Environment] from the process environment
    pub fn new_from_env() -> Result<Self, EnvironmentErr> {
        let raw = std::env::var(ENVIRONMENT_VAR)?;
        Ok(Self::from_str(&raw)?)
    }

    /// read the environment, assuming production when unset or invalid so
    /// a misconfigured deploy never gets the chatty local setup
    pub fn new_or_prod() -> Self {
        Self::new_from_env().unwrap_or(Environment::Production)
    }
}

impl Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Production => write!(f, "prod"),
            Environment::Develop => write!(f, "dev"),
            Environment::Local => write!(f, "local"),
        }
    }
}

/// a value which is not a recognized environment
#[derive(Debug, Error)]
#[error("could not convert {0} into an environment value")]
pub struct UnknownValue(String);

impl FromStr for Environment {
    type Err = UnknownValue;

    fn from_str(environment: &str) -> Result<Self, UnknownValue> {
        match environment {
            "prod" => Ok(Environment::Production),
            "dev" => Ok(Environment::Develop),
            "local" => Ok(Environment::Local),
            s => Err(UnknownValue(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_values() {
        assert_eq!("prod".parse::<Environment>().unwrap(), Environment::Production);
        assert_eq!("dev".parse::<Environment>().unwrap(), Environment::Develop);
        assert_eq!("local".parse::<Environment>().unwrap(), Environment::Local);
        assert!("staging".parse::<Environment>().is_err());
    }

    #[test]
    fn round_trips_display() {
        for env in [
            Environment::Production,
            Environment::Develop,
            Environment::Local,
        ] {
            assert_eq!(env.to_string().parse::<Environment>().unwrap(), env);
        }
    }
}
