//! Process configuration read from the environment.

use std::env;
use std::str::FromStr;

use failure::Fail;

use crate::store::SAMANTHA_ID;

#[derive(Debug, Fail, PartialEq)]
pub enum ConfigError {
    #[fail(display = "Unknown GraphQL explorer {}", _0)]
    UnknownExplorer(String),
}

///
/// Interactive page served on a bare GET
///
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Explorer {
    GraphiQL,
    Playground,
}

impl Default for Explorer {
    fn default() -> Self {
        Explorer::GraphiQL
    }
}

impl FromStr for Explorer {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "graphiql" => Ok(Explorer::GraphiQL),
            "playground" => Ok(Explorer::Playground),
            _ => Err(ConfigError::UnknownExplorer(s.to_owned())),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// `EnvFilter` directives for the log subscriber
    pub log_filter: String,
    /// URL the explorer page sends its queries to
    pub endpoint: String,
    pub explorer: Explorer,
    /// subject reported by the stub identity provider
    pub current_user_id: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_filter: "info".into(),
            endpoint: "/".into(),
            explorer: Explorer::default(),
            current_user_id: SAMANTHA_ID.into(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let explorer = match lookup("GRAPHQL_EXPLORER") {
            Some(explorer) => explorer.parse()?,
            None => defaults.explorer,
        };
        Ok(Self {
            log_filter: lookup("RUST_LOG").unwrap_or(defaults.log_filter),
            endpoint: lookup("GRAPHQL_ENDPOINT").unwrap_or(defaults.endpoint),
            explorer,
            current_user_id: lookup("CURRENT_USER_ID").unwrap_or(defaults.current_user_id),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maplit::hashmap;

    #[test]
    fn empty_environment_gives_defaults() {
        assert_eq!(Config::from_lookup(|_| None), Ok(Config::default()));
    }

    #[test]
    fn reads_overrides() {
        let vars = hashmap! {
            "GRAPHQL_EXPLORER" => "Playground",
            "GRAPHQL_ENDPOINT" => "/prod/graphql",
            "CURRENT_USER_ID" => "someone",
        };
        let config = Config::from_lookup(|key| vars.get(key).map(|v| v.to_string())).unwrap();
        assert_eq!(config.explorer, Explorer::Playground);
        assert_eq!(config.endpoint, "/prod/graphql");
        assert_eq!(config.current_user_id, "someone");
        assert_eq!(config.log_filter, "info");
    }

    #[test]
    fn rejects_unknown_explorer() {
        let err = Config::from_lookup(|key| match key {
            "GRAPHQL_EXPLORER" => Some("altair".to_owned()),
            _ => None,
        })
        .unwrap_err();
        assert_eq!(err, ConfigError::UnknownExplorer("altair".into()));
    }
}
