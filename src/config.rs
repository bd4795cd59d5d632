//! Process configuration read from the environment (and `.env`, via dotenv).

use std::env;
use std::net::SocketAddr;
use std::str::FromStr;

use thiserror::Error;

const DEFAULT_HYPER_ADDR: &str = "127.0.0.1:8000";
const DEFAULT_AXUM_ADDR: &str = "127.0.0.1:8001";
const DEFAULT_POOL_SIZE: u32 = 4;

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub database_url: String,
    /// Listener for the hand-routed hyper API.
    pub hyper_addr: SocketAddr,
    /// Listener for the axum API and `/graphql`.
    pub axum_addr: SocketAddr,
    pub pool_size: u32,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL")
            .filter(|url| !url.trim().is_empty())
            .ok_or(ConfigError::Missing("DATABASE_URL"))?;

        Ok(Config {
            database_url,
            hyper_addr: parse_or(&lookup, "HYPER_ADDR", DEFAULT_HYPER_ADDR)?,
            axum_addr: parse_or(&lookup, "AXUM_ADDR", DEFAULT_AXUM_ADDR)?,
            pool_size: match lookup("DB_POOL_SIZE") {
                Some(raw) => match raw.parse::<u32>() {
                    Ok(size) if size > 0 => size,
                    _ => {
                        return Err(ConfigError::Invalid {
                            key: "DB_POOL_SIZE",
                            value: raw,
                        })
                    }
                },
                None => DEFAULT_POOL_SIZE,
            },
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: &str) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    let raw = lookup(key).unwrap_or_else(|| default.to_string());
    raw.parse()
        .map_err(|_| ConfigError::Invalid { key, value: raw })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_only_database_url_is_set() {
        let config = Config::from_lookup(lookup(&[("DATABASE_URL", "todos.db")])).unwrap();
        assert_eq!(config.database_url, "todos.db");
        assert_eq!(config.hyper_addr, "127.0.0.1:8000".parse().unwrap());
        assert_eq!(config.axum_addr, "127.0.0.1:8001".parse().unwrap());
        assert_eq!(config.pool_size, 4);
    }

    #[test]
    fn database_url_is_required() {
        let err = Config::from_lookup(lookup(&[])).unwrap_err();
        assert_eq!(err, ConfigError::Missing("DATABASE_URL"));

        let err = Config::from_lookup(lookup(&[("DATABASE_URL", "  ")])).unwrap_err();
        assert_eq!(err, ConfigError::Missing("DATABASE_URL"));
    }

    #[test]
    fn overrides_are_parsed() {
        let config = Config::from_lookup(lookup(&[
            ("DATABASE_URL", ":memory:"),
            ("HYPER_ADDR", "0.0.0.0:9000"),
            ("AXUM_ADDR", "0.0.0.0:9001"),
            ("DB_POOL_SIZE", "8"),
        ]))
        .unwrap();
        assert_eq!(config.hyper_addr.port(), 9000);
        assert_eq!(config.axum_addr.port(), 9001);
        assert_eq!(config.pool_size, 8);
    }

    #[test]
    fn bad_address_is_rejected() {
        let err = Config::from_lookup(lookup(&[
            ("DATABASE_URL", "todos.db"),
            ("HYPER_ADDR", "localhost"),
        ]))
        .unwrap_err();
        assert_eq!(
            err,
            ConfigError::Invalid {
                key: "HYPER_ADDR",
                value: "localhost".to_string()
            }
        );
    }

    #[test]
    fn zero_pool_size_is_rejected() {
        let err = Config::from_lookup(lookup(&[
            ("DATABASE_URL", "todos.db"),
            ("DB_POOL_SIZE", "0"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "DB_POOL_SIZE", .. }));
    }
}
