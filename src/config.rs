// src/config.rs
use std::env;
use std::net::{IpAddr, SocketAddr};

use thiserror::Error;

use crate::ballot::{Ballot, DEFAULT_ABSTAIN_OPTIONS, DEFAULT_CANDIDATES};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} must be a valid {expected}, got `{value}`")]
    Invalid {
        name: &'static str,
        expected: &'static str,
        value: String,
    },

    #[error("{0} must list at least one entry")]
    EmptyList(&'static str),
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// `None` runs the service on the in-memory store.
    pub database: Option<DatabaseConfig>,
    pub listen_addr: SocketAddr,
    pub ballot: Ballot,
    /// Tokens provisioned at startup when running on the in-memory store.
    pub seed_tokens: Vec<String>,
}

impl AppConfig {
    /// Loads `.env` if present, then reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database = match lookup("DATABASE_URL").filter(|url| !url.is_empty()) {
            Some(url) => Some(DatabaseConfig {
                url,
                max_connections: parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", "number", 5)?,
                acquire_timeout_secs: parse_or(
                    &lookup,
                    "DATABASE_ACQUIRE_TIMEOUT_SECS",
                    "number",
                    3,
                )?,
            }),
            None => None,
        };

        let host: IpAddr = parse_or(&lookup, "HOST", "IP address", IpAddr::from([0, 0, 0, 0]))?;
        let port: u16 = parse_or(&lookup, "PORT", "port number", 3030)?;

        let candidates = list_or(&lookup, "POLL_CANDIDATES", &DEFAULT_CANDIDATES);
        if candidates.is_empty() {
            return Err(ConfigError::EmptyList("POLL_CANDIDATES"));
        }
        let abstain_options = list_or(&lookup, "POLL_ABSTAIN_OPTIONS", &DEFAULT_ABSTAIN_OPTIONS);

        Ok(AppConfig {
            database,
            listen_addr: SocketAddr::new(host, port),
            ballot: Ballot::new(candidates, abstain_options),
            seed_tokens: list_or(&lookup, "POLL_SEED_TOKENS", &[]),
        })
    }
}

fn parse_or<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    expected: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(name) {
        Some(value) => value.trim().parse().map_err(|_| ConfigError::Invalid {
            name,
            expected,
            value,
        }),
        None => Ok(default),
    }
}

fn list_or(lookup: &impl Fn(&str) -> Option<String>, name: &str, default: &[&str]) -> Vec<String> {
    match lookup(name) {
        Some(raw) => raw
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect(),
        None => default.iter().map(|s| s.to_string()).collect(),
    }
}
