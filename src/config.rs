use crate::error::{AssignError, Result};
use log::{debug, warn};
use std::env;
use std::net::SocketAddr;
use std::time::Duration;

pub const BIND_ADDR_VAR: &str = "SHIFT_ASSIGNER_BIND_ADDR";
pub const SEARCH_BUDGET_VAR: &str = "SHIFT_ASSIGNER_SEARCH_BUDGET_MS";

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";
const DEFAULT_SEARCH_BUDGET_MS: u64 = 8_000;

/// Knobs for a single engine run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Wall-clock budget for the backtracking search.
    pub search_budget: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            search_budget: Duration::from_millis(DEFAULT_SEARCH_BUDGET_MS),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    pub engine: EngineConfig,
    pub server: ServerConfig,
}

impl Config {
    /// Reads configuration from the environment, loading `.env` first if present.
    pub fn from_env() -> Result<Self> {
        if let Some(e) = env_file_problem(dotenv::dotenv()) {
            warn!("Ignoring unreadable .env file: {}", e);
        }
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds configuration from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let bind_addr = lookup(BIND_ADDR_VAR).unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr: SocketAddr = bind_addr.trim().parse().map_err(|e| {
            AssignError::Config(format!("{BIND_ADDR_VAR}='{bind_addr}' is not a socket address: {e}"))
        })?;

        let budget_ms = match lookup(SEARCH_BUDGET_VAR) {
            Some(raw) => raw.trim().parse::<u64>().map_err(|e| {
                AssignError::Config(format!("{SEARCH_BUDGET_VAR}='{raw}' is not a millisecond count: {e}"))
            })?,
            None => DEFAULT_SEARCH_BUDGET_MS,
        };

        let config = Config {
            engine: EngineConfig {
                search_budget: Duration::from_millis(budget_ms),
            },
            server: ServerConfig { bind_addr },
        };
        debug!("Loaded configuration: {:?}", config);
        Ok(config)
    }
}

/// A missing `.env` is normal; anything else about it is worth reporting.
fn env_file_problem<T>(loaded: dotenv::Result<T>) -> Option<dotenv::Error> {
    match loaded {
        Ok(_) => None,
        Err(e) if e.not_found() => None,
        Err(e) => Some(e),
    }
}
