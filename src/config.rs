//! Configuration parsed from environment variables.

use std::path::PathBuf;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:8080";

/// Where the city store sends its requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
}

impl ClientConfig {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self { base_url: base_url.trim().trim_end_matches('/').to_string() }
    }

    /// Build client config from environment variables.
    ///
    /// Optional:
    /// - `WORLDWISE_BASE_URL`: collection endpoint base, default `http://localhost:8080`
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(env_or("WORLDWISE_BASE_URL", DEFAULT_BASE_URL))
    }

    /// Apply a command-line override when one was given.
    #[must_use]
    pub fn with_base_url(self, base_url: Option<String>) -> Self {
        match base_url {
            Some(url) => Self::new(url),
            None => self,
        }
    }
}

/// Settings for the development collection server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendConfig {
    pub listen_addr: String,
    pub seed_path: Option<PathBuf>,
}

impl BackendConfig {
    /// Build backend config from environment variables.
    ///
    /// Optional:
    /// - `WORLDWISE_LISTEN_ADDR`: default `127.0.0.1:8080`
    /// - `WORLDWISE_SEED_FILE`: JSON file with initial cities
    #[must_use]
    pub fn from_env() -> Self {
        let seed_path = match std::env::var("WORLDWISE_SEED_FILE") {
            Ok(path) if !path.trim().is_empty() => Some(PathBuf::from(path)),
            _ => None,
        };
        Self { listen_addr: env_or("WORLDWISE_LISTEN_ADDR", DEFAULT_LISTEN_ADDR), seed_path }
    }

    #[must_use]
    pub fn with_overrides(mut self, listen_addr: Option<String>, seed_path: Option<PathBuf>) -> Self {
        if let Some(addr) = listen_addr {
            self.listen_addr = addr;
        }
        if seed_path.is_some() {
            self.seed_path = seed_path;
        }
        self
    }
}

fn env_or(key: &str, default: &str) -> String {
    match std::env::var(key) {
        Ok(value) if !value.trim().is_empty() => value,
        _ => default.to_string(),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
