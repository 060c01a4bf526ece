//! Development collection server.
//!
//! DESIGN
//! ======
//! Stands in for the json-server the frontend was built against: the same
//! four endpoints, in-memory storage, optional seed file. Nothing is written
//! back to disk.


pub mod routes;

use std::path::Path;

use serde::Deserialize;

use crate::cities::types::City;
use crate::config::BackendConfig;

pub use routes::{BackendState, CityTable, app};

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("failed to bind {addr}: {source}")]
    Bind { addr: String, source: std::io::Error },
    #[error("server failed: {0}")]
    Serve(std::io::Error),
    #[error("failed to read seed file: {0}")]
    SeedRead(#[from] std::io::Error),
    #[error("invalid seed file: {0}")]
    SeedParse(#[from] serde_json::Error),
}

/// Seed file shapes: a json-server database or a bare array.
#[derive(Deserialize)]
#[serde(untagged)]
enum SeedFile {
    Database { cities: Vec<City> },
    Cities(Vec<City>),
}

/// Parse seed cities from JSON text.
///
/// # Errors
///
/// Returns [`BackendError::SeedParse`] if the text is neither shape.
pub fn parse_seed(text: &str) -> Result<Vec<City>, BackendError> {
    Ok(match serde_json::from_str::<SeedFile>(text)? {
        SeedFile::Database { cities } | SeedFile::Cities(cities) => cities,
    })
}

/// Read seed cities from a file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_seed(path: &Path) -> Result<Vec<City>, BackendError> {
    let text = std::fs::read_to_string(path)?;
    parse_seed(&text)
}

/// Bind the configured address and serve until the process exits.
///
/// # Errors
///
/// Returns an error if seeding, binding, or serving fails.
pub async fn serve(config: &BackendConfig) -> Result<(), BackendError> {
    let cities = match &config.seed_path {
        Some(path) => load_seed(path)?,
        None => Vec::new(),
    };
    let seeded = cities.len();

    let listener = tokio::net::TcpListener::bind(config.listen_addr.as_str())
        .await
        .map_err(|source| BackendError::Bind { addr: config.listen_addr.clone(), source })?;

    tracing::info!(addr = %config.listen_addr, seeded, "worldwise backend listening");
    axum::serve(listener, app(BackendState::new(cities)))
        .await
        .map_err(BackendError::Serve)
}
