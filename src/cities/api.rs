//! HTTP access to the remote city collection.
//!
//! Endpoint contract: `GET /cities`, `GET /cities/{id}`, `POST /cities`,
//! `DELETE /cities/{id}`, JSON bodies, no authentication headers.
//!
//! ERROR HANDLING
//! ==============
//! Transport failures map to `CityError::Network`, non-2xx statuses to
//! `CityError::Status`, and unparseable bodies to `CityError::Decode`.
//! Nothing is retried.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use serde::de::DeserializeOwned;

use super::types::{City, CityError, CityId, NewCity};
use crate::config::ClientConfig;

/// Transport seam for the city store. Enables mocking in tests.
#[async_trait::async_trait]
pub trait CityApi: Send + Sync {
    /// Fetch the full collection.
    ///
    /// # Errors
    ///
    /// Returns a [`CityError`] if the request fails or the body is malformed.
    async fn list(&self) -> Result<Vec<City>, CityError>;

    /// Fetch one city by id.
    ///
    /// # Errors
    ///
    /// Returns a [`CityError`] if the request fails or the body is malformed.
    async fn read(&self, id: &CityId) -> Result<City, CityError>;

    /// Create a city; the server echoes it back with its assigned id.
    ///
    /// # Errors
    ///
    /// Returns a [`CityError`] if the request fails or the body is malformed.
    async fn create(&self, city: &NewCity) -> Result<City, CityError>;

    /// Remove a city. The response body is ignored.
    ///
    /// # Errors
    ///
    /// Returns a [`CityError`] if the request fails.
    async fn delete(&self, id: &CityId) -> Result<(), CityError>;
}

fn collection_endpoint(base_url: &str) -> String {
    format!("{base_url}/cities")
}

fn city_endpoint(base_url: &str, id: &CityId) -> String {
    format!("{base_url}/cities/{id}")
}

fn decode_body<T: DeserializeOwned>(text: &str) -> Result<T, CityError> {
    serde_json::from_str(text).map_err(|e| CityError::Decode(e.to_string()))
}

// =============================================================================
// CLIENT
// =============================================================================

/// `reqwest`-backed implementation of [`CityApi`].
pub struct HttpCityApi {
    http: reqwest::Client,
    base_url: String,
}

impl HttpCityApi {
    /// Build a client for the configured base URL.
    ///
    /// # Errors
    ///
    /// Returns [`CityError::HttpClientBuild`] if the HTTP client cannot be built.
    pub fn new(config: &ClientConfig) -> Result<Self, CityError> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| CityError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, base_url: config.base_url.clone() })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<String, CityError> {
        let response = request
            .send()
            .await
            .map_err(|e| CityError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CityError::Status { status: status.as_u16() });
        }

        response
            .text()
            .await
            .map_err(|e| CityError::Network(e.to_string()))
    }
}

#[async_trait::async_trait]
impl CityApi for HttpCityApi {
    async fn list(&self) -> Result<Vec<City>, CityError> {
        let text = self.send(self.http.get(collection_endpoint(&self.base_url))).await?;
        decode_body(&text)
    }

    async fn read(&self, id: &CityId) -> Result<City, CityError> {
        let text = self.send(self.http.get(city_endpoint(&self.base_url, id))).await?;
        decode_body(&text)
    }

    async fn create(&self, city: &NewCity) -> Result<City, CityError> {
        let request = self.http.post(collection_endpoint(&self.base_url)).json(city);
        let text = self.send(request).await?;
        decode_body(&text)
    }

    async fn delete(&self, id: &CityId) -> Result<(), CityError> {
        self.send(self.http.delete(city_endpoint(&self.base_url, id))).await?;
        Ok(())
    }
}
