//! Collection endpoints: `/cities` and `/cities/{id}`.

use std::sync::Arc;

use axum::Router;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::get;
use tokio::sync::RwLock;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::cities::types::{City, CityId, NewCity};

/// In-memory city table. Ids are assigned as `max numeric id + 1`.
#[derive(Debug, Default)]
pub struct CityTable {
    cities: Vec<City>,
}

impl CityTable {
    #[must_use]
    pub fn new(cities: Vec<City>) -> Self {
        Self { cities }
    }

    #[must_use]
    pub fn list(&self) -> &[City] {
        &self.cities
    }

    #[must_use]
    pub fn get(&self, id: &CityId) -> Option<&City> {
        self.cities.iter().find(|city| &city.id == id)
    }

    pub fn insert(&mut self, new_city: NewCity) -> City {
        let next = self
            .cities
            .iter()
            .filter_map(|city| city.id.as_number())
            .max()
            .map_or(1, |max| max + 1);
        let city = new_city.with_id(CityId::from(next));
        self.cities.push(city.clone());
        city
    }

    /// Remove by id. Returns `false` when no city matched.
    pub fn remove(&mut self, id: &CityId) -> bool {
        let before = self.cities.len();
        self.cities.retain(|city| &city.id != id);
        self.cities.len() != before
    }
}

/// Shared backend state, injected into handlers via the `State` extractor.
#[derive(Clone, Default)]
pub struct BackendState {
    pub table: Arc<RwLock<CityTable>>,
}

impl BackendState {
    #[must_use]
    pub fn new(cities: Vec<City>) -> Self {
        Self { table: Arc::new(RwLock::new(CityTable::new(cities))) }
    }
}

/// Router implementing the city collection contract.
pub fn app(state: BackendState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/cities", get(list_cities).post(create_city))
        .route("/cities/{id}", get(get_city).delete(delete_city))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// `GET /cities` — full collection in insertion order.
async fn list_cities(State(state): State<BackendState>) -> Json<Vec<City>> {
    let table = state.table.read().await;
    Json(table.list().to_vec())
}

/// `GET /cities/:id` — one city.
async fn get_city(State(state): State<BackendState>, Path(id): Path<String>) -> Result<Json<City>, StatusCode> {
    let id = CityId::new(id);
    let table = state.table.read().await;
    table.get(&id).cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}

/// `POST /cities` — create and echo with the assigned id.
async fn create_city(
    State(state): State<BackendState>,
    Json(body): Json<NewCity>,
) -> (StatusCode, Json<City>) {
    let city = state.table.write().await.insert(body);
    info!(id = %city.id, city = %city.city_name, "backend: city created");
    (StatusCode::CREATED, Json(city))
}

/// `DELETE /cities/:id` — remove one city.
async fn delete_city(
    State(state): State<BackendState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    let id = CityId::new(id);
    if !state.table.write().await.remove(&id) {
        return Err(StatusCode::NOT_FOUND);
    }
    info!(%id, "backend: city deleted");
    Ok(Json(serde_json::json!({})))
}
