//! Visited-city collection synced with the remote JSON endpoint.
//!
//! DESIGN
//! ======
//! `types` holds the wire records, `state` the pure reducer, `api` the
//! transport seam, and `store` ties them together as the single writer.

pub mod api;
pub mod state;
pub mod store;
pub mod types;

pub use api::{CityApi, HttpCityApi};
pub use state::{CitiesAction, CollectionState};
pub use store::RemoteCityStore;
pub use types::{City, CityError, CityId, NewCity, Position};
