//! Remote city store: keeps `CollectionState` in step with the server.
//!
//! DESIGN
//! ======
//! One store is built at startup and shared by cloning; clones see the same
//! state. Each operation dispatches `Loading`, awaits the request, then
//! dispatches exactly one terminal action. The state mutex is only taken
//! inside `dispatch`/`snapshot` and is never held across an await.
//!
//! Every failure lands in `error` through `Rejected`; `current_city` only
//! ever holds a city. `get_city` and `create_city` take a selection ticket,
//! including a `get_city` answered from the current city, so only the newest
//! selection writes `current_city` or a selection error. If the caller drops an operation before it resolves,
//! the in-flight guard dispatches `Abandoned` so loading still settles.

#[cfg(test)]
#[path = "store_test.rs"]
mod tests;

use std::sync::{Arc, Mutex, PoisonError};

use tracing::{debug, info, warn};

use super::api::CityApi;
use super::state::{CitiesAction, CollectionState, Ticket};
use super::types::{City, CityError, CityId, NewCity};

pub const LOAD_CITIES_FAILED: &str = "There was an error loading data...";
pub const LOAD_CITY_FAILED: &str = "There was an error loading the city...";
pub const CREATE_CITY_FAILED: &str = "There was an error creating the city...";
pub const DELETE_CITY_FAILED: &str = "There was an error deleting the city...";

#[derive(Clone)]
pub struct RemoteCityStore {
    api: Arc<dyn CityApi>,
    state: Arc<Mutex<CollectionState>>,
}

impl RemoteCityStore {
    #[must_use]
    pub fn new(api: Arc<dyn CityApi>) -> Self {
        Self { api, state: Arc::new(Mutex::new(CollectionState::default())) }
    }

    /// Copy of the current state for rendering.
    #[must_use]
    pub fn snapshot(&self) -> CollectionState {
        self.lock().clone()
    }

    /// Replace `cities` with the server's full collection.
    ///
    /// # Errors
    ///
    /// Returns the request error; `error` is set and `cities` left unchanged.
    pub async fn load_all(&self) -> Result<(), CityError> {
        let request = self.begin(false);
        debug!("cities: loading collection");

        match self.api.list().await {
            Ok(cities) => {
                info!(count = cities.len(), "cities: collection loaded");
                request.settle(CitiesAction::CitiesLoaded(cities));
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "cities: collection load failed");
                request.settle(CitiesAction::Rejected { ticket: None, message: LOAD_CITIES_FAILED.to_owned() });
                Err(e)
            }
        }
    }

    /// Select a city by id, fetching it unless it is already current.
    ///
    /// # Errors
    ///
    /// Returns the request error; `error` is set and `current_city` kept.
    pub async fn get_city(&self, id: &CityId) -> Result<City, CityError> {
        let request = {
            let mut state = self.lock();
            if let Some(current) = state.current_city.clone().filter(|city| &city.id == id) {
                debug!(%id, "cities: already current, skipping fetch");
                let ticket = state.latest_ticket().next();
                state.apply(CitiesAction::Reselected { ticket });
                return Ok(current);
            }
            RemoteCityStore::start(&mut state, true)
        };
        let request = InFlight::new(self, request);
        debug!(%id, "cities: loading city");

        match self.api.read(id).await {
            Ok(city) => {
                let ticket = request.ticket;
                request.settle(CitiesAction::CityLoaded { ticket, city: city.clone() });
                Ok(city)
            }
            Err(e) => {
                warn!(%id, error = %e, "cities: city load failed");
                let ticket = Some(request.ticket);
                request.settle(CitiesAction::Rejected { ticket, message: LOAD_CITY_FAILED.to_owned() });
                Err(e)
            }
        }
    }

    /// Create a city, append the server echo, and select it.
    ///
    /// # Errors
    ///
    /// Returns the request error; `error` is set and `cities` left unchanged.
    pub async fn create_city(&self, new_city: NewCity) -> Result<City, CityError> {
        let request = self.begin(true);
        debug!(city = %new_city.city_name, "cities: creating city");

        match self.api.create(&new_city).await {
            Ok(city) => {
                info!(id = %city.id, city = %city.city_name, "cities: city created");
                let ticket = request.ticket;
                request.settle(CitiesAction::CityCreated { ticket, city: city.clone() });
                Ok(city)
            }
            Err(e) => {
                warn!(city = %new_city.city_name, error = %e, "cities: city create failed");
                let ticket = Some(request.ticket);
                request.settle(CitiesAction::Rejected { ticket, message: CREATE_CITY_FAILED.to_owned() });
                Err(e)
            }
        }
    }

    /// Remove a city from the server and from `cities`.
    ///
    /// `current_city` is left as is, even when it is the deleted record.
    ///
    /// # Errors
    ///
    /// Returns the request error; `error` is set and `cities` left unchanged.
    pub async fn delete_city(&self, id: &CityId) -> Result<(), CityError> {
        let request = self.begin(false);
        debug!(%id, "cities: deleting city");

        match self.api.delete(id).await {
            Ok(()) => {
                info!(%id, "cities: city deleted");
                request.settle(CitiesAction::CityDeleted(id.clone()));
                Ok(())
            }
            Err(e) => {
                warn!(%id, error = %e, "cities: city delete failed");
                request.settle(CitiesAction::Rejected { ticket: None, message: DELETE_CITY_FAILED.to_owned() });
                Err(e)
            }
        }
    }

    fn begin(&self, selects: bool) -> InFlight<'_> {
        let ticket = RemoteCityStore::start(&mut self.lock(), selects);
        InFlight::new(self, ticket)
    }

    /// Dispatch `Loading`, issuing a fresh ticket for selecting requests.
    fn start(state: &mut CollectionState, selects: bool) -> Ticket {
        let ticket = state.latest_ticket().next();
        state.apply(CitiesAction::Loading { ticket: selects.then_some(ticket) });
        ticket
    }

    fn dispatch(&self, action: CitiesAction) {
        self.lock().apply(action);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, CollectionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// An outstanding request. Settles exactly once, on `settle` or on drop.
struct InFlight<'a> {
    store: &'a RemoteCityStore,
    ticket: Ticket,
    settled: bool,
}

impl<'a> InFlight<'a> {
    fn new(store: &'a RemoteCityStore, ticket: Ticket) -> Self {
        Self { store, ticket, settled: false }
    }

    fn settle(mut self, action: CitiesAction) {
        self.settled = true;
        self.store.dispatch(action);
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.settled {
            debug!("cities: request abandoned");
            self.store.dispatch(CitiesAction::Abandoned);
        }
    }
}
