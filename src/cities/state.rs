//! Mirrored city collection and its reducer.
//!
//! DESIGN
//! ======
//! All mutations go through `CollectionState::apply` with a `CitiesAction`.
//! The reducer does no I/O; `RemoteCityStore` performs requests and
//! dispatches the outcome.
//!
//! Loading is tracked as an in-flight count so overlapping requests cannot
//! clear each other's loading flag. Requests that replace the current city
//! carry a `Ticket`; a response or failure holding an older ticket than the
//! latest one issued leaves `current_city` and `error` alone. Re-selecting the
//! current city issues a ticket through `Reselected` without a request.

#[cfg(test)]
#[path = "state_test.rs"]
mod tests;

use std::collections::HashSet;

use super::types::{City, CityId};

/// Ordering token for requests that replace the current city.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

impl Ticket {
    #[must_use]
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

/// Every transition the collection can make.
#[derive(Debug, Clone, PartialEq)]
pub enum CitiesAction {
    /// A request is about to be sent. `ticket` is set for selecting requests.
    Loading { ticket: Option<Ticket> },
    /// The caller dropped an in-flight request before it resolved.
    Abandoned,
    /// The current city was selected again without a request.
    Reselected { ticket: Ticket },
    CitiesLoaded(Vec<City>),
    CityLoaded { ticket: Ticket, city: City },
    CityCreated { ticket: Ticket, city: City },
    CityDeleted(CityId),
    /// A request failed. `message` is user-facing; `ticket` is set for
    /// selecting requests.
    Rejected { ticket: Option<Ticket>, message: String },
}

/// Local mirror of the server-held city list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollectionState {
    /// Server response order, newly created cities appended.
    pub cities: Vec<City>,
    pub is_loading: bool,
    /// Most recently read or created city. Not necessarily in `cities`.
    pub current_city: Option<City>,
    pub error: Option<String>,
    in_flight: usize,
    latest_ticket: Ticket,
}

impl CollectionState {
    /// Number of requests started and not yet settled.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Ticket of the newest selecting request issued so far.
    #[must_use]
    pub fn latest_ticket(&self) -> Ticket {
        self.latest_ticket
    }

    /// `true` when `id` matches the current city.
    #[must_use]
    pub fn is_current(&self, id: &CityId) -> bool {
        self.current_city.as_ref().is_some_and(|city| &city.id == id)
    }

    /// Unique countries in first-seen order, paired with their flag emoji.
    #[must_use]
    pub fn countries(&self) -> Vec<(&str, &str)> {
        let mut seen = HashSet::new();
        self.cities
            .iter()
            .filter(|city| seen.insert(city.country.as_str()))
            .map(|city| (city.country.as_str(), city.emoji.as_str()))
            .collect()
    }

    pub fn apply(&mut self, action: CitiesAction) {
        match action {
            CitiesAction::Loading { ticket } => {
                self.in_flight += 1;
                self.error = None;
                if let Some(ticket) = ticket {
                    self.latest_ticket = self.latest_ticket.max(ticket);
                }
            }
            CitiesAction::Abandoned => {
                self.settle();
            }
            CitiesAction::Reselected { ticket } => {
                self.latest_ticket = self.latest_ticket.max(ticket);
            }
            CitiesAction::CitiesLoaded(cities) => {
                self.cities = cities;
                self.settle();
            }
            CitiesAction::CityLoaded { ticket, city } => {
                if ticket == self.latest_ticket {
                    self.current_city = Some(city);
                }
                self.settle();
            }
            CitiesAction::CityCreated { ticket, city } => {
                if ticket == self.latest_ticket {
                    self.current_city = Some(city.clone());
                }
                self.cities.push(city);
                self.settle();
            }
            CitiesAction::CityDeleted(id) => {
                if let Some(index) = self.cities.iter().position(|city| city.id == id) {
                    self.cities.remove(index);
                }
                self.settle();
            }
            CitiesAction::Rejected { ticket, message } => {
                if ticket.is_none_or(|ticket| ticket == self.latest_ticket) {
                    self.error = Some(message);
                }
                self.settle();
            }
        }
        self.is_loading = self.in_flight > 0;
    }

    fn settle(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
    }
}
