use super::*;
use crate::cities::types::Position;

fn city(id: u64, name: &str, country: &str) -> City {
    City {
        id: CityId::from(id),
        city_name: name.to_owned(),
        country: country.to_owned(),
        emoji: String::new(),
        date: "2027-01-01T00:00:00Z".to_owned(),
        notes: String::new(),
        position: Position { lat: 0.0, lng: 0.0 },
    }
}

fn loading(state: &mut CollectionState, ticket: Option<Ticket>) {
    state.apply(CitiesAction::Loading { ticket });
}

// =============================================================
// Defaults
// =============================================================

#[test]
fn default_state_is_empty_and_idle() {
    let state = CollectionState::default();
    assert!(state.cities.is_empty());
    assert!(!state.is_loading);
    assert!(state.current_city.is_none());
    assert!(state.error.is_none());
    assert_eq!(state.in_flight(), 0);
}

// =============================================================
// Loading bookkeeping
// =============================================================

#[test]
fn loading_sets_flag_and_terminal_action_clears_it() {
    let mut state = CollectionState::default();
    loading(&mut state, None);
    assert!(state.is_loading);

    state.apply(CitiesAction::CitiesLoaded(vec![city(1, "Paris", "France")]));
    assert!(!state.is_loading);
    assert_eq!(state.cities.len(), 1);
}

#[test]
fn overlapping_requests_keep_loading_until_both_settle() {
    let mut state = CollectionState::default();
    loading(&mut state, None);
    loading(&mut state, None);

    state.apply(CitiesAction::CityDeleted(CityId::from(1)));
    assert!(state.is_loading);
    assert_eq!(state.in_flight(), 1);

    state.apply(CitiesAction::Abandoned);
    assert!(!state.is_loading);
}

#[test]
fn settle_without_loading_does_not_underflow() {
    let mut state = CollectionState::default();
    state.apply(CitiesAction::Abandoned);
    assert_eq!(state.in_flight(), 0);
    assert!(!state.is_loading);
}

#[test]
fn rejected_records_error_and_keeps_cities() {
    let mut state = CollectionState::default();
    loading(&mut state, None);
    state.apply(CitiesAction::CitiesLoaded(vec![city(1, "Paris", "France")]));

    loading(&mut state, None);
    state.apply(CitiesAction::Rejected { ticket: None, message: "There was an error loading data...".into() });
    assert_eq!(state.error.as_deref(), Some("There was an error loading data..."));
    assert_eq!(state.cities.len(), 1);
    assert!(!state.is_loading);
}

#[test]
fn new_request_clears_previous_error() {
    let mut state = CollectionState::default();
    loading(&mut state, None);
    state.apply(CitiesAction::Rejected { ticket: None, message: "boom".into() });
    loading(&mut state, None);
    assert!(state.error.is_none());
}

// =============================================================
// Selection tickets
// =============================================================

#[test]
fn city_loaded_with_latest_ticket_sets_current() {
    let mut state = CollectionState::default();
    let ticket = state.latest_ticket().next();
    loading(&mut state, Some(ticket));
    state.apply(CitiesAction::CityLoaded { ticket, city: city(4, "Rome", "Italy") });
    assert_eq!(state.current_city.as_ref().map(|c| c.city_name.as_str()), Some("Rome"));
}

#[test]
fn stale_city_loaded_does_not_overwrite_newer_selection() {
    let mut state = CollectionState::default();
    let first = state.latest_ticket().next();
    loading(&mut state, Some(first));
    let second = state.latest_ticket().next();
    loading(&mut state, Some(second));

    state.apply(CitiesAction::CityLoaded { ticket: second, city: city(2, "Berlin", "Germany") });
    state.apply(CitiesAction::CityLoaded { ticket: first, city: city(1, "Paris", "France") });

    assert!(state.is_current(&CityId::from(2)));
    assert!(!state.is_loading);
}

#[test]
fn stale_create_still_appends_but_keeps_selection() {
    let mut state = CollectionState::default();
    let create = state.latest_ticket().next();
    loading(&mut state, Some(create));
    let read = state.latest_ticket().next();
    loading(&mut state, Some(read));

    state.apply(CitiesAction::CityLoaded { ticket: read, city: city(2, "Berlin", "Germany") });
    state.apply(CitiesAction::CityCreated { ticket: create, city: city(73, "Lisbon", "Portugal") });

    assert_eq!(state.cities.last().map(|c| c.id.clone()), Some(CityId::from(73)));
    assert!(state.is_current(&CityId::from(2)));
}

#[test]
fn stale_rejection_does_not_overwrite_error() {
    let mut state = CollectionState::default();
    let first = state.latest_ticket().next();
    loading(&mut state, Some(first));
    let second = state.latest_ticket().next();
    loading(&mut state, Some(second));

    state.apply(CitiesAction::CityLoaded { ticket: second, city: city(2, "Berlin", "Germany") });
    state.apply(CitiesAction::Rejected { ticket: Some(first), message: "boom".into() });

    assert!(state.error.is_none());
    assert!(state.is_current(&CityId::from(2)));
    assert!(!state.is_loading);
}

#[test]
fn latest_rejection_records_error() {
    let mut state = CollectionState::default();
    let ticket = state.latest_ticket().next();
    loading(&mut state, Some(ticket));
    state.apply(CitiesAction::Rejected { ticket: Some(ticket), message: "boom".into() });
    assert_eq!(state.error.as_deref(), Some("boom"));
}

#[test]
fn reselected_supersedes_pending_selection_without_loading() {
    let mut state = CollectionState::default();
    let pending = state.latest_ticket().next();
    loading(&mut state, Some(pending));
    let reselect = state.latest_ticket().next();
    state.apply(CitiesAction::Reselected { ticket: reselect });

    assert_eq!(state.in_flight(), 1);
    assert!(state.is_loading);

    state.apply(CitiesAction::CityLoaded { ticket: pending, city: city(1, "Paris", "France") });
    assert!(state.current_city.is_none());
    assert!(!state.is_loading);
}

#[test]
fn created_city_is_appended_and_selected() {
    let mut state = CollectionState::default();
    loading(&mut state, None);
    state.apply(CitiesAction::CitiesLoaded(vec![city(1, "Paris", "France")]));

    let ticket = state.latest_ticket().next();
    loading(&mut state, Some(ticket));
    let lisbon = city(73, "Lisbon", "Portugal");
    state.apply(CitiesAction::CityCreated { ticket, city: lisbon.clone() });

    assert_eq!(state.cities.len(), 2);
    assert_eq!(state.cities.last(), Some(&lisbon));
    assert_eq!(state.current_city, Some(lisbon));
}

// =============================================================
// Deletion
// =============================================================

#[test]
fn delete_removes_only_matching_city_and_keeps_current() {
    let mut state = CollectionState::default();
    let ticket = state.latest_ticket().next();
    loading(&mut state, Some(ticket));
    state.apply(CitiesAction::CityLoaded { ticket, city: city(2, "Berlin", "Germany") });
    loading(&mut state, None);
    state.apply(CitiesAction::CitiesLoaded(vec![
        city(1, "Paris", "France"),
        city(2, "Berlin", "Germany"),
        city(3, "Madrid", "Spain"),
    ]));

    loading(&mut state, None);
    state.apply(CitiesAction::CityDeleted(CityId::from(2)));

    let ids: Vec<_> = state.cities.iter().map(|c| c.id.clone()).collect();
    assert_eq!(ids, vec![CityId::from(1), CityId::from(3)]);
    assert!(state.is_current(&CityId::from(2)));
}

#[test]
fn delete_unknown_id_leaves_cities_untouched() {
    let mut state = CollectionState::default();
    loading(&mut state, None);
    state.apply(CitiesAction::CitiesLoaded(vec![city(1, "Paris", "France")]));
    loading(&mut state, None);
    state.apply(CitiesAction::CityDeleted(CityId::from(99)));
    assert_eq!(state.cities.len(), 1);
}

// =============================================================
// Derived views
// =============================================================

#[test]
fn countries_are_unique_in_first_seen_order() {
    let mut state = CollectionState::default();
    loading(&mut state, None);
    state.apply(CitiesAction::CitiesLoaded(vec![
        city(1, "Lyon", "France"),
        city(2, "Porto", "Portugal"),
        city(3, "Paris", "France"),
    ]));
    let countries: Vec<&str> = state.countries().into_iter().map(|(name, _)| name).collect();
    assert_eq!(countries, vec!["France", "Portugal"]);
}
