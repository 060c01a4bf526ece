//! End-to-end: `HttpCityApi` + `RemoteCityStore` against the dev backend
//! bound to an ephemeral port.

use std::sync::Arc;

use worldwise::backend::{BackendState, app};
use worldwise::cities::{City, CityApi, CityError, CityId, HttpCityApi, NewCity, Position, RemoteCityStore};
use worldwise::config::ClientConfig;

fn paris() -> City {
    NewCity {
        city_name: "Paris".to_owned(),
        country: "France".to_owned(),
        emoji: "🇫🇷".to_owned(),
        date: "2027-10-31T15:59:59.138Z".to_owned(),
        notes: String::new(),
        position: Position { lat: 48.85, lng: 2.35 },
    }
    .with_id(CityId::from(1))
}

fn lisbon() -> NewCity {
    NewCity {
        city_name: "Lisbon".to_owned(),
        country: "Portugal".to_owned(),
        emoji: "🇵🇹".to_owned(),
        date: "2027-05-01T00:00:00Z".to_owned(),
        notes: "tram 28".to_owned(),
        position: Position { lat: 38.72, lng: -9.14 },
    }
}

async fn spawn_backend(seed: Vec<City>) -> ClientConfig {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app(BackendState::new(seed))).await.unwrap();
    });
    ClientConfig::new(format!("http://{addr}"))
}

fn store_for(config: &ClientConfig) -> RemoteCityStore {
    RemoteCityStore::new(Arc::new(HttpCityApi::new(config).unwrap()))
}

#[tokio::test]
async fn load_all_reads_seeded_collection() {
    let config = spawn_backend(vec![paris()]).await;
    let store = store_for(&config);

    store.load_all().await.unwrap();

    let state = store.snapshot();
    assert!(!state.is_loading);
    assert_eq!(state.cities, vec![paris()]);
    assert!(state.error.is_none());
}

#[tokio::test]
async fn create_then_get_then_delete() {
    let config = spawn_backend(vec![paris()]).await;
    let store = store_for(&config);
    store.load_all().await.unwrap();

    let created = store.create_city(lisbon()).await.unwrap();
    assert_eq!(created.id, CityId::from(2));
    assert_eq!(created.notes, "tram 28");
    assert_eq!(store.snapshot().cities.last(), Some(&created));
    assert_eq!(store.snapshot().current_city.as_ref(), Some(&created));

    let fetched = store.get_city(&CityId::from(1)).await.unwrap();
    assert_eq!(fetched, paris());

    store.delete_city(&created.id).await.unwrap();
    assert_eq!(store.snapshot().cities, vec![paris()]);

    let fresh = store_for(&config);
    fresh.load_all().await.unwrap();
    assert_eq!(fresh.snapshot().cities, vec![paris()]);
}

#[tokio::test]
async fn read_unknown_city_is_status_error() {
    let config = spawn_backend(Vec::new()).await;
    let api = HttpCityApi::new(&config).unwrap();

    let err = api.read(&CityId::from(404)).await.unwrap_err();
    assert_eq!(err, CityError::Status { status: 404 });
}

#[tokio::test]
async fn unreachable_backend_sets_load_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let store = store_for(&ClientConfig::new(format!("http://{addr}")));

    let err = store.load_all().await.unwrap_err();

    assert!(matches!(err, CityError::Network(_)));
    let state = store.snapshot();
    assert_eq!(state.error.as_deref(), Some("There was an error loading data..."));
    assert!(state.cities.is_empty());
    assert!(!state.is_loading);
}
