use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use futures::{SinkExt, StreamExt};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use integrated_app::{
    app,
    config::{AppConfig, CatalogConfig, Config, DatabaseConfig, TickerConfig},
    database::Database,
    models::StockTick,
    AppState,
};

fn test_config(catalog_url: &str, interval_ms: u64) -> Config {
    Config {
        app: AppConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            rust_log: "integrated_app=debug".to_string(),
        },
        database: DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            pool_size: 1,
        },
        catalog: CatalogConfig {
            base_url: catalog_url.to_string(),
            api_key: "test-key".to_string(),
            language: "en-US".to_string(),
        },
        ticker: TickerConfig {
            symbol: "AAPL".to_string(),
            interval_ms,
        },
    }
}

async fn test_state(catalog_url: &str, interval_ms: u64) -> Arc<AppState> {
    let db = Database::in_memory().await.unwrap();
    db.initialize().await.unwrap();
    AppState::with_database(db, &test_config(catalog_url, interval_ms))
}

async fn test_app(catalog_url: &str) -> (Router, Arc<AppState>) {
    let state = test_state(catalog_url, 2000).await;
    (app(state.clone()), state)
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, body.to_vec())
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn health_and_banner_respond() {
    let (app, _) = test_app("http://127.0.0.1:9").await;

    let (status, body) = send(app.clone(), get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"OK");

    let (status, _) = send(app, get("/")).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn events_on_fresh_store_are_the_seeds() {
    let (app, _) = test_app("http://127.0.0.1:9").await;

    let (status, body) = send(app, get("/api/events")).await;
    assert_eq!(status, StatusCode::OK);

    let events: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(
        events,
        json!([
            { "id": 1, "name": "Concert", "date": "2025-04-15" },
            { "id": 2, "name": "Workshop", "date": "2025-04-20" }
        ])
    );
}

#[tokio::test]
async fn first_booking_returns_id_one() {
    let (app, state) = test_app("http://127.0.0.1:9").await;

    let (status, body) = send(
        app,
        post_json("/api/bookings", json!({ "eventId": 1, "userName": "Ada" })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(serde_json::from_slice::<Value>(&body).unwrap(), json!({ "id": 1 }));

    let bookings = state.db.bookings_for_event(1).await.unwrap();
    assert_eq!(bookings.len(), 1);
    assert_eq!(bookings[0].user_name, "Ada");
}

#[tokio::test]
async fn malformed_booking_is_rejected_before_storage() {
    let (app, state) = test_app("http://127.0.0.1:9").await;

    let (status, body) = send(app.clone(), post_json("/api/bookings", json!({ "eventId": 1 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(String::from_utf8(body).unwrap().contains("userName"));

    let (status, _) = send(
        app,
        post_json("/api/bookings", json!({ "eventId": "one", "userName": "Ada" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert!(state.db.bookings_for_event(1).await.unwrap().is_empty());
}

#[tokio::test]
async fn storage_fault_on_insert_is_a_client_error() {
    let (app, state) = test_app("http://127.0.0.1:9").await;
    sqlx::query("DROP TABLE bookings").execute(&state.db.pool).await.unwrap();

    let (status, body) = send(
        app,
        post_json("/api/bookings", json!({ "eventId": 1, "userName": "Ada" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(!body.is_empty());
}

#[tokio::test]
async fn storage_fault_on_list_is_a_server_error() {
    let (app, state) = test_app("http://127.0.0.1:9").await;
    sqlx::query("DROP TABLE events").execute(&state.db.pool).await.unwrap();

    let (status, body) = send(app, get("/api/events")).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(String::from_utf8(body).unwrap().contains("events"));
}

#[tokio::test]
async fn movies_are_relayed_from_the_catalog() {
    let catalog = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/movie/popular"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "page": 1,
            "results": [
                { "id": 550, "title": "Fight Club", "genre_ids": [18] },
                { "id": 603, "title": "The Matrix", "genre_ids": [28, 878] }
            ]
        })))
        .mount(&catalog)
        .await;
    let (app, _) = test_app(&catalog.uri()).await;

    let (status, body) = send(app, get("/api/movies")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        serde_json::from_slice::<Value>(&body).unwrap(),
        json!([
            { "id": 550, "title": "Fight Club", "genre_ids": [18] },
            { "id": 603, "title": "The Matrix", "genre_ids": [28, 878] }
        ])
    );
}

#[tokio::test]
async fn upstream_failure_yields_500_with_message() {
    let catalog = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/movie/popular"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&catalog)
        .await;
    let (app, _) = test_app(&catalog.uri()).await;

    let (status, body) = send(app, get("/api/movies")).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(!body.is_empty());
    assert!(serde_json::from_slice::<Vec<Value>>(&body).is_err());
}

#[tokio::test]
async fn upstream_error_body_does_not_expose_the_api_key() {
    let catalog = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/movie/popular"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&catalog)
        .await;
    let (app, _) = test_app(&catalog.uri()).await;

    let (status, body) = send(app, get("/api/movies")).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let body = String::from_utf8(body).unwrap();
    assert!(body.contains("401"), "unexpected body: {}", body);
    assert!(!body.contains("test-key"), "key leaked: {}", body);
}

#[tokio::test]
async fn catalog_entries_are_relayed_whatever_their_shape() {
    let catalog = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/discover/movie"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{ "id": 1, "title": "A" }, { "title": "no id" }]
        })))
        .mount(&catalog)
        .await;
    let (app, _) = test_app(&catalog.uri()).await;

    let (status, body) = send(app, get("/api/recommendations?genre=18")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        serde_json::from_slice::<Value>(&body).unwrap(),
        json!([{ "id": 1, "title": "A" }, { "title": "no id" }])
    );
}

#[tokio::test]
async fn recommendations_never_exceed_five() {
    let catalog = MockServer::start().await;
    let results: Vec<Value> = (1..=12).map(|id| json!({ "id": id })).collect();
    Mock::given(method("GET"))
        .and(path("/discover/movie"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "results": results })))
        .mount(&catalog)
        .await;
    let (app, _) = test_app(&catalog.uri()).await;

    let (status, body) = send(app, get("/api/recommendations?genre=28")).await;

    assert_eq!(status, StatusCode::OK);
    let movies: Vec<Value> = serde_json::from_slice(&body).unwrap();
    assert_eq!(movies.len(), 5);
}

#[tokio::test]
async fn recommendations_require_a_genre() {
    let (app, _) = test_app("http://127.0.0.1:9").await;

    let (status, _) = send(app, get("/api/recommendations")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn socket_streams_ticks_and_releases_on_close() {
    let state = test_state("http://127.0.0.1:9", 50).await;
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let router = app(state.clone());
    let server = tokio::spawn(async move { axum::serve(listener, router.into_make_service()).await });

    let (mut socket, _) = tokio_tungstenite::connect_async(format!("ws://{}/ws", addr))
        .await
        .unwrap();

    for _ in 0..2 {
        let frame = socket.next().await.unwrap().unwrap();
        let tick: StockTick = serde_json::from_str(frame.to_text().unwrap()).unwrap();
        assert_eq!(tick.symbol, "AAPL");
        assert_eq!(tick.price.split_once('.').unwrap().1.len(), 2);
    }
    assert_eq!(state.connections.active_count(), 1);

    socket.send(tokio_tungstenite::tungstenite::Message::Close(None)).await.unwrap();
    drop(socket);

    let released = async {
        while state.connections.active_count() > 0 {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    };
    tokio::time::timeout(Duration::from_secs(5), released)
        .await
        .expect("connection was not released");

    server.abort();
}
