pub mod config;
pub mod database;
pub mod error;
pub mod models;
pub mod controllers;
pub mod middleware;
pub mod services;
pub mod catalog_client;

use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::services::{connections::ConnectionRegistry, ticker::StockTicker};

// Shared state for the whole application
#[derive(Clone)]
pub struct AppState {
    pub db: database::Database,
    pub catalog: catalog_client::CatalogClient,
    pub connections: ConnectionRegistry,
    pub ticker: StockTicker,
}

impl AppState {
    /// Opens and initialises the row store, then wires the other collaborators.
    pub async fn new(config: &config::Config) -> anyhow::Result<Arc<Self>> {
        let db = database::Database::new(&config.database.url, config.database.pool_size).await?;
        db.initialize().await?;
        Ok(Self::with_database(db, config))
    }

    /// Builds state around an already initialised store.
    pub fn with_database(db: database::Database, config: &config::Config) -> Arc<Self> {
        Arc::new(Self {
            db,
            catalog: catalog_client::CatalogClient::from_config(&config.catalog),
            connections: ConnectionRegistry::new(),
            ticker: StockTicker::from_config(&config.ticker),
        })
    }
}

/// Full HTTP surface: banner, health, the `/api` group and the realtime socket.
pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(|| async { "Integrated App API v1.0" }))
        .route("/health", get(|| async { "OK" }))
        .nest("/api", controllers::routes())
        .merge(controllers::stream::routes())
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
