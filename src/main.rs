use std::net::SocketAddr;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use integrated_app::{app, config::Config, services::connections::ConnectionRegistry, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.app.rust_log))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Integrated App");

    // Open the row store, create tables and seed events
    let state = AppState::new(&config).await?;
    info!("Database ready at {}", config.database.url);

    if config.catalog.api_key.is_empty() {
        tracing::warn!("TMDB_API_KEY is not set; catalog requests will be refused upstream");
    }

    let addr: SocketAddr = format!("{}:{}", config.app.host, config.app.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Integrated App running on {}", addr);

    let connections = state.connections.clone();
    axum::serve(listener, app(state).into_make_service())
        .with_graceful_shutdown(shutdown_signal(connections))
        .await?;

    info!("Server stopped");
    Ok(())
}

// Resolves on Ctrl-C, after which every ticker is cancelled so open sockets can drain.
async fn shutdown_signal(connections: ConnectionRegistry) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown requested");
    connections.close_all();
}
