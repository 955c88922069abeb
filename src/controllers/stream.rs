use axum::{
    extract::{
        ws::{WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
    routing::get,
    Router,
};
use futures::StreamExt;
use std::sync::Arc;

use crate::{services::ticker::stream_ticks, AppState};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/ws", get(ws_handler))
}

// GET /ws (upgrade)
async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    // Held for the whole connection; its drop cancels and deregisters.
    let guard = state.connections.register();
    let (mut sink, mut incoming) = socket.split();

    let teardown = stream_ticks(&mut sink, &mut incoming, &state.ticker, guard.token()).await;
    tracing::debug!(connection_id = %guard.id(), ?teardown, "Ticker stopped");
}
