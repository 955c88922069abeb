use axum::{
    extract::State,
    routing::get,
    Json, Router,
};
use std::sync::Arc;

use crate::{error::AppError, models::Event, AppState};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/events", get(list_events))
}

// GET /api/events
pub async fn list_events(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Event>>, AppError> {
    let events = state.db.list_events().await?;
    Ok(Json(events))
}
