use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{error::AppError, middleware::JsonBody, AppState};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/bookings", post(create_booking))
}

// POST /api/bookings
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    pub event_id: i64,
    pub user_name: String,
}

#[derive(Debug, Serialize)]
pub struct CreateBookingResponse { pub id: i64 }

async fn create_booking(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<CreateBookingRequest>,
) -> Result<impl IntoResponse, AppError> {
    // Any store failure on insert is reported as the client's fault.
    let id = state
        .db
        .insert_booking(req.event_id, &req.user_name)
        .await
        .map_err(AppError::Rejected)?;

    tracing::debug!("Booking {} created for event {}", id, req.event_id);
    Ok((StatusCode::CREATED, Json(CreateBookingResponse { id })))
}
