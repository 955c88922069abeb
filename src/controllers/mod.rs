pub mod movies;
pub mod events;
pub mod bookings;
pub mod stream;

use axum::Router;
use std::sync::Arc;

pub fn routes() -> Router<Arc<crate::AppState>> {
    Router::new()
        .merge(movies::routes())
        .merge(events::routes())
        .merge(bookings::routes())
}
