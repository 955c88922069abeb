use axum::{
    extract::State,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::{error::AppError, middleware::QueryParams, models::MovieSummary, AppState};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/movies", get(popular_movies))
        .route("/recommendations", get(recommendations))
}

#[derive(Debug, Deserialize)]
pub struct RecommendationsQuery {
    pub genre: String,
}

// GET /api/movies
async fn popular_movies(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<MovieSummary>>, AppError> {
    let movies = state.catalog.popular_movies().await?;
    Ok(Json(movies))
}

// GET /api/recommendations?genre=
async fn recommendations(
    State(state): State<Arc<AppState>>,
    QueryParams(params): QueryParams<RecommendationsQuery>,
) -> Result<Json<Vec<MovieSummary>>, AppError> {
    let movies = state.catalog.recommendations(&params.genre).await?;
    Ok(Json(movies))
}
