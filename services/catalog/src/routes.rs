//! Catalog service routes

use axum::{
    Json, Router,
    extract::State,
    response::IntoResponse,
    routing::{get, post},
};
use serde_json::json;

use crate::state::AppState;

pub mod auth;
pub mod movies;

/// Create the router for the catalog service
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route(
            "/movies/",
            get(movies::list_movies).post(movies::create_movie),
        )
        .route("/movies/search/title/advanced", get(movies::search_by_title))
        .route(
            "/movies/search/director/advanced",
            get(movies::search_by_director),
        )
        .route("/movies/search/genre/advanced", get(movies::search_by_genre))
        .route(
            "/movies/search/filters/advanced",
            get(movies::filtered_search),
        )
        .route("/movies/search/instant", get(movies::instant_search))
        .route(
            "/movies/:id",
            get(movies::get_movie)
                .patch(movies::update_movie)
                .delete(movies::delete_movie),
        )
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/verify", get(auth::verify))
        .with_state(state)
}

/// Welcome endpoint
pub async fn root() -> impl IntoResponse {
    Json(json!({
        "message": "Welcome to the movie catalog!"
    }))
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let database = common::database::health_check(&state.db_pool)
        .await
        .unwrap_or(false);

    Json(json!({
        "status": "ok",
        "service": "catalog-service",
        "database": database
    }))
}
