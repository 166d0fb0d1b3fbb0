//! Application state shared across handlers

use sqlx::PgPool;

use crate::jwt::JwtService;
use crate::repositories::{UserRepository, movie::MovieRepository};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub movie_repository: MovieRepository,
    pub user_repository: UserRepository,
    pub jwt_service: JwtService,
}
