//! Movie routes: CRUD, advanced search and instant search handlers
//!
//! Handlers stay thin; they enforce the business rules (year/rating
//! invariants, "at least one filter", empty-update rejection) and delegate
//! everything else to the repository.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;
use tracing::error;
use uuid::Uuid;

use crate::{
    error::{ApiError, ApiResult},
    models::movie::{
        DeletedMovie, FieldSearchParams, FilteredSearchParams, InstantSearchParams, ListParams,
        Movie, MovieUpdate, NewMovie,
    },
    pagination::{PageRequest, Paginated},
    query::{MovieFilter, SortBy, SortOrder, TextMatch},
    state::AppState,
    validation,
};

/// Default instant search result cap
const INSTANT_SEARCH_DEFAULT_LIMIT: i64 = 8;
/// Upper bound for the instant search result cap
const INSTANT_SEARCH_MAX_LIMIT: i64 = 20;

fn not_found(id: Uuid) -> ApiError {
    ApiError::NotFound(format!("Movie with ID {} not found.", id))
}

/// Create a new movie
pub async fn create_movie(
    State(state): State<AppState>,
    Json(payload): Json<NewMovie>,
) -> ApiResult<impl IntoResponse> {
    validation::validate_year(payload.year).map_err(ApiError::Validation)?;
    if let Some(rating) = payload.rating {
        validation::validate_rating(rating).map_err(ApiError::Validation)?;
    }

    let movie = state.movie_repository.insert(&payload).await.map_err(|e| {
        error!("Failed to create movie: {}", e);
        ApiError::InternalServerError
    })?;

    Ok((StatusCode::CREATED, Json(movie)))
}

/// Paginated movie listing
pub async fn list_movies(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<Paginated<Movie>>> {
    let filter = MovieFilter::default();
    run_search(
        state,
        filter,
        None,
        None,
        params.page,
        params.page_size,
    )
    .await
}

/// Get a movie by id
pub async fn get_movie(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Movie>> {
    let movie = state
        .movie_repository
        .get(id)
        .await
        .map_err(|e| {
            error!("Failed to get movie: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or_else(|| not_found(id))?;

    Ok(Json(movie))
}

/// Apply a partial update to a movie
pub async fn update_movie(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<MovieUpdate>,
) -> ApiResult<Json<Movie>> {
    // An empty payload is rejected before the id is resolved
    if payload.is_empty() {
        return Err(ApiError::Validation(
            "No fields provided for the update.".to_string(),
        ));
    }

    if let Some(year) = payload.year {
        validation::validate_year(year).map_err(ApiError::Validation)?;
    }
    if let Some(rating) = payload.rating {
        validation::validate_rating(rating).map_err(ApiError::Validation)?;
    }

    let movie = state
        .movie_repository
        .update(id, &payload)
        .await
        .map_err(|e| {
            error!("Failed to update movie: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or_else(|| not_found(id))?;

    Ok(Json(movie))
}

/// Delete a movie and return a confirmation payload
pub async fn delete_movie(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<serde_json::Value>> {
    let movie = state
        .movie_repository
        .delete(id)
        .await
        .map_err(|e| {
            error!("Failed to delete movie: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or_else(|| not_found(id))?;

    let deleted = DeletedMovie {
        id: movie.id,
        title: movie.title.clone(),
        director: movie.director,
    };

    Ok(Json(json!({
        "message": format!("Movie {} (ID: {}) successfully deleted.", movie.title, movie.id),
        "deleted_movie": deleted,
    })))
}

enum SearchField {
    Title,
    Director,
    Genre,
}

async fn field_search(
    state: AppState,
    params: FieldSearchParams,
    field: SearchField,
) -> ApiResult<Json<Paginated<Movie>>> {
    let matcher = TextMatch::new(params.q, params.exact_match);
    let mut filter = MovieFilter::default();
    match field {
        SearchField::Title => filter.title = Some(matcher),
        SearchField::Director => filter.director = Some(matcher),
        SearchField::Genre => filter.genre = Some(matcher),
    }

    run_search(
        state,
        filter,
        params.sort_by,
        params.sort_order,
        params.page,
        params.page_size,
    )
    .await
}

/// Search movies by title
pub async fn search_by_title(
    State(state): State<AppState>,
    Query(params): Query<FieldSearchParams>,
) -> ApiResult<Json<Paginated<Movie>>> {
    field_search(state, params, SearchField::Title).await
}

/// Search movies by director
pub async fn search_by_director(
    State(state): State<AppState>,
    Query(params): Query<FieldSearchParams>,
) -> ApiResult<Json<Paginated<Movie>>> {
    field_search(state, params, SearchField::Director).await
}

/// Search movies by genre
pub async fn search_by_genre(
    State(state): State<AppState>,
    Query(params): Query<FieldSearchParams>,
) -> ApiResult<Json<Paginated<Movie>>> {
    field_search(state, params, SearchField::Genre).await
}

/// Multi-field filtered search; requires at least one filter
pub async fn filtered_search(
    State(state): State<AppState>,
    Query(params): Query<FilteredSearchParams>,
) -> ApiResult<Json<Paginated<Movie>>> {
    let exact_match = params.exact_match;
    let filter = MovieFilter {
        title: params.title.map(|term| TextMatch::new(term, exact_match)),
        director: params
            .director
            .map(|term| TextMatch::new(term, exact_match)),
        genre: params.genre.map(|term| TextMatch::new(term, exact_match)),
        min_year: params.min_year,
        max_year: params.max_year,
        min_rating: params.min_rating,
        max_rating: params.max_rating,
    };

    if filter.is_empty() {
        return Err(ApiError::Validation(
            "No filters provided. Supply at least one filter parameter.".to_string(),
        ));
    }

    run_search(
        state,
        filter,
        params.sort_by,
        params.sort_order,
        params.page,
        params.page_size,
    )
    .await
}

/// Typeahead search across title, director and genre
pub async fn instant_search(
    State(state): State<AppState>,
    Query(params): Query<InstantSearchParams>,
) -> ApiResult<Json<Vec<Movie>>> {
    let term = params.q.unwrap_or_default();
    let term = term.trim();

    // Blank queries never touch the store
    if term.is_empty() {
        return Ok(Json(Vec::new()));
    }

    let limit = params
        .limit
        .unwrap_or(INSTANT_SEARCH_DEFAULT_LIMIT)
        .clamp(1, INSTANT_SEARCH_MAX_LIMIT);

    let movies = state
        .movie_repository
        .instant_search(term, limit)
        .await
        .map_err(|e| {
            error!("Failed to run instant search: {}", e);
            ApiError::InternalServerError
        })?;

    Ok(Json(movies))
}

async fn run_search(
    state: AppState,
    filter: MovieFilter,
    sort_by: Option<String>,
    sort_order: Option<String>,
    page: Option<i64>,
    page_size: Option<i64>,
) -> ApiResult<Json<Paginated<Movie>>> {
    let sort_by = SortBy::from_param(sort_by.as_deref());
    let sort_order = SortOrder::from_param(sort_order.as_deref());
    let page = PageRequest::from_params(page, page_size);

    let movies = state
        .movie_repository
        .search(&filter, sort_by, sort_order, page.offset(), page.limit())
        .await
        .map_err(|e| {
            error!("Failed to search movies: {}", e);
            ApiError::InternalServerError
        })?;

    let total = state.movie_repository.count(&filter).await.map_err(|e| {
        error!("Failed to count movies: {}", e);
        ApiError::InternalServerError
    })?;

    Ok(Json(Paginated::new(movies, total, page)))
}
