//! Authentication routes: registration, login and token verification

use axum::{
    Json,
    extract::{Form, State},
    http::StatusCode,
    response::IntoResponse,
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use tracing::{error, info};

use crate::{
    error::{ApiError, ApiResult},
    jwt::TokenError,
    models::user::{LoginForm, RegisterRequest, TokenResponse, UserResponse, VerifyResponse},
    password,
    state::AppState,
    validation,
};

/// Generic login failure; identical for unknown users and bad passwords
const LOGIN_FAILED: &str = "Incorrect username or password";

/// Register a new user
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> ApiResult<impl IntoResponse> {
    validation::validate_email(&payload.email).map_err(ApiError::Validation)?;
    validation::validate_username(&payload.username).map_err(ApiError::Validation)?;
    validation::validate_password(&payload.password).map_err(ApiError::Validation)?;

    let existing = state
        .user_repository
        .find_by_email_or_username(&payload.email, &payload.username)
        .await
        .map_err(|e| {
            error!("Failed to look up user: {}", e);
            ApiError::InternalServerError
        })?;

    if existing.is_some() {
        return Err(ApiError::Conflict(
            "Email or username already registered".to_string(),
        ));
    }

    let password_hash = password::hash(&payload.password).map_err(|e| {
        error!("Failed to hash password: {}", e);
        ApiError::InternalServerError
    })?;

    let user = state
        .user_repository
        .create(&payload.email, &payload.username, &password_hash)
        .await
        .map_err(|e| {
            error!("Failed to create user: {}", e);
            ApiError::InternalServerError
        })?;

    info!("Registered user: {}", user.username);

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// Log a user in and issue an access token
pub async fn login(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> ApiResult<Json<TokenResponse>> {
    let user = state
        .user_repository
        .find_by_username(&form.username)
        .await
        .map_err(|e| {
            error!("Failed to look up user: {}", e);
            ApiError::InternalServerError
        })?;

    let Some(user) = user else {
        return Err(ApiError::Unauthorized(LOGIN_FAILED.to_string()));
    };

    let password_ok = password::verify(&form.password, &user.password_hash).map_err(|e| {
        error!("Failed to verify password: {}", e);
        ApiError::InternalServerError
    })?;

    if !password_ok || !user.is_active {
        return Err(ApiError::Unauthorized(LOGIN_FAILED.to_string()));
    }

    let access_token = state.jwt_service.issue(&user.username).map_err(|e| {
        error!("Failed to issue token: {}", e);
        ApiError::InternalServerError
    })?;

    info!("Issued access token for user: {}", user.username);

    Ok(Json(TokenResponse::bearer(access_token)))
}

/// Verify the presented bearer token
pub async fn verify(
    State(state): State<AppState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
) -> ApiResult<Json<VerifyResponse>> {
    let TypedHeader(Authorization(bearer)) =
        bearer.ok_or_else(|| ApiError::Unauthorized("Not authenticated".to_string()))?;

    let claims = state
        .jwt_service
        .validate(bearer.token())
        .map_err(|e| match e {
            TokenError::Expired => ApiError::Unauthorized("Expired token".to_string()),
            TokenError::Invalid => ApiError::Unauthorized("Invalid token".to_string()),
        })?;

    Ok(Json(VerifyResponse {
        valid: true,
        username: claims.sub,
    }))
}
