use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use bytes::Bytes;
use tracing::instrument;

use crate::{
    error::ApiError,
    state::AppState,
    users::{
        dto::{RegisterRequest, RegisterResponse},
        services::{register_user, validate},
    },
};

pub const ALLOWED_METHODS: &str = "POST, OPTIONS";
pub const ALLOWED_HEADERS: &str = "Content-Type, X-User-Id, X-Auth-Token";
pub const PREFLIGHT_MAX_AGE: &str = "86400";

pub fn register_routes() -> Router<AppState> {
    Router::new().route(
        "/register",
        post(register).options(preflight).fallback(method_not_allowed),
    )
}

/// CORS pre-flight. Answers the same way whatever the request carries.
pub async fn preflight() -> impl IntoResponse {
    (
        StatusCode::OK,
        [
            (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
            (header::ACCESS_CONTROL_ALLOW_METHODS, ALLOWED_METHODS),
            (header::ACCESS_CONTROL_ALLOW_HEADERS, ALLOWED_HEADERS),
            (header::ACCESS_CONTROL_MAX_AGE, PREFLIGHT_MAX_AGE),
        ],
    )
}

pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

/// POST /register { username, password }
#[instrument(skip(state, body))]
pub async fn register(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let req: RegisterRequest = if body.is_empty() {
        RegisterRequest::default()
    } else {
        serde_json::from_slice(&body)?
    };

    let creds = validate(req)?;

    let users = state.users.as_deref().ok_or_else(|| {
        tracing::error!("DATABASE_URL is not configured");
        ApiError::DatabaseConfig
    })?;

    let user = register_user(users, &creds).await?;

    Ok((
        StatusCode::CREATED,
        [(header::ACCESS_CONTROL_ALLOW_ORIGIN, "*")],
        Json(RegisterResponse {
            success: true,
            user: user.into(),
        }),
    ))
}
