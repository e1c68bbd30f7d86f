use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Failures reported by a [`crate::users::repo::UserStore`].
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store's unique constraint on `username` rejected the row.
    #[error("username already taken")]
    Conflict,

    #[error("database error: {0}")]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => StoreError::Conflict,
            _ => StoreError::Database(e),
        }
    }
}

/// Every way a registration request can end other than success.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Username and password required")]
    MissingCredentials,

    #[error("Username must be at least 3 characters")]
    UsernameTooShort,

    #[error("Database configuration error")]
    DatabaseConfig,

    #[error("Username already exists")]
    UsernameTaken,

    /// Not recovered by the handler; rendered as a generic 500.
    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::MissingCredentials | ApiError::UsernameTooShort => StatusCode::BAD_REQUEST,
            ApiError::DatabaseConfig | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::UsernameTaken => StatusCode::CONFLICT,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Conflict => ApiError::UsernameTaken,
            StoreError::Database(e) => ApiError::Internal(e.into()),
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::Internal(anyhow::Error::new(e).context("parse request body"))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = match &self {
            ApiError::Internal(e) => {
                error!(error = ?e, "unhandled fault");
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };
        (
            self.status(),
            [(header::ACCESS_CONTROL_ALLOW_ORIGIN, "*")],
            Json(json!({ "error": message })),
        )
            .into_response()
    }
}
