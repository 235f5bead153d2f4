use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::error;

pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ApiError {
    #[error("Content is required")]
    MissingContent,
    #[error("Invalid request body")]
    InvalidBody {
        #[from]
        source: JsonRejection,
    },
    #[error("Paste not found")]
    NotFound,
    #[error("Paste expired")]
    Expired,
    #[error("Route not found")]
    RouteNotFound,
    #[error("expiry timestamp out of range")]
    ExpiryOutOfRange,
    #[error("database error")]
    Database { source: sqlx::Error },
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status_code, message) = match &self {
            ApiError::MissingContent => (StatusCode::BAD_REQUEST, "Content is required"),
            ApiError::InvalidBody { .. } => (StatusCode::BAD_REQUEST, "Invalid request body"),
            ApiError::NotFound => (StatusCode::NOT_FOUND, "Paste not found"),
            ApiError::Expired => (StatusCode::GONE, "Paste expired"),
            ApiError::RouteNotFound => (StatusCode::NOT_FOUND, "Route not found"),
            ApiError::ExpiryOutOfRange => {
                // logged here, never detailed to the client
                error!("expiry timestamp out of range");
                (StatusCode::INTERNAL_SERVER_ERROR, "Server error")
            }
            ApiError::Database { source } => {
                error!("database error: {source}");
                (StatusCode::INTERNAL_SERVER_ERROR, "Server error")
            }
        };

        (status_code, Json(json!({ "error": message }))).into_response()
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(source: sqlx::Error) -> Self {
        match source {
            sqlx::Error::RowNotFound => ApiError::NotFound,
            _ => ApiError::Database { source },
        }
    }
}
