use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Recommendation request failed: {0}")]
    Recommender(#[from] reqwest::Error),

    #[error("Recommendation service is not configured")]
    RecommenderUnavailable,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Infrastructure detail stays in the server log; clients get a
        // generic body.
        let (status, message) = match self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Database(e) => {
                error!("Database failure: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
            AppError::Recommender(e) => {
                error!("Recommendation call failed: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "The recommendation service is unavailable, please try again".to_string(),
                )
            }
            AppError::RecommenderUnavailable => {
                error!("Recommendation requested but no API key is configured");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "The recommendation service is unavailable, please try again".to_string(),
                )
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
