//! A custom error type for the admin endpoints.
//!
//! The `/ask` endpoint never returns an error: every failure past the
//! guardrail is converted to a canned fallback reply inside the engine. Only
//! the admin endpoints surface errors as HTTP statuses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use bokji::IngestError;
use serde_json::json;
use tracing::error;

pub enum AppError {
    /// A malformed or incomplete request payload.
    BadRequest(String),
    /// Errors from the ingestion pipeline.
    Ingest(IngestError),
    /// Generic internal server errors.
    Internal(anyhow::Error),
}

impl From<IngestError> for AppError {
    fn from(err: IngestError) -> Self {
        AppError::Ingest(err)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status_code, error_message) = match self {
            AppError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            AppError::Ingest(err) => {
                error!("IngestError: {:?}", err);
                match err {
                    IngestError::Io(e) => (
                        StatusCode::BAD_REQUEST,
                        format!("Failed to read the data file: {e}"),
                    ),
                    IngestError::Json(e) => (
                        StatusCode::BAD_REQUEST,
                        format!("Invalid corpus JSON: {e}"),
                    ),
                    IngestError::Embedding(e) => (
                        StatusCode::BAD_GATEWAY,
                        format!("Embeddings API request failed: {e}"),
                    ),
                    IngestError::Index(e) => (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        format!("Index update failed: {e}"),
                    ),
                }
            }
            AppError::Internal(err) => {
                error!("Internal server error: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal server error occurred.".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status_code, body).into_response()
    }
}
