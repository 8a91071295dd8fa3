//! # Route Handlers
//!
//! Axum handlers for the `bokji-server`. The `/ask` endpoint is the user
//! surface and always answers HTTP 200 with a user-safe reply; the `/admin`
//! endpoints drive ingestion and surface real errors.

use crate::errors::AppError;
use crate::state::AppState;
use crate::types::{
    AddDataRequest, AddDataResponse, AskRequest, ExamplesResponse, RebuildResponse,
};
use axum::{extract::State, Json};
use bokji::ChatReply;
use std::path::Path;
use tracing::info;

/// The handler for the root (`/`) endpoint.
pub async fn root() -> &'static str {
    "bokji server is running."
}

/// The handler for the health check (`/health`) endpoint.
pub async fn health_check() -> &'static str {
    "OK"
}

/// The handler for the `/ask` endpoint.
///
/// Never fails: a blank question gets a prompt to type one, everything else
/// goes through the guardrail and the chain, which produce user-safe replies
/// for every outcome.
pub async fn ask_handler(
    State(app_state): State<AppState>,
    Json(payload): Json<AskRequest>,
) -> Json<ChatReply> {
    let question = payload.question.trim();
    let user_id = payload.user_id.as_deref().unwrap_or("web_user");
    info!(user_id, question, "Received question");

    if question.is_empty() {
        return Json(ChatReply {
            answer: "질문을 입력해주세요.".to_string(),
            success: false,
            is_fallback: true,
            examples: None,
        });
    }

    Json(app_state.engine.ask(question, user_id).await)
}

/// The handler for the `/examples` endpoint, used by the welcome screen.
pub async fn examples_handler(State(app_state): State<AppState>) -> Json<ExamplesResponse> {
    Json(ExamplesResponse {
        examples: app_state.engine.guardrails().welcome_examples(),
    })
}

/// The handler for the `/admin/add_data` endpoint.
///
/// Accepts either a path to a JSON file of source records or a single inline
/// record; duplicates against the corpus are skipped, not errors.
pub async fn add_data_handler(
    State(app_state): State<AppState>,
    Json(payload): Json<AddDataRequest>,
) -> Result<Json<AddDataResponse>, AppError> {
    let outcome = match (payload.json_file, payload.title) {
        (Some(path), _) => {
            info!(path, "Adding records from file");
            app_state.ingestor.add_from_file(Path::new(&path)).await?
        }
        (None, Some(title)) => {
            let content = payload.content.unwrap_or_default();
            if content.trim().is_empty() {
                return Err(AppError::BadRequest(
                    "'content' is required when adding an inline record".to_string(),
                ));
            }
            info!(title, "Adding inline record");
            app_state
                .ingestor
                .add_record(title, content, payload.url)
                .await?
        }
        (None, None) => {
            return Err(AppError::BadRequest(
                "Either 'json_file' or 'title' and 'content' must be provided".to_string(),
            ));
        }
    };

    Ok(Json(AddDataResponse {
        message: "Data added successfully".to_string(),
        added_documents: outcome.added_documents,
        skipped_duplicates: outcome.skipped_duplicates,
        added_chunks: outcome.added_chunks,
    }))
}

/// The handler for the `/admin/rebuild` endpoint.
///
/// Rebuilds the index from the canonical corpus. The live index keeps
/// serving questions until the new one is persisted and swapped in.
pub async fn rebuild_handler(
    State(app_state): State<AppState>,
) -> Result<Json<RebuildResponse>, AppError> {
    info!("Rebuilding the index from the corpus");
    let indexed_chunks = app_state.ingestor.rebuild().await?;
    Ok(Json(RebuildResponse {
        message: "Index rebuilt successfully".to_string(),
        indexed_chunks,
    }))
}
