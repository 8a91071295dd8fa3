//! Request and response payloads for the HTTP API.

use serde::{Deserialize, Serialize};

/// The request body for the `/ask` endpoint.
#[derive(Debug, Deserialize)]
pub struct AskRequest {
    #[serde(default)]
    pub question: String,
    /// Opaque caller identifier, used only for log correlation.
    #[serde(default)]
    pub user_id: Option<String>,
}

/// The response body for the `/examples` endpoint.
#[derive(Debug, Serialize)]
pub struct ExamplesResponse {
    pub examples: Vec<String>,
}

/// The request body for the `/admin/add_data` endpoint.
///
/// Either `json_file` (a path to a JSON array of source records) or an
/// inline `title`/`content` pair must be provided.
#[derive(Debug, Deserialize)]
pub struct AddDataRequest {
    #[serde(default)]
    pub json_file: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

/// The response body for the `/admin/add_data` endpoint.
#[derive(Debug, Serialize)]
pub struct AddDataResponse {
    pub message: String,
    pub added_documents: usize,
    pub skipped_duplicates: usize,
    pub added_chunks: usize,
}

/// The response body for the `/admin/rebuild` endpoint.
#[derive(Debug, Serialize)]
pub struct RebuildResponse {
    pub message: String,
    pub indexed_chunks: usize,
}
