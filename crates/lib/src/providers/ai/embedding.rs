//! # Embeddings Provider
//!
//! Generates vector embeddings by calling an external, OpenAI-compatible
//! embeddings API. Ingestion sends whole batches in one request, so the
//! request body uses the array form of `input`.

use crate::errors::ModelError;
use async_trait::async_trait;
use dyn_clone::DynClone;
use reqwest::Client as ReqwestClient;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use tracing::debug;

/// A trait for turning text into embedding vectors.
///
/// The index and the ingestion orchestrator only depend on this seam, so the
/// remote API can be replaced by a deterministic implementation in tests.
#[async_trait]
pub trait Embedder: Send + Sync + Debug + DynClone {
    /// Embeds a batch of texts, returning one vector per input in order.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, ModelError>;

    /// Embeds a single text (convenience wrapper for query embedding).
    async fn embed(&self, text: &str) -> Result<Vec<f32>, ModelError> {
        let mut vectors = self.embed_batch(&[text.to_string()]).await?;
        vectors
            .pop()
            .ok_or_else(|| ModelError::Api("embeddings API returned no vectors".to_string()))
    }
}

dyn_clone::clone_trait_object!(Embedder);

#[derive(Serialize, Debug)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Deserialize, Debug)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize, Debug)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

/// An `Embedder` backed by an OpenAI-compatible `/embeddings` endpoint.
#[derive(Clone, Debug)]
pub struct RemoteEmbedder {
    client: ReqwestClient,
    api_url: String,
    model: String,
    api_key: Option<String>,
}

impl RemoteEmbedder {
    pub fn new(
        api_url: String,
        model: String,
        api_key: Option<String>,
    ) -> Result<Self, ModelError> {
        let client = ReqwestClient::builder()
            .build()
            .map_err(ModelError::ReqwestClientBuild)?;
        Ok(Self {
            client,
            api_url,
            model,
            api_key,
        })
    }
}

#[async_trait]
impl Embedder for RemoteEmbedder {
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, ModelError> {
        let request_body = EmbeddingRequest {
            model: &self.model,
            input: texts,
        };
        debug!(batch_size = texts.len(), model = %self.model, "--> Sending request to embeddings API");

        let mut request_builder = self.client.post(&self.api_url).json(&request_body);
        if let Some(key) = &self.api_key {
            request_builder = request_builder.bearer_auth(key);
        }

        let response = request_builder.send().await.map_err(ModelError::Request)?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(ModelError::Api(error_text));
        }

        let embedding_response: EmbeddingResponse = response
            .json()
            .await
            .map_err(ModelError::Deserialization)?;

        if embedding_response.data.len() != texts.len() {
            return Err(ModelError::Api(format!(
                "embeddings API returned {} vectors for {} inputs",
                embedding_response.data.len(),
                texts.len()
            )));
        }

        Ok(embedding_response
            .data
            .into_iter()
            .map(|d| d.embedding)
            .collect())
    }
}
