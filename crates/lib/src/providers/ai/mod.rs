pub mod embedding;
pub mod gemini;
pub mod local;

use crate::errors::ModelError;
use async_trait::async_trait;
use dyn_clone::DynClone;
pub use embedding::{Embedder, RemoteEmbedder};
use std::fmt::Debug;

/// A trait for interacting with a generative AI provider.
///
/// This defines the common interface used by the answer chain, the guardrail
/// relevance check, the context filter, and answer verification, so the same
/// code can talk to Gemini or any OpenAI-compatible endpoint.
#[async_trait]
pub trait AiProvider: Send + Sync + Debug + DynClone {
    /// Generates a response from a given system and user prompt.
    async fn generate(&self, system_prompt: &str, user_prompt: &str)
        -> Result<String, ModelError>;
}

dyn_clone::clone_trait_object!(AiProvider);
