//! # Application State
//!
//! This module defines the shared application state (`AppState`) and the logic
//! for building it at startup. The `AppState` holds all shared resources: the
//! configuration, the live index store, the ingestion orchestrator, and the
//! chat engine with its instantiated AI provider clients.

use crate::config::{AppConfig, ProviderConfig};
use bokji::{
    providers::ai::{gemini::GeminiProvider, local::LocalAiProvider, AiProvider},
    ChatEngine, Guardrails, IndexStore, Ingestor, RemoteEmbedder, TracingSink,
};
use std::sync::Arc;

/// The shared application state, accessible from all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// The application's configuration, loaded from `config.yml`.
    pub config: Arc<AppConfig>,
    /// The guardrail-validated retrieval and generation pipeline.
    pub engine: Arc<ChatEngine>,
    /// Orchestrates corpus ingestion and index rebuilds.
    pub ingestor: Arc<Ingestor>,
    /// The live vector index, shared with the engine and the ingestor.
    pub store: Arc<IndexStore>,
}

/// Instantiates one AI provider client from its configuration entry.
fn build_provider(name: &str, config: &ProviderConfig) -> anyhow::Result<Box<dyn AiProvider>> {
    let provider: Box<dyn AiProvider> = match config.provider.as_str() {
        "gemini" => {
            let api_key = config
                .api_key
                .clone()
                .ok_or_else(|| anyhow::anyhow!("api_key is required for gemini provider '{name}'"))?;
            // If api_url is not provided in config, construct it from the model name.
            let api_url = config.api_url.clone().unwrap_or_else(|| {
                format!(
                    "https://generativelanguage.googleapis.com/v1beta/models/{}:generateContent",
                    config.model_name
                )
            });
            Box::new(GeminiProvider::new(api_url, api_key)?)
        }
        "local" => {
            // For local providers, the URL is always required.
            let api_url = config.api_url.clone().ok_or_else(|| {
                anyhow::anyhow!(
                    "api_url is required for local provider '{name}'. Please set LOCAL_AI_API_URL in your .env file."
                )
            })?;
            Box::new(LocalAiProvider::new(
                api_url,
                config.api_key.clone(),
                Some(config.model_name.clone()),
            )?)
        }
        other => {
            return Err(anyhow::anyhow!(
                "Unsupported AI provider type '{other}' for provider '{name}'"
            ));
        }
    };
    Ok(provider)
}

/// Builds the shared application state from the configuration.
///
/// This opens (or creates) the index store, builds the index from the corpus
/// when no snapshot exists, and wires the providers into the chat engine.
pub async fn build_app_state(config: AppConfig) -> anyhow::Result<AppState> {
    let resolve = |task: &str, name: &str| -> anyhow::Result<Box<dyn AiProvider>> {
        let provider_config = config
            .providers
            .get(name)
            .ok_or_else(|| anyhow::anyhow!("Task '{task}' references unknown provider '{name}'"))?;
        build_provider(name, provider_config)
    };
    let chat_provider = resolve("chat", &config.tasks.chat)?;
    let judge_provider = resolve("judge", &config.tasks.judge)?;

    let embedder = RemoteEmbedder::new(
        config.embedding.api_url.clone(),
        config.embedding.model_name.clone(),
        config.embedding.api_key.clone(),
    )?;

    let store = Arc::new(IndexStore::open(&config.index_dir)?);
    let ingestor = Arc::new(Ingestor::new(
        store.clone(),
        Box::new(embedder.clone()),
        &config.corpus_path,
    ));
    ingestor.load_or_build().await?;

    let engine = Arc::new(ChatEngine::new(
        store.clone(),
        Box::new(embedder),
        chat_provider,
        judge_provider,
        Guardrails::new()?,
        Box::new(TracingSink),
    ));

    Ok(AppState {
        config: Arc::new(config),
        engine,
        ingestor,
        store,
    })
}
