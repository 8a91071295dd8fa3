//! # Common Test Utilities
//!
//! This module centralizes the test harness used across the `bokji-server`
//! integration tests. `TestApp` spawns the real Axum server on a random
//! port, backed by a temporary index directory and corpus file, with the
//! chat and embeddings APIs pointed at an `httpmock::MockServer`.

#![allow(unused)]

use anyhow::Result;
use bokji_server::{
    config::{AppConfig, EmbeddingConfig, ProviderConfig, TasksConfig},
    router::create_router,
    state::build_app_state,
};
use httpmock::prelude::*;
use reqwest::Client;
use serde_json::json;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::PathBuf;
use tempfile::TempDir;
use tokio::{net::TcpListener, task::JoinHandle};

/// The corpus record every `TestApp` starts with.
pub const SEED_TITLE: &str = "복지용구 본인부담률 안내";
pub const SEED_CONTENT: &str =
    "복지용구 본인부담률은 일반 수급자의 경우 15%입니다. 기초생활수급자는 무료입니다.";

/// A harness for end-to-end testing of the Axum server.
pub struct TestApp {
    pub address: String,
    pub client: Client,
    pub mock_server: MockServer,
    pub corpus_path: PathBuf,
    _dir: TempDir,
    _server_handle: JoinHandle<()>,
}

impl TestApp {
    /// Spawns the application server and returns a `TestApp` instance.
    ///
    /// The seeded corpus holds exactly one short record, so every embeddings
    /// request made by the startup build (and by single-record adds) carries
    /// exactly one input.
    pub async fn spawn() -> Result<Self> {
        // `try_init` is used to prevent panic if the logger is already initialized.
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .compact()
            .try_init();

        let mock_server = MockServer::start();

        // Every embeddings request is answered with one fixed vector.
        mock_server.mock(|when, then| {
            when.method(POST).path("/v1/embeddings");
            then.status(200).json_body(json!({
                "data": [{ "embedding": [0.1, 0.2, 0.3, 0.4] }]
            }));
        });

        let dir = tempfile::tempdir()?;
        let corpus_path = dir.path().join("corpus.json");
        std::fs::write(
            &corpus_path,
            serde_json::to_vec_pretty(&json!([{
                "title": SEED_TITLE,
                "url": "https://example.com/post/1",
                "content": SEED_CONTENT,
                "attachments": []
            }]))?,
        )?;

        let config = AppConfig {
            port: 0,
            index_dir: dir.path().join("index").to_string_lossy().into_owned(),
            corpus_path: corpus_path.to_string_lossy().into_owned(),
            embedding: EmbeddingConfig {
                api_url: mock_server.url("/v1/embeddings"),
                model_name: "mock-embedding-model".to_string(),
                api_key: None,
            },
            providers: HashMap::from([(
                "default".to_string(),
                ProviderConfig {
                    provider: "local".to_string(),
                    api_url: Some(mock_server.url("/v1/chat/completions")),
                    api_key: None,
                    model_name: "mock-model".to_string(),
                },
            )]),
            tasks: TasksConfig::default(),
        };

        let app_state = build_app_state(config).await?;
        let app = create_router(app_state);

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr: SocketAddr = listener.local_addr()?;
        let address = format!("http://{addr}");

        let server_handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!("[TestApp] Server error: {}", e);
            }
        });

        Ok(Self {
            address,
            client: Client::new(),
            mock_server,
            corpus_path,
            _dir: dir,
            _server_handle: server_handle,
        })
    }

    /// Mocks the answer the guardrail relevance judgment gives.
    pub fn mock_relevance(&self, verdict: &str) {
        let verdict = verdict.to_string();
        self.mock_server.mock(|when, then| {
            when.method(POST)
                .path("/v1/chat/completions")
                .body_contains("관련이 있으면");
            then.status(200).json_body(json!({
                "choices": [{ "message": { "role": "assistant", "content": verdict } }]
            }));
        });
    }

    /// Mocks the answer the per-chunk context filter gives.
    pub fn mock_context_filter(&self, verdict: &str) {
        let verdict = verdict.to_string();
        self.mock_server.mock(|when, then| {
            when.method(POST)
                .path("/v1/chat/completions")
                .body_contains("관련없음\\\"으로만");
            then.status(200).json_body(json!({
                "choices": [{ "message": { "role": "assistant", "content": verdict } }]
            }));
        });
    }

    /// Mocks the generated answer.
    pub fn mock_generation(&self, answer: &str) {
        let answer = answer.to_string();
        self.mock_server.mock(|when, then| {
            when.method(POST)
                .path("/v1/chat/completions")
                .body_contains("#Context:");
            then.status(200).json_body(json!({
                "choices": [{ "message": { "role": "assistant", "content": answer } }]
            }));
        });
    }
}
