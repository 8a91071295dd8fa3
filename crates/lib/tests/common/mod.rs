//! # Common Test Utilities
//!
//! Scripted in-process doubles for the model providers plus an in-memory
//! exchange sink, so the pipeline can be exercised deterministically and
//! call counts can be asserted.

#![allow(unused)]

use async_trait::async_trait;
use bokji::log::{ChatExchange, ExchangeSink};
use bokji::providers::ai::{AiProvider, Embedder};
use bokji::ModelError;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// An `AiProvider` that pops scripted replies and counts every call.
///
/// When the script runs out, `default_reply` is served if set; otherwise the
/// call fails like a broken model endpoint.
#[derive(Clone, Debug, Default)]
pub struct MockAi {
    script: Arc<Mutex<VecDeque<Result<String, String>>>>,
    default_reply: Option<String>,
    calls: Arc<AtomicUsize>,
    prompts: Arc<Mutex<Vec<(String, String)>>>,
}

impl MockAi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_default(reply: &str) -> Self {
        Self {
            default_reply: Some(reply.to_string()),
            ..Self::default()
        }
    }

    pub fn push_reply(&self, reply: &str) -> &Self {
        self.script
            .lock()
            .unwrap()
            .push_back(Ok(reply.to_string()));
        self
    }

    pub fn push_error(&self) -> &Self {
        self.script
            .lock()
            .unwrap()
            .push_back(Err("scripted model failure".to_string()));
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// The `(system, user)` prompt pairs seen so far.
    pub fn prompts(&self) -> Vec<(String, String)> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl AiProvider for MockAi {
    async fn generate(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, ModelError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts
            .lock()
            .unwrap()
            .push((system_prompt.to_string(), user_prompt.to_string()));

        let scripted = self.script.lock().unwrap().pop_front();
        match scripted {
            Some(Ok(reply)) => Ok(reply),
            Some(Err(message)) => Err(ModelError::Api(message)),
            None => match &self.default_reply {
                Some(reply) => Ok(reply.clone()),
                None => Err(ModelError::Api("mock script exhausted".to_string())),
            },
        }
    }
}

/// A deterministic embedder: the vector is a byte histogram of the text, so
/// identical text always embeds identically and similar text scores high.
#[derive(Clone, Debug, Default)]
pub struct StubEmbedder {
    batches: Arc<AtomicUsize>,
}

impl StubEmbedder {
    pub const DIM: usize = 8;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn batch_count(&self) -> usize {
        self.batches.load(Ordering::SeqCst)
    }

    pub fn vector_for(text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; Self::DIM];
        for (i, byte) in text.bytes().enumerate() {
            vector[i % Self::DIM] += byte as f32;
        }
        vector
    }
}

#[async_trait]
impl Embedder for StubEmbedder {
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, ModelError> {
        self.batches.fetch_add(1, Ordering::SeqCst);
        Ok(texts.iter().map(|t| Self::vector_for(t)).collect())
    }
}

/// An embedder that rejects any batch containing a text longer than
/// `max_chars`, like an embeddings API with a per-request token cap.
#[derive(Clone, Debug)]
pub struct CappedEmbedder {
    max_chars: usize,
    inner: StubEmbedder,
}

impl CappedEmbedder {
    pub fn new(max_chars: usize) -> Self {
        Self {
            max_chars,
            inner: StubEmbedder::new(),
        }
    }

    pub fn batch_count(&self) -> usize {
        self.inner.batch_count()
    }
}

#[async_trait]
impl Embedder for CappedEmbedder {
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, ModelError> {
        if texts.iter().any(|t| t.chars().count() > self.max_chars) {
            return Err(ModelError::Api(
                "max_tokens_per_request exceeded".to_string(),
            ));
        }
        self.inner.embed_batch(texts).await
    }
}

/// Collects exchanges in memory for assertions.
#[derive(Clone, Default)]
pub struct MemorySink {
    exchanges: Arc<Mutex<Vec<ChatExchange>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn exchanges(&self) -> Vec<ChatExchange> {
        self.exchanges.lock().unwrap().clone()
    }
}

impl ExchangeSink for MemorySink {
    fn record(&self, exchange: ChatExchange) {
        self.exchanges.lock().unwrap().push(exchange);
    }
}
