//! # Retrieval-Filter-Generate Chain
//!
//! The query-time pipeline: guardrail → top-k retrieval → per-chunk
//! relevance filter → answer generation. Every failure past the guardrail
//! is converted to a canned fallback reply; no raw error ever reaches the
//! caller, and every handled question is emitted as a [`ChatExchange`].

use crate::guardrail::{FallbackKind, Guardrails};
use crate::index::{Chunk, IndexError};
use crate::judge::{judge, FailPolicy};
use crate::log::{ChatExchange, ExchangeSink, ExchangeStatus};
use crate::prompts::{
    ANSWER_VERIFY_SYSTEM_PROMPT, ANSWER_VERIFY_USER_PROMPT, CONTEXT_FILTER_SYSTEM_PROMPT,
    CONTEXT_FILTER_USER_PROMPT, RAG_SYSTEM_PROMPT, RAG_USER_PROMPT,
};
use crate::providers::ai::{AiProvider, Embedder};
use crate::store::IndexStore;
use crate::ModelError;
use futures::future::join_all;
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info, warn};

/// Number of candidates fetched from the index per question.
pub const RETRIEVAL_K: usize = 15;
/// Maximum number of chunks kept after the relevance filter.
pub const CONTEXT_CAP: usize = 10;
/// How much of a chunk the relevance filter shows the model.
const FILTER_SNIPPET_CHARS: usize = 500;

/// What the query interface returns for every question.
#[derive(Debug, Clone, Serialize)]
pub struct ChatReply {
    pub answer: String,
    pub success: bool,
    pub is_fallback: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub examples: Option<Vec<String>>,
}

#[derive(Error, Debug)]
enum ChainError {
    #[error("query embedding failed: {0}")]
    Embedding(ModelError),
    #[error("index search failed: {0}")]
    Search(#[from] IndexError),
    #[error("answer generation failed: {0}")]
    Generation(ModelError),
}

/// The chat service: owns the live index handle, the model providers, the
/// guardrail, and the exchange sink.
pub struct ChatEngine {
    store: Arc<IndexStore>,
    embedder: Box<dyn Embedder>,
    chat_provider: Box<dyn AiProvider>,
    judge_provider: Box<dyn AiProvider>,
    guardrails: Guardrails,
    sink: Box<dyn ExchangeSink>,
}

impl ChatEngine {
    pub fn new(
        store: Arc<IndexStore>,
        embedder: Box<dyn Embedder>,
        chat_provider: Box<dyn AiProvider>,
        judge_provider: Box<dyn AiProvider>,
        guardrails: Guardrails,
        sink: Box<dyn ExchangeSink>,
    ) -> Self {
        Self {
            store,
            embedder,
            chat_provider,
            judge_provider,
            guardrails,
            sink,
        }
    }

    pub fn guardrails(&self) -> &Guardrails {
        &self.guardrails
    }

    /// Handles one question end to end. Always returns a user-safe reply.
    pub async fn ask(&self, question: &str, user_id: &str) -> ChatReply {
        let question = question.trim();
        debug!(user_id, question, "Handling question");

        let decision = self
            .guardrails
            .validate(question, self.judge_provider.as_ref())
            .await;
        if !decision.valid {
            self.record(question, &decision.message, ExchangeStatus::Fallback);
            return ChatReply {
                answer: decision.message,
                success: false,
                is_fallback: true,
                examples: Some(decision.examples),
            };
        }

        match self.run_chain(question).await {
            Ok(answer) => {
                self.record(question, &answer, ExchangeStatus::Success);
                ChatReply {
                    answer,
                    success: true,
                    is_fallback: false,
                    examples: None,
                }
            }
            Err(e) => {
                error!(error = %e, "Chain failed, returning fallback reply");
                let message = self.guardrails.fallback_message(FallbackKind::Search);
                self.record(question, message, ExchangeStatus::Fallback);
                ChatReply {
                    answer: message.to_string(),
                    success: false,
                    is_fallback: true,
                    examples: None,
                }
            }
        }
    }

    /// Re-asks the model whether `answer` contains one of the known fact
    /// errors; if flagged, regenerates through the same retrieval pipeline.
    /// Not wired into [`Self::ask`]; callers opt in.
    pub async fn verify_and_correct(&self, question: &str, answer: &str) -> String {
        let user_prompt = ANSWER_VERIFY_USER_PROMPT
            .replace("{question}", question)
            .replace("{answer}", answer);
        let flagged = judge(
            self.judge_provider.as_ref(),
            ANSWER_VERIFY_SYSTEM_PROMPT,
            &user_prompt,
            "BLOCK",
            FailPolicy::Closed,
        )
        .await;

        if !flagged {
            return answer.to_string();
        }

        warn!(question, "Generated answer flagged, regenerating");
        match self.run_chain(question).await {
            Ok(corrected) => corrected,
            Err(e) => {
                warn!(error = %e, "Regeneration failed, keeping the original answer");
                answer.to_string()
            }
        }
    }

    async fn run_chain(&self, question: &str) -> Result<String, ChainError> {
        // 1. Retrieve.
        let query_vector = self
            .embedder
            .embed(question)
            .await
            .map_err(ChainError::Embedding)?;
        let candidates = self.store.search(&query_vector, RETRIEVAL_K)?;
        info!(candidates = candidates.len(), "Retrieved candidate chunks");

        // 2. Filter.
        let kept = self.filter_context(question, candidates).await;

        // 3. Generate.
        let context = kept
            .iter()
            .map(|c| c.text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n");
        let user_prompt = RAG_USER_PROMPT
            .replace("{context}", &context)
            .replace("{question}", question);
        self.chat_provider
            .generate(RAG_SYSTEM_PROMPT, &user_prompt)
            .await
            .map_err(ChainError::Generation)
    }

    /// Keeps only chunks the model judges relevant, capped at
    /// [`CONTEXT_CAP`]. Judgments run concurrently but the kept set follows
    /// retrieval rank, and each judgment fails open, so a broken filter
    /// degrades to the first raw candidates instead of an empty context.
    async fn filter_context(&self, question: &str, candidates: Vec<Chunk>) -> Vec<Chunk> {
        let judgments = candidates.iter().map(|chunk| {
            let snippet: String = chunk.text.chars().take(FILTER_SNIPPET_CHARS).collect();
            let user_prompt = CONTEXT_FILTER_USER_PROMPT
                .replace("{question}", question)
                .replace("{snippet}", &snippet);
            async move {
                judge(
                    self.judge_provider.as_ref(),
                    CONTEXT_FILTER_SYSTEM_PROMPT,
                    &user_prompt,
                    "관련있음",
                    FailPolicy::Open,
                )
                .await
            }
        });
        let keep: Vec<bool> = join_all(judgments).await;

        let kept: Vec<Chunk> = candidates
            .into_iter()
            .zip(keep)
            .filter_map(|(chunk, keep)| keep.then_some(chunk))
            .take(CONTEXT_CAP)
            .collect();
        info!(kept = kept.len(), "Context filter complete");
        kept
    }

    fn record(&self, question: &str, answer: &str, status: ExchangeStatus) {
        let category = self.guardrails.classify(question, status);
        self.sink
            .record(ChatExchange::new(question, answer, status, category));
    }
}
