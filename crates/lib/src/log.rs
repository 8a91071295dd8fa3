//! # Exchange Logging
//!
//! The core emits one [`ChatExchange`] per handled question; where they end
//! up (CSV, database, nothing) is the embedding application's business, so
//! the only contract here is the [`ExchangeSink`] trait.

use crate::guardrail::QuestionCategory;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExchangeStatus {
    Success,
    Fallback,
}

/// One handled question/answer pair, produced for the logging collaborator.
#[derive(Debug, Clone, Serialize)]
pub struct ChatExchange {
    pub timestamp: DateTime<Utc>,
    pub question: String,
    pub answer: String,
    pub status: ExchangeStatus,
    pub category: QuestionCategory,
}

impl ChatExchange {
    pub fn new(
        question: &str,
        answer: &str,
        status: ExchangeStatus,
        category: QuestionCategory,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            question: question.to_string(),
            answer: answer.to_string(),
            status,
            category,
        }
    }
}

/// Receives every handled exchange. Implementations must not fail the chat
/// path; recording problems are theirs to swallow and log.
pub trait ExchangeSink: Send + Sync {
    fn record(&self, exchange: ChatExchange);
}

/// A sink that emits exchanges as structured log events.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl ExchangeSink for TracingSink {
    fn record(&self, exchange: ChatExchange) {
        info!(
            question = %exchange.question,
            status = ?exchange.status,
            category = %exchange.category,
            "chat exchange"
        );
    }
}
