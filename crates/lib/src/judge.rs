//! # Constrained Yes/No Judgment
//!
//! The guardrail relevance check, the post-retrieval context filter, and
//! answer verification are all the same operation: ask the model a
//! constrained question and look for one affirmative token in the reply.
//! This module provides that operation once, parameterized by prompts and
//! by what happens when the model call itself fails.

use crate::providers::ai::AiProvider;
use tracing::warn;

/// What a judgment defaults to when the model call errors out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailPolicy {
    /// Treat the judgment as affirmative (availability over strictness).
    Open,
    /// Treat the judgment as negative.
    Closed,
}

/// Asks `provider` the given prompts and returns whether the reply contains
/// `affirmative` (case-insensitive). On a model error, returns the value
/// implied by `on_error`.
pub async fn judge(
    provider: &dyn AiProvider,
    system_prompt: &str,
    user_prompt: &str,
    affirmative: &str,
    on_error: FailPolicy,
) -> bool {
    match provider.generate(system_prompt, user_prompt).await {
        Ok(reply) => reply
            .to_uppercase()
            .contains(&affirmative.to_uppercase()),
        Err(e) => {
            warn!(error = %e, policy = ?on_error, "Judgment call failed, applying fail policy");
            matches!(on_error, FailPolicy::Open)
        }
    }
}
