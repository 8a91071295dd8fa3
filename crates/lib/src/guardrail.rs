//! # Query Guardrail
//!
//! A short-circuiting validation pipeline run before retrieval: length
//! check, meaningless-pattern check, and forbidden-keyword check are purely
//! local and always enforced; the final topical-relevance check delegates to
//! the model and fails open so an unavailable model never blocks users.
//!
//! Also hosts question categorization (analytics labeling only, never gates
//! behavior) and the canned fallback replies for chain failures.

use crate::judge::{judge, FailPolicy};
use crate::log::ExchangeStatus;
use crate::prompts::{RELEVANCE_SYSTEM_PROMPT, RELEVANCE_USER_PROMPT};
use crate::providers::ai::AiProvider;
use rand::seq::SliceRandom;
use regex::Regex;
use serde::Serialize;
use std::fmt;
use tracing::debug;

/// Outcome of validating one question. Produced fresh per query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardrailDecision {
    pub valid: bool,
    pub message: String,
    pub examples: Vec<String>,
}

impl GuardrailDecision {
    fn pass() -> Self {
        Self {
            valid: true,
            message: "질문이 유효합니다.".to_string(),
            examples: Vec::new(),
        }
    }

    fn reject(message: &str, examples: Vec<String>) -> Self {
        Self {
            valid: false,
            message: message.to_string(),
            examples,
        }
    }
}

/// Analytics category of a question, scored against fixed keyword sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionCategory {
    Application,
    Items,
    Grading,
    CoPayment,
    Eligibility,
    Blocked,
    Other,
}

impl QuestionCategory {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Application => "신청방법",
            Self::Items => "품목",
            Self::Grading => "등급신청조건",
            Self::CoPayment => "본인부담률",
            Self::Eligibility => "자격확인",
            Self::Blocked => "차단된질문",
            Self::Other => "기타",
        }
    }
}

impl fmt::Display for QuestionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Failure class of a chain error, mapped to a canned user-safe reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackKind {
    Search,
    Api,
    General,
}

const REJECT_TOO_SHORT: &str =
    "질문을 좀 더 구체적으로 작성해주세요. (예: \"복지용구 신청 방법이 궁금해요\")";
const REJECT_MEANINGLESS: &str =
    "구체적인 질문을 해주세요. 복지용구와 관련된 궁금한 점이 있으시면 언제든 물어보세요!";
const REJECT_OFF_TOPIC: &str = "죄송합니다. 저는 노인복지용구 관련 질문에만 답변할 수 있어요. \
복지용구와 관련된 궁금한 점이 있으시면 언제든 물어보세요!";
const REJECT_IRRELEVANT: &str = "죄송합니다. 저는 노인복지용구 전문 상담 챗봇입니다. \
복지용구 신청, 품목, 비용, 자격조건 등에 대해서만 답변할 수 있어요. \
복지용구와 관련된 궁금한 점이 있으시면 언제든 물어보세요!";

/// Number of example questions attached to every rejection.
const REJECTION_EXAMPLES: usize = 3;

pub struct Guardrails {
    meaningless_patterns: Vec<Regex>,
    forbidden_keywords: Vec<&'static str>,
    category_keywords: Vec<(QuestionCategory, Vec<&'static str>)>,
    example_questions: Vec<&'static str>,
}

impl Guardrails {
    pub fn new() -> Result<Self, regex::Error> {
        // Filler syllables, pure punctuation, one-or-two-syllable fragments,
        // and bare jamo strings such as "ㅁㄴㅇㄹ".
        let meaningless_patterns = ["^[아어음그저]+$", "^[?!]+$", "^[가-힣]{1,2}$", "^[ㄱ-ㅎㅏ-ㅣ]+$"]
            .into_iter()
            .map(Regex::new)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            meaningless_patterns,
            forbidden_keywords: vec![
                "욕설",
                "비속어",
                "음란",
                "선정적",
                "폭력",
                "혐오",
                "차별",
                "정치",
                "종교",
            ],
            category_keywords: vec![
                (
                    QuestionCategory::Application,
                    vec![
                        "신청방법",
                        "신청 방법",
                        "신청 절차",
                        "신청 서류",
                        "신청서",
                        "제출",
                        "접수",
                        "처리",
                        "어떻게 신청",
                        "신청하려면",
                    ],
                ),
                (
                    QuestionCategory::Items,
                    vec![
                        "품목",
                        "종류",
                        "제품",
                        "기구",
                        "장비",
                        "보조기구",
                        "재활용품",
                        "어떤 것들",
                        "품목에는",
                        "종류에는",
                    ],
                ),
                (
                    QuestionCategory::Grading,
                    vec![
                        "등급",
                        "등급 신청",
                        "등급 조건",
                        "등급 기준",
                        "등급 판정",
                        "등급 인정",
                        "등급 요건",
                        "자격조건",
                        "신청 조건",
                        "조건",
                    ],
                ),
                (
                    QuestionCategory::CoPayment,
                    vec![
                        "본인부담률",
                        "부담률",
                        "본인 부담",
                        "비용",
                        "금액",
                        "요금",
                        "가격",
                        "얼마",
                        "할인",
                        "부담",
                    ],
                ),
                (
                    QuestionCategory::Eligibility,
                    vec![
                        "자격",
                        "자격 확인",
                        "확인",
                        "조사",
                        "검토",
                        "심사",
                        "평가",
                        "판단",
                        "가능한지",
                        "신청 가능",
                    ],
                ),
            ],
            example_questions: vec![
                "복지용구 신청 방법이 궁금해요",
                "복지용구 품목에는 어떤 것들이 있나요?",
                "복지용구 등급 신청 조건은 어떻게 되나요?",
                "복지용구 본인부담률은 얼마인가요?",
                "복지용구 자격 확인은 어떻게 하나요?",
                "복지용구 신청 서류는 무엇이 필요한가요?",
                "복지용구 수급자 자격은 어떻게 되나요?",
                "복지용구 급여 서비스는 어떻게 받을 수 있나요?",
            ],
        })
    }

    /// Runs the full validation pipeline; the first failing stage decides.
    ///
    /// The first three stages are local and never call the model; the
    /// relevance check uses `judge_provider` and fails open on error.
    pub async fn validate(
        &self,
        question: &str,
        judge_provider: &dyn AiProvider,
    ) -> GuardrailDecision {
        let question = question.trim();

        // 1. Length check.
        if question.chars().count() <= 3 {
            return GuardrailDecision::reject(REJECT_TOO_SHORT, self.random_examples());
        }

        // 2. Meaningless-pattern check.
        if self
            .meaningless_patterns
            .iter()
            .any(|p| p.is_match(question))
        {
            return GuardrailDecision::reject(REJECT_MEANINGLESS, self.random_examples());
        }

        // 3. Forbidden-keyword check.
        if self.forbidden_keywords.iter().any(|k| question.contains(k)) {
            return GuardrailDecision::reject(REJECT_OFF_TOPIC, self.random_examples());
        }

        // 4. Topical-relevance check, fail-open.
        let user_prompt = RELEVANCE_USER_PROMPT.replace("{question}", question);
        let relevant = judge(
            judge_provider,
            RELEVANCE_SYSTEM_PROMPT,
            &user_prompt,
            "YES",
            FailPolicy::Open,
        )
        .await;
        if !relevant {
            debug!(question, "Question judged off-topic");
            return GuardrailDecision::reject(REJECT_IRRELEVANT, self.random_examples());
        }

        GuardrailDecision::pass()
    }

    /// Labels a question for analytics. Fallback exchanges always classify
    /// as blocked; otherwise the highest-scoring nonzero keyword category
    /// wins, defaulting to other.
    pub fn classify(&self, question: &str, status: ExchangeStatus) -> QuestionCategory {
        if status == ExchangeStatus::Fallback {
            return QuestionCategory::Blocked;
        }

        let question = question.to_lowercase();
        let mut best = (QuestionCategory::Other, 0usize);
        for (category, keywords) in &self.category_keywords {
            let score = keywords.iter().filter(|k| question.contains(*k)).count();
            if score > best.1 {
                best = (*category, score);
            }
        }
        best.0
    }

    /// Three random example questions, offered alongside every rejection.
    pub fn random_examples(&self) -> Vec<String> {
        let mut rng = rand::thread_rng();
        self.example_questions
            .choose_multiple(&mut rng, REJECTION_EXAMPLES)
            .map(|s| s.to_string())
            .collect()
    }

    /// The first example questions, shown on the welcome screen.
    pub fn welcome_examples(&self) -> Vec<String> {
        self.example_questions
            .iter()
            .take(5)
            .map(|s| s.to_string())
            .collect()
    }

    /// The canned user-safe reply for a chain failure class.
    pub fn fallback_message(&self, kind: FallbackKind) -> &'static str {
        match kind {
            FallbackKind::Search => {
                "죄송합니다. 현재 검색에 문제가 있어요. 잠시 후 다시 시도해주세요."
            }
            FallbackKind::Api => {
                "죄송합니다. 서비스에 일시적인 문제가 있어요. 잠시 후 다시 시도해주세요."
            }
            FallbackKind::General => {
                "죄송합니다. 예상치 못한 오류가 발생했어요. 잠시 후 다시 시도해주세요."
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_scores_copayment() {
        let g = Guardrails::new().unwrap();
        assert_eq!(
            g.classify("복지용구 본인부담률은 얼마인가요?", ExchangeStatus::Success),
            QuestionCategory::CoPayment
        );
    }

    #[test]
    fn classify_defaults_to_other() {
        let g = Guardrails::new().unwrap();
        assert_eq!(
            g.classify("복지용구가 궁금해요", ExchangeStatus::Success),
            QuestionCategory::Other
        );
    }

    #[test]
    fn fallback_status_forces_blocked_category() {
        let g = Guardrails::new().unwrap();
        assert_eq!(
            g.classify("복지용구 본인부담률은 얼마인가요?", ExchangeStatus::Fallback),
            QuestionCategory::Blocked
        );
    }

    #[test]
    fn random_examples_returns_three_distinct() {
        let g = Guardrails::new().unwrap();
        let examples = g.random_examples();
        assert_eq!(examples.len(), 3);
        let mut deduped = examples.clone();
        deduped.sort();
        deduped.dedup();
        assert_eq!(deduped.len(), 3);
    }
}
