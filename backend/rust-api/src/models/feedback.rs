use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{ChallengeType, MistakeType};

#[derive(Debug, Deserialize, Validate)]
pub struct AnswerFeedbackRequest {
    pub challenge_id: i64,
    pub challenge_type: ChallengeType,
    #[validate(length(min = 1, max = 1000))]
    pub question: String,
    #[validate(length(min = 1, max = 500))]
    pub user_answer: String,
    #[validate(length(min = 1, max = 500))]
    pub correct_answer: String,
    pub attempt_count: u32,
}

/// Learner-facing feedback, whether it came from the model, the Redis cache
/// or the static fallback engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackResult {
    pub is_correct: bool,
    pub explanation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grammar_rule: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub examples: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alternatives: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mistake_type: Option<MistakeType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub common_mistake_for_vietnamese: Option<String>,
    pub encouragement: String,
}

/// Where a served feedback payload came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackSource {
    Cache,
    Model,
    Fallback,
}

impl FeedbackSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeedbackSource::Cache => "cache",
            FeedbackSource::Model => "model",
            FeedbackSource::Fallback => "fallback",
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AnswerFeedbackResponse {
    /// Id of the stored `ai_feedback_history` row, for later rating.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback_id: Option<String>,
    pub source: FeedbackSource,
    #[serde(flatten)]
    pub feedback: FeedbackResult,
}

/// Progressive hint tiers, unlocked by attempt count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HintLevel {
    GrammarTip,
    Example,
    PartialAnswer,
}

impl HintLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            HintLevel::GrammarTip => "grammar_tip",
            HintLevel::Example => "example",
            HintLevel::PartialAnswer => "partial_answer",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdaptiveHint {
    pub level: HintLevel,
    pub content: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct AdaptiveHintsRequest {
    pub challenge_id: i64,
    #[validate(length(min = 1, max = 1000))]
    pub question: String,
    #[validate(length(min = 1, max = 500))]
    pub correct_answer: String,
    pub attempt_count: u32,
}

#[derive(Debug, Serialize)]
pub struct AdaptiveHintsResponse {
    pub hints: Vec<AdaptiveHint>,
}

#[derive(Debug, Serialize)]
pub struct SingleHintResponse {
    pub level: HintLevel,
    pub content: String,
    pub source: FeedbackSource,
}

#[derive(Debug, Deserialize)]
pub struct RateFeedbackRequest {
    pub was_helpful: bool,
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct MistakeTypeCount {
    pub mistake_type: MistakeType,
    pub count: u64,
    /// Integer percentage of the user's total mistakes, rounded.
    pub percentage: u32,
}

#[derive(Debug, Serialize)]
pub struct MistakeStatistics {
    pub total: u64,
    pub by_type: Vec<MistakeTypeCount>,
}

#[derive(Debug, Serialize)]
pub struct ImprovementSuggestion {
    pub mistake_type: MistakeType,
    pub severity: u8,
    pub count: u32,
    pub suggestion: String,
    pub source: FeedbackSource,
}
