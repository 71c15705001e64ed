use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::MistakeType;

/// One incorrect submission. Append-only; never updated after insert.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MistakeRecord {
    #[serde(rename = "_id")]
    pub id: String,
    pub user_id: String,
    pub challenge_id: i64,
    pub mistake_type: MistakeType,
    pub user_answer: String,
    pub correct_answer: String,
    pub explanation: String,
    pub timestamp: DateTime<Utc>,
}

/// Rolling per-(user, mistake type) counter. The `_id` is
/// `"{user_id}:{TYPE}"` so the one-row-per-pair invariant is enforced by the
/// collection itself and the count can be bumped with an atomic upsert.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrammarWeakness {
    #[serde(rename = "_id")]
    pub id: String,
    pub user_id: String,
    pub mistake_type: MistakeType,
    pub count: u32,
    pub last_occurrence: DateTime<Utc>,
    pub severity: u8,
}

impl GrammarWeakness {
    pub fn key(user_id: &str, mistake_type: MistakeType) -> String {
        format!("{}:{}", user_id, mistake_type.as_str())
    }
}

/// Two short phrases one user keeps substituting for each other.
/// Lookups must match `(word1, word2)` in either order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfusingWordPair {
    #[serde(rename = "_id")]
    pub id: String,
    pub user_id: String,
    pub word1: String,
    pub word2: String,
    pub mistake_count: u32,
    pub last_mistake: DateTime<Utc>,
    pub explanation: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackType {
    Explanation,
    Hint,
    Encouragement,
}

/// Feedback shown to a learner. `was_helpful` is the only mutable field,
/// set once by an explicit rating call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiFeedbackRecord {
    #[serde(rename = "_id")]
    pub id: String,
    pub user_id: String,
    pub challenge_id: i64,
    pub feedback_type: FeedbackType,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub was_helpful: Option<bool>,
    pub timestamp: DateTime<Utc>,
}
