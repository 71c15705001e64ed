//! The heuristic feedback engine: pure functions over answer text, with no
//! IO. This is the synchronous path used when the generative service is
//! unavailable, and the source of truth for classification and hint gating.

use rand::Rng;

use crate::models::feedback::FeedbackResult;
use crate::models::{ChallengeType, MistakeType};

pub mod classifier;
pub mod hints;
pub mod normalize;
pub mod severity;
pub mod templates;

pub use classifier::classify;
pub use hints::{adaptive_hints, encouragement, fallback_hint, HISTORY_WINDOW};
pub use normalize::{answers_match, normalize};
pub use severity::{base_severity, severity};

/// Praise for a correct answer: one rotated opener plus a fixed
/// per-challenge-type confirmation.
pub fn correct_feedback(challenge_type: ChallengeType) -> FeedbackResult {
    let opener = rand::rng().random_range(0..templates::PRAISE.len());

    FeedbackResult {
        is_correct: true,
        explanation: format!(
            "{} {}",
            templates::PRAISE[opener],
            templates::correct_note(challenge_type)
        ),
        grammar_rule: None,
        examples: None,
        alternatives: None,
        mistake_type: None,
        common_mistake_for_vietnamese: None,
        encouragement: "Hãy tiếp tục học tập để nâng cao trình độ!".to_string(),
    }
}

/// Full static feedback for an incorrect answer: classify, then assemble
/// explanation, rule, examples and encouragement from the template tables.
pub fn incorrect_feedback(
    user_answer: &str,
    correct_answer: &str,
    challenge_type: ChallengeType,
    mistake_history: &[MistakeType],
) -> FeedbackResult {
    let mistake_type = classify(user_answer, correct_answer, challenge_type);

    FeedbackResult {
        is_correct: false,
        explanation: templates::explanation(mistake_type, correct_answer),
        grammar_rule: Some(templates::grammar_rule(mistake_type).to_string()),
        examples: Some(
            templates::examples(mistake_type)
                .iter()
                .map(|s| s.to_string())
                .collect(),
        ),
        alternatives: Some(vec![correct_answer.to_string()]),
        mistake_type: Some(mistake_type),
        common_mistake_for_vietnamese: Some(
            templates::common_mistake_for_vietnamese(mistake_type).to_string(),
        ),
        encouragement: encouragement(mistake_type, mistake_history),
    }
}
