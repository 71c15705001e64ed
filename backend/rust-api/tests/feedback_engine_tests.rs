//! End-to-end scenarios through the heuristic feedback engine, exercising
//! classification, severity, hint gating and encouragement together.

use linggo_api::analysis::{
    self, adaptive_hints, answers_match, classify, severity, HISTORY_WINDOW,
};
use linggo_api::models::feedback::HintLevel;
use linggo_api::models::{ChallengeType, MistakeType};

#[test]
fn answer_matching_ignores_case_punctuation_and_spacing() {
    assert!(answers_match("  She IS a doctor. ", "she is a doctor"));
    assert!(answers_match("He goes to school!", "he goes to school"));
    assert!(!answers_match("She is a teacher", "she is a doctor"));
}

#[test]
fn missing_article_is_classified_before_vocabulary() {
    let mistake = classify("I have cat", "I have a cat", ChallengeType::FillInBlank);
    assert_eq!(mistake, MistakeType::Article);
}

#[test]
fn preposition_swap_is_detected() {
    let mistake = classify(
        "I am good in math",
        "I am good at math",
        ChallengeType::FillInBlank,
    );
    assert_eq!(mistake, MistakeType::Preposition);
}

#[test]
fn tense_disagreement_is_detected() {
    let mistake = classify(
        "I will go yesterday",
        "I went yesterday",
        ChallengeType::Translation,
    );
    assert_eq!(mistake, MistakeType::Tense);
}

#[test]
fn word_order_only_applies_to_word_order_challenges() {
    let mistake = classify("fast runs he", "he runs fast", ChallengeType::WordOrder);
    assert_eq!(mistake, MistakeType::WordOrder);

    // Same answers, different challenge: falls through to vocabulary.
    let mistake = classify("fast runs he", "he runs fast", ChallengeType::Translation);
    assert_eq!(mistake, MistakeType::Vocabulary);
}

#[test]
fn identical_answers_fall_back_to_other() {
    let mistake = classify("hello", "hello", ChallengeType::Select);
    assert_eq!(mistake, MistakeType::Other);
}

#[test]
fn repeated_mistakes_escalate_severity_and_encouragement() {
    // Fourth article mistake crosses the first escalation band.
    assert_eq!(severity(MistakeType::Article, 1), 2);
    assert_eq!(severity(MistakeType::Article, 4), 3);

    let history = vec![
        MistakeType::Article,
        MistakeType::Article,
        MistakeType::Article,
    ];
    let feedback = analysis::incorrect_feedback(
        "I have cat",
        "I have a cat",
        ChallengeType::FillInBlank,
        &history,
    );

    assert_eq!(feedback.mistake_type, Some(MistakeType::Article));
    assert!(feedback.encouragement.contains("Đừng nản chí"));
}

#[test]
fn hint_tiers_accumulate_across_attempts() {
    let history = vec![MistakeType::Tense; HISTORY_WINDOW];

    let first = adaptive_hints("q", "she has finished her homework", &history, 1);
    assert_eq!(first.len(), 1);
    assert_eq!(first[0].level, HintLevel::GrammarTip);

    let third = adaptive_hints("q", "she has finished her homework", &history, 3);
    assert_eq!(third.len(), 3);
    assert_eq!(third[1].level, HintLevel::Example);
    assert!(third[1].content.contains("she has finished her homework"));
    assert_eq!(third[2].level, HintLevel::PartialAnswer);
    // Five words: the partial hint keeps the first three.
    assert!(third[2].content.contains("she has finished..."));
}

#[test]
fn correct_answer_feedback_never_names_a_mistake() {
    let feedback = analysis::correct_feedback(ChallengeType::Assist);
    assert!(feedback.is_correct);
    assert!(feedback.mistake_type.is_none());
    assert!(feedback.grammar_rule.is_none());
    assert!(!feedback.encouragement.is_empty());
}

#[test]
fn incorrect_feedback_quotes_the_correct_answer() {
    let feedback = analysis::incorrect_feedback(
        "I have go",
        "I have gone",
        ChallengeType::FillInBlank,
        &[],
    );

    assert!(!feedback.is_correct);
    assert!(feedback.explanation.contains("I have gone"));
    assert_eq!(
        feedback.alternatives.as_deref(),
        Some(&["I have gone".to_string()][..])
    );
}
