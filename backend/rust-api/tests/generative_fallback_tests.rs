//! The generative layer's contract with its callers: well-formed completions
//! are parsed strictly, and every failure mode surfaces as an error the
//! caller can translate into static fallback content.

use async_trait::async_trait;

use linggo_api::analysis;
use linggo_api::models::feedback::HintLevel;
use linggo_api::models::{ChallengeType, MistakeType};
use linggo_api::services::generative::{
    generate_feedback, generate_hint, ServiceError, TextGenerator,
};

struct CannedGenerator(&'static str);

#[async_trait]
impl TextGenerator for CannedGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String, ServiceError> {
        Ok(self.0.to_string())
    }
}

struct FailingGenerator;

#[async_trait]
impl TextGenerator for FailingGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String, ServiceError> {
        Err(ServiceError::Status(503))
    }
}

#[tokio::test]
async fn well_formed_completion_becomes_feedback() {
    let generator = CannedGenerator(
        r#"```json
{
  "explanation": "Bạn đã dùng sai thì của động từ.",
  "grammarRule": "Thì quá khứ đơn diễn tả hành động đã kết thúc.",
  "examples": ["I went home yesterday."],
  "mistakeType": "TENSE",
  "commonMistakeForVietnamese": "Tiếng Việt không chia thì động từ.",
  "encouragement": "Cố lên bạn nhé!"
}
```"#,
    );

    let feedback = generate_feedback(
        &generator,
        "I go home yesterday",
        "I went home yesterday",
        "Translate the sentence",
        ChallengeType::Translation,
        false,
        &[],
    )
    .await
    .unwrap();

    assert!(!feedback.is_correct);
    assert_eq!(feedback.mistake_type, Some(MistakeType::Tense));
    assert_eq!(feedback.encouragement, "Cố lên bạn nhé!");
}

#[tokio::test]
async fn prose_completion_is_rejected_not_partially_parsed() {
    let generator = CannedGenerator("Xin lỗi, tôi không thể trả lời câu hỏi này.");

    let result = generate_feedback(
        &generator,
        "I have cat",
        "I have a cat",
        "Fill in the blank",
        ChallengeType::FillInBlank,
        false,
        &[],
    )
    .await;

    assert!(matches!(result, Err(ServiceError::Malformed(_))));
}

#[tokio::test]
async fn upstream_error_propagates_to_the_caller() {
    let result = generate_feedback(
        &FailingGenerator,
        "I have cat",
        "I have a cat",
        "Fill in the blank",
        ChallengeType::FillInBlank,
        false,
        &[],
    )
    .await;

    assert!(matches!(result, Err(ServiceError::Status(503))));
}

#[tokio::test]
async fn failed_generation_has_a_static_equivalent() {
    // What a caller does after the model errors out: same shape, same
    // mistake classification, no model involved.
    let result = generate_feedback(
        &FailingGenerator,
        "I have cat",
        "I have a cat",
        "Fill in the blank",
        ChallengeType::FillInBlank,
        false,
        &[],
    )
    .await;
    assert!(result.is_err());

    let fallback =
        analysis::incorrect_feedback("I have cat", "I have a cat", ChallengeType::FillInBlank, &[]);
    assert!(!fallback.is_correct);
    assert_eq!(fallback.mistake_type, Some(MistakeType::Article));
    assert!(fallback.grammar_rule.is_some());
}

#[tokio::test]
async fn hint_completion_is_trimmed_and_non_empty() {
    let generator = CannedGenerator("  Hãy chú ý đến thì của động từ.  \n");

    let hint = generate_hint(
        &generator,
        HintLevel::GrammarTip,
        "Complete the sentence",
        "she goes to school",
        1,
        &[MistakeType::Tense],
    )
    .await
    .unwrap();

    assert_eq!(hint, "Hãy chú ý đến thì của động từ.");
}

#[tokio::test]
async fn blank_hint_completion_is_malformed() {
    let generator = CannedGenerator("   \n  ");

    let result = generate_hint(
        &generator,
        HintLevel::Example,
        "Complete the sentence",
        "she goes to school",
        2,
        &[],
    )
    .await;

    assert!(matches!(result, Err(ServiceError::Malformed(_))));
}

#[tokio::test]
async fn static_hint_fallback_covers_every_level() {
    let correct = "she goes to school";

    let tip = analysis::fallback_hint(HintLevel::GrammarTip, correct);
    assert!(!tip.is_empty());

    let example = analysis::fallback_hint(HintLevel::Example, correct);
    assert!(example.contains(correct));

    let partial = analysis::fallback_hint(HintLevel::PartialAnswer, correct);
    assert!(partial.contains("she goes..."));
    assert!(!partial.contains("to school"));
}
