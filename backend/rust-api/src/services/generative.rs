//! Client for the external generative text service (Gemini REST API) and
//! the strict response contract shared with it. Every failure mode here is
//! recoverable: callers fall back to the static engine in `analysis`.

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

use crate::config::Config;
use crate::models::feedback::{FeedbackResult, HintLevel};
use crate::models::{ChallengeType, MistakeType};

use crate::analysis::templates;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("generative service request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("generative service returned status {0}")]
    Status(u16),
    #[error("malformed generative response: {0}")]
    Malformed(String),
    #[error("generative service is not configured")]
    Disabled,
}

/// Narrow capability boundary around the model: one prompt in, one text
/// completion out. The production client and test doubles both implement
/// this, so the fallback path is exercisable without network access.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, ServiceError>;
}

pub struct GeminiClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl GeminiClient {
    pub fn new(config: &Config) -> Result<Self, ServiceError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.gemini_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.gemini_api_url.clone(),
            api_key: config.gemini_api_key.clone(),
            model: config.gemini_model.clone(),
        })
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, ServiceError> {
        if self.api_key.is_empty() {
            return Err(ServiceError::Disabled);
        }

        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );

        let body = serde_json::json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "generationConfig": { "temperature": 0.7, "topP": 0.95, "topK": 40 },
        });

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ServiceError::Status(response.status().as_u16()));
        }

        let payload: serde_json::Value = response.json().await?;
        let text = payload["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .ok_or_else(|| {
                ServiceError::Malformed("completion text missing from response".to_string())
            })?;

        Ok(text.to_string())
    }
}

/// The exact JSON object the model is instructed to return. Unknown fields
/// or a missing required field mean the whole payload is rejected; the
/// contract is all-or-nothing, never parsed partially.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct FeedbackPayload {
    explanation: String,
    #[serde(default)]
    grammar_rule: Option<String>,
    #[serde(default)]
    examples: Option<Vec<String>>,
    #[serde(default)]
    mistake_type: Option<MistakeType>,
    #[serde(default)]
    common_mistake_for_vietnamese: Option<String>,
    encouragement: String,
    #[serde(default)]
    alternatives: Option<Vec<String>>,
}

/// Models love wrapping JSON in markdown fences; strip them before parsing.
fn strip_code_fences(text: &str) -> String {
    text.replace("```json", "").replace("```", "").trim().to_string()
}

pub fn parse_feedback(raw: &str, is_correct: bool) -> Result<FeedbackResult, ServiceError> {
    let cleaned = strip_code_fences(raw);

    let payload: FeedbackPayload = serde_json::from_str(&cleaned)
        .map_err(|e| ServiceError::Malformed(e.to_string()))?;

    Ok(FeedbackResult {
        is_correct,
        explanation: payload.explanation,
        grammar_rule: payload.grammar_rule,
        examples: payload.examples,
        alternatives: payload.alternatives,
        mistake_type: payload.mistake_type,
        common_mistake_for_vietnamese: payload.common_mistake_for_vietnamese,
        encouragement: payload.encouragement,
    })
}

fn history_context(history: &[MistakeType]) -> String {
    if history.is_empty() {
        return String::new();
    }

    let names: Vec<&str> = history.iter().map(|m| m.as_str()).collect();
    format!("\n\nLịch sử lỗi gần đây của người học: {}", names.join(", "))
}

pub fn feedback_prompt(
    user_answer: &str,
    correct_answer: &str,
    question: &str,
    challenge_type: ChallengeType,
    is_correct: bool,
    history: &[MistakeType],
) -> String {
    format!(
        r#"Bạn là giáo viên tiếng Anh chuyên nghiệp, chuyên dạy cho người Việt Nam. Hãy phân tích câu trả lời và đưa ra phản hồi chi tiết.

**Loại bài tập:** {challenge}
**Câu hỏi:** {question}
**Câu trả lời:** {user_answer}
**Đáp án đúng:** {correct_answer}
**Kết quả:** {result}{history}

Hãy trả về JSON với cấu trúc sau (không thêm markdown formatting):
{{
  "explanation": "Giải thích chi tiết (2-3 câu, bằng tiếng Việt, xưng hô là 'bạn')",
  "grammarRule": "Quy tắc ngữ pháp liên quan (nếu có)",
  "examples": ["Ví dụ 1", "Ví dụ 2", "Ví dụ 3"],
  "mistakeType": "Một trong: ARTICLE, PREPOSITION, TENSE, SUBJECT_VERB_AGREEMENT, WORD_ORDER, VOCABULARY, SPELLING, PLURAL_SINGULAR, PRONOUN, ADJECTIVE_ADVERB, COMPARATIVE_SUPERLATIVE, MODAL_VERB, PASSIVE_ACTIVE, CONDITIONAL, OTHER",
  "commonMistakeForVietnamese": "Lỗi thường gặp với người Việt (nếu sai)",
  "encouragement": "Lời động viên ngắn gọn (xưng hô là 'bạn', không dùng 'em')",
  "alternatives": ["Các cách nói khác (nếu đúng)"]
}}

**Yêu cầu quan trọng:**
1. LUÔN xưng hô là "bạn", KHÔNG BAO GIỜ dùng "em"
2. Nếu đúng: Khen ngợi và giải thích tại sao đúng
3. Nếu sai: Giải thích rõ lỗi sai, chỉ ra quy tắc ngữ pháp, đưa ví dụ minh họa
4. Trả về ĐÚNG định dạng JSON, không thêm ```json hoặc text thừa"#,
        challenge = templates::challenge_label_vi(challenge_type),
        question = question,
        user_answer = user_answer,
        correct_answer = correct_answer,
        result = if is_correct { "Đúng" } else { "Sai" },
        history = history_context(history),
    )
}

pub fn hint_prompt(
    level: HintLevel,
    question: &str,
    correct_answer: &str,
    attempt_count: u32,
    history: &[MistakeType],
) -> String {
    let instruction = match level {
        HintLevel::GrammarTip => {
            "Đưa ra 1 mẹo ngữ pháp ngắn gọn (1 câu) liên quan đến câu hỏi. Xưng hô là 'bạn'."
        }
        HintLevel::Example => "Đưa ra 1 ví dụ tương tự để tham khảo. Xưng hô là 'bạn'.",
        HintLevel::PartialAnswer => {
            "Đưa ra một phần của đáp án (khoảng 30-50% đáp án) để gợi ý. Xưng hô là 'bạn'."
        }
    };

    format!(
        r#"Bạn là giáo viên tiếng Anh. Hãy tạo gợi ý cho người học.

**Câu hỏi:** {question}
**Đáp án đúng:** {correct_answer}
**Số lần thử:** {attempt_count}{history}

**Yêu cầu:** {instruction}
**Lưu ý:** LUÔN xưng hô là "bạn", KHÔNG dùng "em".

Chỉ trả về nội dung gợi ý (không giải thích thêm, không format markdown)."#,
        question = question,
        correct_answer = correct_answer,
        attempt_count = attempt_count,
        history = history_context(history),
        instruction = instruction,
    )
}

pub fn suggestion_prompt(mistake_type: MistakeType, count: u32) -> String {
    format!(
        r#"Bạn là giáo viên tiếng Anh. Người học đã mắc lỗi về {label} {count} lần.

Hãy đưa ra gợi ý cải thiện cụ thể (2-3 câu ngắn gọn): phương pháp học hiệu quả, tài nguyên nên dùng, mẹo ghi nhớ.

**Lưu ý:** LUÔN xưng hô là "bạn", KHÔNG dùng "em".
Trả về văn bản thuần, không format markdown."#,
        label = templates::mistake_label_vi(mistake_type),
        count = count,
    )
}

/// Full model round trip for answer feedback: prompt, completion, strict
/// parse. Any error here sends the caller to the static engine.
pub async fn generate_feedback(
    generator: &dyn TextGenerator,
    user_answer: &str,
    correct_answer: &str,
    question: &str,
    challenge_type: ChallengeType,
    is_correct: bool,
    history: &[MistakeType],
) -> Result<FeedbackResult, ServiceError> {
    let prompt = feedback_prompt(
        user_answer,
        correct_answer,
        question,
        challenge_type,
        is_correct,
        history,
    );
    let completion = generator.generate(&prompt).await?;
    parse_feedback(&completion, is_correct)
}

pub async fn generate_hint(
    generator: &dyn TextGenerator,
    level: HintLevel,
    question: &str,
    correct_answer: &str,
    attempt_count: u32,
    history: &[MistakeType],
) -> Result<String, ServiceError> {
    let prompt = hint_prompt(level, question, correct_answer, attempt_count, history);
    let completion = generator.generate(&prompt).await?;

    let hint = completion.trim().to_string();
    if hint.is_empty() {
        return Err(ServiceError::Malformed("empty hint completion".to_string()));
    }
    Ok(hint)
}

pub async fn generate_suggestion(
    generator: &dyn TextGenerator,
    mistake_type: MistakeType,
    count: u32,
) -> Result<String, ServiceError> {
    let completion = generator
        .generate(&suggestion_prompt(mistake_type, count))
        .await?;

    let suggestion = completion.trim().to_string();
    if suggestion.is_empty() {
        return Err(ServiceError::Malformed(
            "empty suggestion completion".to_string(),
        ));
    }
    Ok(suggestion)
}
