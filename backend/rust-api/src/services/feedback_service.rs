use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use mongodb::bson::doc;
use mongodb::Database;
use redis::aio::ConnectionManager;
use uuid::Uuid;

use crate::analysis::{self, HISTORY_WINDOW};
use crate::metrics::{
    record_cache_hit, record_cache_miss, AI_REQUESTS_TOTAL, FEEDBACK_SERVED_TOTAL,
    HINTS_SERVED_TOTAL,
};
use crate::models::feedback::{
    AdaptiveHintsRequest, AdaptiveHintsResponse, AnswerFeedbackRequest, AnswerFeedbackResponse,
    FeedbackResult, FeedbackSource, HintLevel, ImprovementSuggestion, SingleHintResponse,
};
use crate::models::mistake::{AiFeedbackRecord, FeedbackType};

use super::generative::{self, TextGenerator};
use super::mistake_service::MistakeService;

/// Cached feedback lives five minutes: long enough to absorb retry storms
/// on a popular challenge, short enough to pick up content fixes.
const FEEDBACK_CACHE_TTL_SECS: u32 = 300;

const SUGGESTION_LIMIT: usize = 3;

/// Cache key for resolved answer feedback. The payload is personalized
/// (encouragement and explanations are biased by the submitter's mistake
/// history), so the key must scope to the user; two learners giving the
/// same wrong answer never share an entry.
fn feedback_cache_key(user_id: &str, challenge_id: i64, user_answer: &str) -> String {
    format!(
        "feedback:cache:{}:{}:{}",
        user_id,
        challenge_id,
        analysis::normalize(user_answer)
    )
}

pub struct FeedbackService {
    mongo: Database,
    redis: ConnectionManager,
    generator: Arc<dyn TextGenerator>,
}

impl FeedbackService {
    pub fn new(
        mongo: Database,
        redis: ConnectionManager,
        generator: Arc<dyn TextGenerator>,
    ) -> Self {
        Self {
            mongo,
            redis,
            generator,
        }
    }

    fn feedback_history(&self) -> mongodb::Collection<AiFeedbackRecord> {
        self.mongo.collection("ai_feedback_history")
    }

    /// Grade one answer and produce feedback: cache first, then the model,
    /// then the static engine. Incorrect answers are folded into the
    /// mistake-tracking collections before the response goes out.
    pub async fn answer_feedback(
        &self,
        user_id: &str,
        req: &AnswerFeedbackRequest,
    ) -> Result<AnswerFeedbackResponse> {
        let is_correct = analysis::answers_match(&req.user_answer, &req.correct_answer);
        tracing::info!(
            "Answer feedback: user={}, challenge={}, correct={}",
            user_id,
            req.challenge_id,
            is_correct
        );

        let mistakes = MistakeService::new(self.mongo.clone());
        let history = mistakes
            .recent_mistake_types(user_id, HISTORY_WINDOW)
            .await?;

        let cache_key = feedback_cache_key(user_id, req.challenge_id, &req.user_answer);

        let (feedback, source) = match self.cached_feedback(&cache_key).await {
            Ok(Some(cached)) => {
                record_cache_hit();
                (cached, FeedbackSource::Cache)
            }
            Ok(None) => {
                record_cache_miss();
                self.model_or_fallback(req, is_correct, &history, &cache_key)
                    .await
            }
            Err(e) => {
                // A broken cache never blocks feedback.
                tracing::warn!("Feedback cache lookup failed: {:#}", e);
                self.model_or_fallback(req, is_correct, &history, &cache_key)
                    .await
            }
        };

        if !is_correct {
            let mistake_type =
                analysis::classify(&req.user_answer, &req.correct_answer, req.challenge_type);
            mistakes
                .record_mistake(
                    user_id,
                    req.challenge_id,
                    mistake_type,
                    &req.user_answer,
                    &req.correct_answer,
                    &feedback.explanation,
                )
                .await?;
        }

        let feedback_id = self
            .store_feedback(
                user_id,
                req.challenge_id,
                FeedbackType::Explanation,
                &feedback.explanation,
            )
            .await?;

        FEEDBACK_SERVED_TOTAL
            .with_label_values(&[source.as_str()])
            .inc();

        Ok(AnswerFeedbackResponse {
            feedback_id: Some(feedback_id),
            source,
            feedback,
        })
    }

    async fn model_or_fallback(
        &self,
        req: &AnswerFeedbackRequest,
        is_correct: bool,
        history: &[crate::models::MistakeType],
        cache_key: &str,
    ) -> (FeedbackResult, FeedbackSource) {
        match generative::generate_feedback(
            self.generator.as_ref(),
            &req.user_answer,
            &req.correct_answer,
            &req.question,
            req.challenge_type,
            is_correct,
            history,
        )
        .await
        {
            Ok(feedback) => {
                AI_REQUESTS_TOTAL.with_label_values(&["ok"]).inc();
                if let Err(e) = self.cache_feedback(cache_key, &feedback).await {
                    tracing::warn!("Failed to cache feedback: {:#}", e);
                }
                (feedback, FeedbackSource::Model)
            }
            Err(e) => {
                AI_REQUESTS_TOTAL.with_label_values(&["error"]).inc();
                tracing::warn!("Generative feedback unavailable, using fallback: {:#}", e);

                let feedback = if is_correct {
                    analysis::correct_feedback(req.challenge_type)
                } else {
                    analysis::incorrect_feedback(
                        &req.user_answer,
                        &req.correct_answer,
                        req.challenge_type,
                        history,
                    )
                };
                (feedback, FeedbackSource::Fallback)
            }
        }
    }

    async fn cached_feedback(&self, cache_key: &str) -> Result<Option<FeedbackResult>> {
        let mut conn = self.redis.clone();

        let cached: Option<String> = redis::cmd("GET")
            .arg(cache_key)
            .query_async(&mut conn)
            .await
            .context("Failed to read feedback cache")?;

        match cached {
            Some(json) => {
                let feedback =
                    serde_json::from_str(&json).context("Failed to deserialize cached feedback")?;
                Ok(Some(feedback))
            }
            None => Ok(None),
        }
    }

    async fn cache_feedback(&self, cache_key: &str, feedback: &FeedbackResult) -> Result<()> {
        let mut conn = self.redis.clone();
        let json = serde_json::to_string(feedback).context("Failed to serialize feedback")?;

        redis::cmd("SETEX")
            .arg(cache_key)
            .arg(FEEDBACK_CACHE_TTL_SECS)
            .arg(&json)
            .query_async::<()>(&mut conn)
            .await
            .context("Failed to cache feedback")?;

        Ok(())
    }

    /// All hint tiers the learner has unlocked so far. Purely heuristic; the
    /// model is never consulted for the batch endpoint.
    pub async fn adaptive_hints(
        &self,
        user_id: &str,
        req: &AdaptiveHintsRequest,
    ) -> Result<AdaptiveHintsResponse> {
        let mistakes = MistakeService::new(self.mongo.clone());
        let history = mistakes
            .recent_mistake_types(user_id, HISTORY_WINDOW)
            .await?;

        let hints =
            analysis::adaptive_hints(&req.question, &req.correct_answer, &history, req.attempt_count);

        for hint in &hints {
            HINTS_SERVED_TOTAL
                .with_label_values(&[hint.level.as_str()])
                .inc();
        }

        // Keep the strongest tier on record so hint usage shows up in the
        // learner's feedback history.
        if let Some(strongest) = hints.last() {
            self.store_feedback(
                user_id,
                req.challenge_id,
                FeedbackType::Hint,
                &strongest.content,
            )
            .await?;
        }

        Ok(AdaptiveHintsResponse { hints })
    }

    /// One explicitly requested hint tier, model-written when possible.
    pub async fn single_hint(
        &self,
        user_id: &str,
        level: HintLevel,
        req: &AdaptiveHintsRequest,
    ) -> Result<SingleHintResponse> {
        let mistakes = MistakeService::new(self.mongo.clone());
        let history = mistakes
            .recent_mistake_types(user_id, HISTORY_WINDOW)
            .await?;

        let (content, source) = match generative::generate_hint(
            self.generator.as_ref(),
            level,
            &req.question,
            &req.correct_answer,
            req.attempt_count,
            &history,
        )
        .await
        {
            Ok(content) => {
                AI_REQUESTS_TOTAL.with_label_values(&["ok"]).inc();
                (content, FeedbackSource::Model)
            }
            Err(e) => {
                AI_REQUESTS_TOTAL.with_label_values(&["error"]).inc();
                tracing::warn!("Generative hint unavailable, using fallback: {:#}", e);
                (
                    analysis::fallback_hint(level, &req.correct_answer),
                    FeedbackSource::Fallback,
                )
            }
        };

        HINTS_SERVED_TOTAL.with_label_values(&[level.as_str()]).inc();
        self.store_feedback(user_id, req.challenge_id, FeedbackType::Hint, &content)
            .await?;

        Ok(SingleHintResponse {
            level,
            content,
            source,
        })
    }

    /// Mark stored feedback helpful or not. Returns false when the id does
    /// not exist or belongs to another user.
    pub async fn rate_feedback(
        &self,
        user_id: &str,
        feedback_id: &str,
        was_helpful: bool,
    ) -> Result<bool> {
        let result = self
            .feedback_history()
            .update_one(
                doc! { "_id": feedback_id, "user_id": user_id },
                doc! { "$set": { "was_helpful": was_helpful } },
            )
            .await
            .context("Failed to rate feedback")?;

        Ok(result.matched_count > 0)
    }

    /// Study suggestions for the learner's three worst weaknesses. Each one
    /// independently tries the model and falls back to the static copy.
    pub async fn improvement_suggestions(
        &self,
        user_id: &str,
    ) -> Result<Vec<ImprovementSuggestion>> {
        let mistakes = MistakeService::new(self.mongo.clone());
        let weaknesses = mistakes.weaknesses(user_id).await?;

        let mut suggestions = Vec::new();
        for weakness in weaknesses.into_iter().take(SUGGESTION_LIMIT) {
            let (suggestion, source) = match generative::generate_suggestion(
                self.generator.as_ref(),
                weakness.mistake_type,
                weakness.count,
            )
            .await
            {
                Ok(text) => {
                    AI_REQUESTS_TOTAL.with_label_values(&["ok"]).inc();
                    (text, FeedbackSource::Model)
                }
                Err(e) => {
                    AI_REQUESTS_TOTAL.with_label_values(&["error"]).inc();
                    tracing::warn!("Generative suggestion unavailable: {:#}", e);
                    (
                        crate::analysis::templates::improvement_suggestion(
                            weakness.mistake_type,
                            weakness.count,
                        ),
                        FeedbackSource::Fallback,
                    )
                }
            };

            suggestions.push(ImprovementSuggestion {
                mistake_type: weakness.mistake_type,
                severity: weakness.severity,
                count: weakness.count,
                suggestion,
                source,
            });
        }

        Ok(suggestions)
    }

    async fn store_feedback(
        &self,
        user_id: &str,
        challenge_id: i64,
        feedback_type: FeedbackType,
        content: &str,
    ) -> Result<String> {
        let record = AiFeedbackRecord {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            challenge_id,
            feedback_type,
            content: content.to_string(),
            was_helpful: None,
            timestamp: Utc::now(),
        };

        self.feedback_history()
            .insert_one(&record)
            .await
            .context("Failed to store feedback history")?;

        Ok(record.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_keys_are_scoped_per_user() {
        // Encouragement in the cached payload is history-tailored, so two
        // learners with the same wrong answer must not share an entry.
        let a = feedback_cache_key("user-a", 42, "I have cat");
        let b = feedback_cache_key("user-b", 42, "I have cat");
        assert_ne!(a, b);
        assert!(a.contains("user-a"));
    }

    #[test]
    fn cache_keys_normalize_the_answer() {
        assert_eq!(
            feedback_cache_key("user-a", 42, "  I Have CAT! "),
            feedback_cache_key("user-a", 42, "i have cat")
        );
    }

    #[test]
    fn cache_keys_separate_challenges() {
        assert_ne!(
            feedback_cache_key("user-a", 42, "i have cat"),
            feedback_cache_key("user-a", 43, "i have cat")
        );
    }
}
