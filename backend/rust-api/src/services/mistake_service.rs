use anyhow::{Context, Result};
use chrono::Utc;
use mongodb::bson::doc;
use mongodb::options::ReturnDocument;
use mongodb::Database;
use uuid::Uuid;

use crate::analysis::{self, severity};
use crate::metrics::MISTAKES_RECORDED_TOTAL;
use crate::models::feedback::{MistakeStatistics, MistakeTypeCount};
use crate::models::mistake::{ConfusingWordPair, GrammarWeakness, MistakeRecord};
use crate::models::MistakeType;

const DEFAULT_HISTORY_LIMIT: i64 = 20;
const MAX_HISTORY_LIMIT: i64 = 100;

/// Answers this short get compared as whole phrases when looking for a
/// confusable pair; anything longer is too noisy to track.
const CONFUSING_PHRASE_MAX_WORDS: usize = 5;

/// Lookup filter for a confusing pair. The pair is unordered: the stored
/// row may hold the phrases as (word1, word2) in either order, and both
/// argument orders build the identical filter, so (A, B) and (B, A) always
/// find and increment the same record.
fn confusing_pair_filter(
    user_id: &str,
    phrase_a: &str,
    phrase_b: &str,
) -> mongodb::bson::Document {
    let (first, second) = if phrase_a <= phrase_b {
        (phrase_a, phrase_b)
    } else {
        (phrase_b, phrase_a)
    };

    doc! {
        "user_id": user_id,
        "$or": [
            { "word1": first, "word2": second },
            { "word1": second, "word2": first },
        ],
    }
}

pub struct MistakeService {
    mongo: Database,
}

impl MistakeService {
    pub fn new(mongo: Database) -> Self {
        Self { mongo }
    }

    fn mistakes(&self) -> mongodb::Collection<MistakeRecord> {
        self.mongo.collection("user_mistakes")
    }

    fn weaknesses_collection(&self) -> mongodb::Collection<GrammarWeakness> {
        self.mongo.collection("grammar_weaknesses")
    }

    fn pairs_collection(&self) -> mongodb::Collection<ConfusingWordPair> {
        self.mongo.collection("confusing_word_pairs")
    }

    /// Record one incorrect submission and fold it into the derived
    /// collections: the per-type weakness counter and, when the answers are
    /// short phrases, the confusing-pair tracker.
    pub async fn record_mistake(
        &self,
        user_id: &str,
        challenge_id: i64,
        mistake_type: MistakeType,
        user_answer: &str,
        correct_answer: &str,
        explanation: &str,
    ) -> Result<()> {
        tracing::info!(
            "Recording mistake: user={}, challenge={}, type={}",
            user_id,
            challenge_id,
            mistake_type.as_str()
        );

        let record = MistakeRecord {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            challenge_id,
            mistake_type,
            user_answer: user_answer.to_string(),
            correct_answer: correct_answer.to_string(),
            explanation: explanation.to_string(),
            timestamp: Utc::now(),
        };

        self.mistakes()
            .insert_one(&record)
            .await
            .context("Failed to insert mistake record")?;

        self.bump_weakness(user_id, mistake_type).await?;
        self.track_confusing_pair(user_id, user_answer, correct_answer)
            .await?;

        MISTAKES_RECORDED_TOTAL
            .with_label_values(&[mistake_type.as_str()])
            .inc();

        Ok(())
    }

    /// Increment the weakness counter with an atomic upsert keyed by the
    /// composite `_id`, then derive severity from the returned count. Two
    /// concurrent bumps may race on the severity write, but both compute it
    /// from a counter that only grows, so the stored value never regresses
    /// by more than one band and the next bump repairs it.
    async fn bump_weakness(&self, user_id: &str, mistake_type: MistakeType) -> Result<()> {
        let collection = self.weaknesses_collection();
        let key = GrammarWeakness::key(user_id, mistake_type);
        let now = mongodb::bson::to_bson(&Utc::now())?;

        let updated = collection
            .find_one_and_update(
                doc! { "_id": &key },
                doc! {
                    "$inc": { "count": 1 },
                    "$set": { "last_occurrence": &now },
                    "$setOnInsert": {
                        "user_id": user_id,
                        "mistake_type": mistake_type.as_str(),
                        "severity": severity(mistake_type, 1) as i32,
                    },
                },
            )
            .upsert(true)
            .return_document(ReturnDocument::After)
            .await
            .context("Failed to upsert grammar weakness")?
            .ok_or_else(|| anyhow::anyhow!("Weakness upsert returned no document"))?;

        let new_severity = severity(mistake_type, updated.count);
        if new_severity != updated.severity {
            collection
                .update_one(
                    doc! { "_id": &key },
                    doc! { "$set": { "severity": new_severity as i32 } },
                )
                .await
                .context("Failed to update weakness severity")?;
        }

        Ok(())
    }

    /// Track short answers the user keeps swapping. Both phrases must fit
    /// the word limit after normalization and actually differ.
    async fn track_confusing_pair(
        &self,
        user_id: &str,
        user_answer: &str,
        correct_answer: &str,
    ) -> Result<()> {
        let user_phrase = analysis::normalize(user_answer);
        let correct_phrase = analysis::normalize(correct_answer);

        if user_phrase.is_empty()
            || user_phrase == correct_phrase
            || user_phrase.split(' ').count() > CONFUSING_PHRASE_MAX_WORDS
            || correct_phrase.split(' ').count() > CONFUSING_PHRASE_MAX_WORDS
        {
            return Ok(());
        }

        let collection = self.pairs_collection();
        let now = mongodb::bson::to_bson(&Utc::now())?;

        let filter = confusing_pair_filter(user_id, &user_phrase, &correct_phrase);

        let existing = collection
            .find_one_and_update(
                filter,
                doc! {
                    "$inc": { "mistake_count": 1 },
                    "$set": { "last_mistake": &now },
                },
            )
            .await
            .context("Failed to update confusing pair")?;

        if existing.is_none() {
            // Find-then-insert without a unique index: two concurrent first
            // mistakes on the same pair can create two rows. Both rows keep
            // counting, so the signal survives.
            let pair = ConfusingWordPair {
                id: Uuid::new_v4().to_string(),
                user_id: user_id.to_string(),
                word1: user_phrase.clone(),
                word2: correct_phrase.clone(),
                mistake_count: 1,
                last_mistake: Utc::now(),
                explanation: crate::analysis::templates::confusing_pair_explanation(
                    &user_phrase,
                    &correct_phrase,
                ),
            };

            collection
                .insert_one(&pair)
                .await
                .context("Failed to insert confusing pair")?;
        }

        Ok(())
    }

    /// Newest-first mistake history, capped at 100 records.
    pub async fn history(&self, user_id: &str, limit: Option<i64>) -> Result<Vec<MistakeRecord>> {
        let limit = limit
            .unwrap_or(DEFAULT_HISTORY_LIMIT)
            .clamp(1, MAX_HISTORY_LIMIT);

        let mut cursor = self
            .mistakes()
            .find(doc! { "user_id": user_id })
            .sort(doc! { "timestamp": -1 })
            .limit(limit)
            .await
            .context("Failed to query mistake history")?;

        let mut records = Vec::new();
        while cursor.advance().await? {
            records.push(cursor.deserialize_current()?);
        }

        Ok(records)
    }

    /// The learner's most recent mistake categories in chronological order,
    /// ready for the hint and encouragement heuristics.
    pub async fn recent_mistake_types(
        &self,
        user_id: &str,
        n: usize,
    ) -> Result<Vec<MistakeType>> {
        let recent = self.history(user_id, Some(n as i64)).await?;

        let mut types: Vec<MistakeType> = recent.iter().map(|r| r.mistake_type).collect();
        types.reverse();
        Ok(types)
    }

    /// Weaknesses ordered worst-first: severity, then occurrence count.
    pub async fn weaknesses(&self, user_id: &str) -> Result<Vec<GrammarWeakness>> {
        let mut cursor = self
            .weaknesses_collection()
            .find(doc! { "user_id": user_id })
            .sort(doc! { "severity": -1, "count": -1 })
            .await
            .context("Failed to query grammar weaknesses")?;

        let mut weaknesses = Vec::new();
        while cursor.advance().await? {
            weaknesses.push(cursor.deserialize_current()?);
        }

        Ok(weaknesses)
    }

    pub async fn confusing_pairs(&self, user_id: &str) -> Result<Vec<ConfusingWordPair>> {
        let mut cursor = self
            .pairs_collection()
            .find(doc! { "user_id": user_id })
            .sort(doc! { "mistake_count": -1 })
            .await
            .context("Failed to query confusing pairs")?;

        let mut pairs = Vec::new();
        while cursor.advance().await? {
            pairs.push(cursor.deserialize_current()?);
        }

        Ok(pairs)
    }

    /// Per-type counts with integer percentages, computed from the weakness
    /// counters rather than a full history scan.
    pub async fn statistics(&self, user_id: &str) -> Result<MistakeStatistics> {
        let weaknesses = self.weaknesses(user_id).await?;

        let total: u64 = weaknesses.iter().map(|w| u64::from(w.count)).sum();
        if total == 0 {
            return Ok(MistakeStatistics {
                total: 0,
                by_type: Vec::new(),
            });
        }

        let mut by_type: Vec<MistakeTypeCount> = weaknesses
            .iter()
            .map(|w| MistakeTypeCount {
                mistake_type: w.mistake_type,
                count: u64::from(w.count),
                percentage: ((u64::from(w.count) * 100 + total / 2) / total) as u32,
            })
            .collect();
        by_type.sort_by(|a, b| b.count.cmp(&a.count));

        Ok(MistakeStatistics { total, by_type })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confusing_pair_lookup_is_symmetric() {
        // A row inserted from (A, B) must be found and incremented when the
        // next mistake arrives as (B, A).
        let forward = confusing_pair_filter("user-1", "affect", "effect");
        let backward = confusing_pair_filter("user-1", "effect", "affect");
        assert_eq!(forward, backward);
    }

    #[test]
    fn confusing_pair_filter_matches_rows_stored_in_either_order() {
        let filter = confusing_pair_filter("user-1", "your", "you're");

        let or_clauses = filter.get_array("$or").unwrap();
        assert_eq!(or_clauses.len(), 2);

        let stored_orders: Vec<(&str, &str)> = or_clauses
            .iter()
            .map(|clause| {
                let doc = clause.as_document().unwrap();
                (doc.get_str("word1").unwrap(), doc.get_str("word2").unwrap())
            })
            .collect();

        assert!(stored_orders.contains(&("your", "you're")));
        assert!(stored_orders.contains(&("you're", "your")));
    }

    #[test]
    fn confusing_pair_filter_is_scoped_to_the_user() {
        let filter = confusing_pair_filter("user-1", "then", "than");
        assert_eq!(filter.get_str("user_id").unwrap(), "user-1");

        assert_ne!(filter, confusing_pair_filter("user-2", "then", "than"));
    }
}
