use lazy_static::lazy_static;
use regex::Regex;

use crate::models::{ChallengeType, MistakeType};

const ARTICLES: [&str; 3] = ["a", "an", "the"];

const PREPOSITIONS: [&str; 19] = [
    "in", "on", "at", "to", "for", "with", "from", "by", "about", "of", "into", "through",
    "during", "before", "after", "above", "below", "between", "among",
];

lazy_static! {
    static ref FUTURE_MARKERS: Regex = Regex::new(r"(?i)\b(will|shall|going to)\b").unwrap();
    static ref PAST_MARKERS: Regex = Regex::new(r"(?i)\b(ed|was|were|had|did)\b").unwrap();
    static ref SINGULAR_SUBJECT_PLURAL_VERB: Regex =
        Regex::new(r"(?i)\b(he|she|it)\s+(are|do)\b").unwrap();
    static ref SINGULAR_SUBJECT_SINGULAR_VERB: Regex =
        Regex::new(r"(?i)\b(he|she|it)\s+(is|does)\b").unwrap();
    static ref PLURAL_SUBJECT_SINGULAR_VERB: Regex =
        Regex::new(r"(?i)\b(I|you|we|they)\s+(is|does)\b").unwrap();
    static ref PLURAL_SUBJECT_PLURAL_VERB: Regex =
        Regex::new(r"(?i)\b(I|you|we|they)\s+(are|do)\b").unwrap();
}

/// Assign exactly one mistake category to an incorrect answer.
///
/// Detectors run in fixed priority order and the first hit wins, so cheap
/// closed-class checks (articles, prepositions) are never masked by the
/// catch-all vocabulary rule. Reordering changes classification results;
/// the order is part of the contract. Spelling and the remaining categories
/// are only ever produced by the external model, not by this chain.
pub fn classify(
    user_answer: &str,
    correct_answer: &str,
    challenge_type: ChallengeType,
) -> MistakeType {
    let user_words = tokenize(user_answer);
    let correct_words = tokenize(correct_answer);

    if has_article_error(&user_words, &correct_words) {
        return MistakeType::Article;
    }

    if has_preposition_error(&user_words, &correct_words) {
        return MistakeType::Preposition;
    }

    if tense_of(user_answer) != tense_of(correct_answer) {
        return MistakeType::Tense;
    }

    if has_subject_verb_agreement_error(user_answer, correct_answer) {
        return MistakeType::SubjectVerbAgreement;
    }

    // Word-order challenges are tagged as such regardless of content.
    if challenge_type == ChallengeType::WordOrder {
        return MistakeType::WordOrder;
    }

    if has_plural_error(&user_words, &correct_words) {
        return MistakeType::PluralSingular;
    }

    if has_vocabulary_error(&user_words, &correct_words) {
        return MistakeType::Vocabulary;
    }

    MistakeType::Other
}

fn tokenize(answer: &str) -> Vec<String> {
    answer
        .to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

fn closed_class_sequence<'a>(words: &'a [String], class: &[&str]) -> Vec<&'a str> {
    words
        .iter()
        .filter(|w| class.contains(&w.as_str()))
        .map(String::as_str)
        .collect()
}

fn has_article_error(user_words: &[String], correct_words: &[String]) -> bool {
    closed_class_sequence(user_words, &ARTICLES)
        != closed_class_sequence(correct_words, &ARTICLES)
}

fn has_preposition_error(user_words: &[String], correct_words: &[String]) -> bool {
    closed_class_sequence(user_words, &PREPOSITIONS)
        != closed_class_sequence(correct_words, &PREPOSITIONS)
}

#[derive(PartialEq)]
enum Tense {
    Future,
    Past,
    Present,
}

// Deliberately coarse: marker words only, no morphology.
fn tense_of(sentence: &str) -> Tense {
    if FUTURE_MARKERS.is_match(sentence) {
        Tense::Future
    } else if PAST_MARKERS.is_match(sentence) {
        Tense::Past
    } else {
        Tense::Present
    }
}

fn has_subject_verb_agreement_error(user_answer: &str, correct_answer: &str) -> bool {
    (SINGULAR_SUBJECT_PLURAL_VERB.is_match(user_answer)
        && SINGULAR_SUBJECT_SINGULAR_VERB.is_match(correct_answer))
        || (PLURAL_SUBJECT_SINGULAR_VERB.is_match(user_answer)
            && PLURAL_SUBJECT_PLURAL_VERB.is_match(correct_answer))
}

fn has_plural_error(user_words: &[String], correct_words: &[String]) -> bool {
    user_words.iter().zip(correct_words.iter()).any(|(u, c)| {
        u != c
            && (format!("{}s", u) == *c
                || format!("{}es", u) == *c
                || format!("{}s", c) == *u
                || format!("{}es", c) == *u)
    })
}

// Mirrors the positional diff of the original heuristic: every user token is
// compared against the correct token at the same index, so extra trailing
// user words also count as a mismatch.
fn has_vocabulary_error(user_words: &[String], correct_words: &[String]) -> bool {
    user_words
        .iter()
        .enumerate()
        .any(|(i, w)| correct_words.get(i) != Some(w))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn article_mismatch_wins_over_later_detectors() {
        // "run"/"runs" would also trip the vocabulary and plural checks.
        let got = classify("a dog run fast", "the dog runs fast", ChallengeType::Select);
        assert_eq!(got, MistakeType::Article);
    }

    #[test]
    fn missing_article_is_an_article_error() {
        let got = classify("I have cat", "I have a cat", ChallengeType::Select);
        assert_eq!(got, MistakeType::Article);
    }

    #[test]
    fn preposition_substitution() {
        let got = classify(
            "she is good in english",
            "she is good at english",
            ChallengeType::FillInBlank,
        );
        assert_eq!(got, MistakeType::Preposition);
    }

    #[test]
    fn tense_disagreement_beats_vocabulary() {
        let got = classify(
            "i will study math",
            "i was study math",
            ChallengeType::Translation,
        );
        assert_eq!(got, MistakeType::Tense);
    }

    #[test]
    fn subject_verb_agreement() {
        let got = classify("He are happy", "He is happy", ChallengeType::Select);
        assert_eq!(got, MistakeType::SubjectVerbAgreement);
    }

    #[test]
    fn plural_agreement_alone_is_not_subject_verb() {
        // No pronoun subject, so the agreement regexes stay quiet and the
        // -s suffix diff reaches the plural detector.
        let got = classify("two book", "two books", ChallengeType::FillInBlank);
        assert_eq!(got, MistakeType::PluralSingular);
    }

    #[test]
    fn es_suffix_counts_as_plural() {
        let got = classify("three box", "three boxes", ChallengeType::FillInBlank);
        assert_eq!(got, MistakeType::PluralSingular);
    }

    #[test]
    fn word_order_challenge_is_tagged_unconditionally() {
        // "apple"/"apples" would otherwise be a plural error.
        let got = classify(
            "eat i an apple",
            "i eat an apples",
            ChallengeType::WordOrder,
        );
        assert_eq!(got, MistakeType::WordOrder);
    }

    #[test]
    fn lexical_substitution_is_vocabulary() {
        let got = classify(
            "i want to see english",
            "i want to learn english",
            ChallengeType::Translation,
        );
        assert_eq!(got, MistakeType::Vocabulary);
    }

    #[test]
    fn extra_trailing_words_are_vocabulary() {
        let got = classify(
            "i like tea very much indeed",
            "i like tea",
            ChallengeType::Translation,
        );
        assert_eq!(got, MistakeType::Vocabulary);
    }

    #[test]
    fn identical_token_streams_fall_through_to_other() {
        // Same words, so nothing in the chain fires (casing is ignored).
        let got = classify("He Is Happy", "he is happy", ChallengeType::Select);
        assert_eq!(got, MistakeType::Other);
    }
}
