use serde::{Deserialize, Serialize};

/// Closed set of grammar-mistake categories. Every recorded mistake carries
/// exactly one of these; the classifier's priority order decides ties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MistakeType {
    Article,
    Preposition,
    Tense,
    SubjectVerbAgreement,
    WordOrder,
    Vocabulary,
    Spelling,
    PluralSingular,
    Pronoun,
    AdjectiveAdverb,
    ComparativeSuperlative,
    ModalVerb,
    PassiveActive,
    Conditional,
    Other,
}

impl MistakeType {
    pub const ALL: [MistakeType; 15] = [
        MistakeType::Article,
        MistakeType::Preposition,
        MistakeType::Tense,
        MistakeType::SubjectVerbAgreement,
        MistakeType::WordOrder,
        MistakeType::Vocabulary,
        MistakeType::Spelling,
        MistakeType::PluralSingular,
        MistakeType::Pronoun,
        MistakeType::AdjectiveAdverb,
        MistakeType::ComparativeSuperlative,
        MistakeType::ModalVerb,
        MistakeType::PassiveActive,
        MistakeType::Conditional,
        MistakeType::Other,
    ];

    /// Wire/storage name, also used in weakness `_id` keys and metric labels.
    pub fn as_str(&self) -> &'static str {
        match self {
            MistakeType::Article => "ARTICLE",
            MistakeType::Preposition => "PREPOSITION",
            MistakeType::Tense => "TENSE",
            MistakeType::SubjectVerbAgreement => "SUBJECT_VERB_AGREEMENT",
            MistakeType::WordOrder => "WORD_ORDER",
            MistakeType::Vocabulary => "VOCABULARY",
            MistakeType::Spelling => "SPELLING",
            MistakeType::PluralSingular => "PLURAL_SINGULAR",
            MistakeType::Pronoun => "PRONOUN",
            MistakeType::AdjectiveAdverb => "ADJECTIVE_ADVERB",
            MistakeType::ComparativeSuperlative => "COMPARATIVE_SUPERLATIVE",
            MistakeType::ModalVerb => "MODAL_VERB",
            MistakeType::PassiveActive => "PASSIVE_ACTIVE",
            MistakeType::Conditional => "CONDITIONAL",
            MistakeType::Other => "OTHER",
        }
    }
}

/// Challenge widget kinds supported by the lesson UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChallengeType {
    Select,
    Assist,
    Translation,
    ReverseTranslation,
    FillInBlank,
    MatchingPairs,
    WordOrder,
}

impl ChallengeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChallengeType::Select => "SELECT",
            ChallengeType::Assist => "ASSIST",
            ChallengeType::Translation => "TRANSLATION",
            ChallengeType::ReverseTranslation => "REVERSE_TRANSLATION",
            ChallengeType::FillInBlank => "FILL_IN_BLANK",
            ChallengeType::MatchingPairs => "MATCHING_PAIRS",
            ChallengeType::WordOrder => "WORD_ORDER",
        }
    }
}

pub mod feedback;
pub mod mistake;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mistake_type_serde_uses_screaming_snake_case() {
        let json = serde_json::to_string(&MistakeType::SubjectVerbAgreement).unwrap();
        assert_eq!(json, "\"SUBJECT_VERB_AGREEMENT\"");

        let parsed: MistakeType = serde_json::from_str("\"PLURAL_SINGULAR\"").unwrap();
        assert_eq!(parsed, MistakeType::PluralSingular);
    }

    #[test]
    fn unknown_mistake_type_is_rejected() {
        assert!(serde_json::from_str::<MistakeType>("\"SYNTAX\"").is_err());
    }

    #[test]
    fn all_variants_round_trip_through_as_str() {
        for mistake_type in MistakeType::ALL {
            let json = format!("\"{}\"", mistake_type.as_str());
            let parsed: MistakeType = serde_json::from_str(&json).unwrap();
            assert_eq!(parsed, mistake_type);
        }
    }
}
