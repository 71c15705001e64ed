use crate::models::MistakeType;

pub const MAX_SEVERITY: u8 = 5;

/// Intrinsic weight of a category before recurrence is taken into account.
/// Structural errors (tense, agreement, word order, modals, voice,
/// conditionals) start highest; spelling and the catch-all start lowest.
pub fn base_severity(mistake_type: MistakeType) -> u8 {
    match mistake_type {
        MistakeType::Tense
        | MistakeType::SubjectVerbAgreement
        | MistakeType::WordOrder
        | MistakeType::ModalVerb
        | MistakeType::PassiveActive
        | MistakeType::Conditional => 3,
        MistakeType::Article
        | MistakeType::Preposition
        | MistakeType::Vocabulary
        | MistakeType::PluralSingular
        | MistakeType::Pronoun
        | MistakeType::AdjectiveAdverb
        | MistakeType::ComparativeSuperlative => 2,
        MistakeType::Spelling | MistakeType::Other => 1,
    }
}

/// Severity 1..=5 for a weakness with `count` recorded occurrences.
/// Bands are evaluated top-down; the first match wins.
pub fn severity(mistake_type: MistakeType, count: u32) -> u8 {
    let base = base_severity(mistake_type);

    if count >= 10 {
        MAX_SEVERITY
    } else if count >= 7 {
        (base + 2).min(MAX_SEVERITY)
    } else if count >= 4 {
        (base + 1).min(MAX_SEVERITY)
    } else {
        base
    }
}
