/// Canonical form used for correctness comparison: lower-cased, trimmed,
/// terminal punctuation stripped, whitespace runs collapsed. The original
/// answer text is always stored untouched; this is for equality only.
pub fn normalize(answer: &str) -> String {
    let lowered = answer.to_lowercase();
    let stripped: String = lowered
        .chars()
        .filter(|c| !matches!(c, '.' | ',' | '!' | '?' | ';' | ':'))
        .collect();

    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub fn answers_match(user_answer: &str, correct_answer: &str) -> bool {
    normalize(user_answer) == normalize(correct_answer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_trims_and_strips_punctuation() {
        assert_eq!(normalize("  He IS happy.  "), "he is happy");
        assert_eq!(normalize("Hello,   world!?"), "hello world");
    }

    #[test]
    fn collapses_internal_whitespace() {
        assert_eq!(normalize("a\t b\n  c"), "a b c");
    }

    #[test]
    fn is_idempotent() {
        for s in ["  What's UP?! ", "ça va; bien", "", "   ", "one two"] {
            assert_eq!(normalize(&normalize(s)), normalize(s));
        }
    }

    #[test]
    fn matching_ignores_case_and_terminal_punctuation() {
        assert!(answers_match("He is happy.", "he is happy"));
        assert!(!answers_match("He are happy", "He is happy"));
    }
}
