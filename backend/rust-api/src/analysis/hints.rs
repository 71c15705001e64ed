use crate::models::feedback::{AdaptiveHint, HintLevel};
use crate::models::MistakeType;

use super::templates;

/// How much recent history the adaptive heuristics look at.
pub const HISTORY_WINDOW: usize = 5;

/// Progressive hints, gated by how many times the learner has already tried
/// this challenge. Tiers accumulate: a third attempt sees all three.
pub fn adaptive_hints(
    _question: &str,
    correct_answer: &str,
    mistake_history: &[MistakeType],
    attempt_count: u32,
) -> Vec<AdaptiveHint> {
    let mut hints = Vec::new();

    if attempt_count >= 1 {
        let recent = recent_window(mistake_history);
        if let Some(most_common) = most_common_mistake(recent) {
            hints.push(AdaptiveHint {
                level: HintLevel::GrammarTip,
                content: format!("💡 Mẹo: {}", templates::grammar_rule(most_common)),
            });
        }
    }

    if attempt_count >= 2 {
        hints.push(AdaptiveHint {
            level: HintLevel::Example,
            content: format!("📚 Ví dụ tương tự: Câu tương tự: \"{}\"", correct_answer),
        });
    }

    if attempt_count >= 3 {
        hints.push(AdaptiveHint {
            level: HintLevel::PartialAnswer,
            content: format!(
                "🔍 Gợi ý: Đáp án bắt đầu bằng \"{}\"",
                partial_answer(correct_answer)
            ),
        });
    }

    hints
}

/// Static single hint for an explicit tier, used when the model call fails.
pub fn fallback_hint(level: HintLevel, correct_answer: &str) -> String {
    match level {
        HintLevel::GrammarTip => "💡 Hãy chú ý đến ngữ pháp và cấu trúc câu.".to_string(),
        HintLevel::Example => format!("📚 Ví dụ tương tự: \"{}\"", correct_answer),
        HintLevel::PartialAnswer => format!(
            "🔍 Gợi ý: Bắt đầu bằng \"{}\"",
            partial_answer(correct_answer)
        ),
    }
}

/// First half of the answer (rounded up) plus an ellipsis; very short
/// answers expose only their first two characters.
fn partial_answer(correct_answer: &str) -> String {
    let words: Vec<&str> = correct_answer.split(' ').collect();
    if words.len() <= 2 {
        let prefix: String = correct_answer.chars().take(2).collect();
        return format!("{}...", prefix);
    }

    let keep = words.len().div_ceil(2);
    format!("{}...", words[..keep].join(" "))
}

/// Most frequent category, first-seen order breaking ties.
fn most_common_mistake(mistakes: &[MistakeType]) -> Option<MistakeType> {
    let mut counts: Vec<(MistakeType, usize)> = Vec::new();

    for &mistake in mistakes {
        match counts.iter_mut().find(|(m, _)| *m == mistake) {
            Some((_, n)) => *n += 1,
            None => counts.push((mistake, 1)),
        }
    }

    counts
        .into_iter()
        .reduce(|best, candidate| if candidate.1 > best.1 { candidate } else { best })
        .map(|(mistake, _)| mistake)
}

fn recent_window(history: &[MistakeType]) -> &[MistakeType] {
    let start = history.len().saturating_sub(HISTORY_WINDOW);
    &history[start..]
}

/// Encouragement copy, toughened when the same category keeps recurring in
/// the last five mistakes.
pub fn encouragement(mistake_type: MistakeType, history: &[MistakeType]) -> String {
    if history.is_empty() {
        return "Đừng lo lắng! Mọi người đều mắc lỗi khi học. Hãy thử lại nhé!".to_string();
    }

    let repeats = recent_window(history)
        .iter()
        .filter(|&&m| m == mistake_type)
        .count();

    if repeats >= 3 {
        format!(
            "Bạn đang gặp khó khăn với {}. Đừng nản chí! Hãy xem lại lý thuyết và làm thêm bài tập nhé.",
            templates::mistake_label_vi(mistake_type)
        )
    } else if repeats >= 2 {
        format!(
            "{} có vẻ khó với bạn. Hãy chú ý kỹ hơn vào phần này!",
            templates::mistake_label_vi(mistake_type)
        )
    } else {
        "Không sao! Hãy học từ sai lầm và tiếp tục phát huy nhé!".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_attempts_means_no_hints() {
        let hints = adaptive_hints("q", "the cat sleeps", &[MistakeType::Article], 0);
        assert!(hints.is_empty());
    }

    #[test]
    fn first_tier_is_omitted_without_history() {
        let hints = adaptive_hints("q", "the cat sleeps", &[], 1);
        assert!(hints.is_empty());

        let hints = adaptive_hints("q", "the cat sleeps", &[], 2);
        assert_eq!(hints.len(), 1);
        assert_eq!(hints[0].level, HintLevel::Example);
    }

    #[test]
    fn two_attempts_unlock_exactly_two_tiers() {
        let history = [MistakeType::Tense, MistakeType::Tense];
        let hints = adaptive_hints("q", "she will go home", &history, 2);

        assert_eq!(hints.len(), 2);
        assert_eq!(hints[0].level, HintLevel::GrammarTip);
        assert_eq!(hints[1].level, HintLevel::Example);
        assert!(hints.iter().all(|h| h.level != HintLevel::PartialAnswer));
    }

    #[test]
    fn third_attempt_adds_partial_answer_without_replacing_earlier_tiers() {
        let history = [MistakeType::Article];
        let hints = adaptive_hints("q", "she will go home soon", &history, 3);

        assert_eq!(hints.len(), 3);
        assert_eq!(hints[2].level, HintLevel::PartialAnswer);
        assert!(hints[2].content.contains("she will go..."));
    }

    #[test]
    fn grammar_tip_tracks_dominant_recent_mistake() {
        // Six entries; the window only sees the last five, where TENSE wins.
        let history = [
            MistakeType::Article,
            MistakeType::Article,
            MistakeType::Tense,
            MistakeType::Tense,
            MistakeType::Tense,
            MistakeType::Vocabulary,
        ];
        let hints = adaptive_hints("q", "answer text here", &history, 1);

        assert_eq!(hints.len(), 1);
        assert!(hints[0].content.contains("Quy tắc thì"));
    }

    #[test]
    fn partial_answer_halves_longer_phrases() {
        assert_eq!(partial_answer("one two three four"), "one two...");
        assert_eq!(partial_answer("one two three four five"), "one two three...");
    }

    #[test]
    fn partial_answer_truncates_short_phrases_to_two_chars() {
        assert_eq!(partial_answer("hello"), "he...");
        assert_eq!(partial_answer("hi there"), "hi...");
    }

    #[test]
    fn ties_keep_the_first_seen_category() {
        let history = [MistakeType::Article, MistakeType::Tense];
        assert_eq!(most_common_mistake(&history), Some(MistakeType::Article));
        assert_eq!(most_common_mistake(&[]), None);
    }

    #[test]
    fn encouragement_escalates_with_repeats() {
        let none: [MistakeType; 0] = [];
        assert!(encouragement(MistakeType::Tense, &none).starts_with("Đừng lo lắng"));

        let one = [MistakeType::Tense];
        assert!(encouragement(MistakeType::Tense, &one).starts_with("Không sao"));

        let two = [MistakeType::Tense, MistakeType::Tense];
        assert!(encouragement(MistakeType::Tense, &two).contains("có vẻ khó với bạn"));

        let three = [MistakeType::Tense, MistakeType::Tense, MistakeType::Tense];
        assert!(encouragement(MistakeType::Tense, &three).contains("Đừng nản chí"));
    }

    #[test]
    fn encouragement_only_counts_the_recent_window() {
        // Three TENSE entries, but only one inside the last five.
        let history = [
            MistakeType::Tense,
            MistakeType::Tense,
            MistakeType::Article,
            MistakeType::Article,
            MistakeType::Article,
            MistakeType::Article,
            MistakeType::Tense,
        ];
        assert!(encouragement(MistakeType::Tense, &history).starts_with("Không sao"));
    }
}
