//! Static Vietnamese copy for the fallback feedback engine: grammar rules,
//! worked examples, per-category explanations and the confusing-pair
//! dictionary. Immutable lookup tables, initialized at compile time.

use crate::models::{ChallengeType, MistakeType};

pub fn grammar_rule(mistake_type: MistakeType) -> &'static str {
    match mistake_type {
        MistakeType::Article => {
            "Quy tắc mạo từ: Dùng 'a/an' cho danh từ đếm được số ít không xác định, 'the' cho danh từ xác định."
        }
        MistakeType::Preposition => {
            "Quy tắc giới từ: Mỗi động từ/tính từ thường đi với một giới từ cố định."
        }
        MistakeType::Tense => "Quy tắc thì: Chọn thì phù hợp với thời gian và ngữ cảnh của câu.",
        MistakeType::SubjectVerbAgreement => {
            "Quy tắc hòa hợp: Chủ ngữ số ít dùng động từ số ít, số nhiều dùng động từ số nhiều."
        }
        MistakeType::WordOrder => {
            "Quy tắc trật tự từ: Thường theo cấu trúc Chủ ngữ + Động từ + Tân ngữ (SVO)."
        }
        MistakeType::Vocabulary => "Chọn từ vựng phù hợp với ngữ cảnh và ý nghĩa của câu.",
        MistakeType::Spelling => "Chú ý chính tả đúng của từ.",
        MistakeType::PluralSingular => {
            "Quy tắc số nhiều: Thêm -s/-es cho danh từ số nhiều thông thường."
        }
        MistakeType::Pronoun => "Quy tắc đại từ: Chọn đại từ phù hợp với chủ ngữ/tân ngữ.",
        MistakeType::AdjectiveAdverb => {
            "Tính từ bổ nghĩa cho danh từ, trạng từ bổ nghĩa cho động từ/tính từ."
        }
        MistakeType::ComparativeSuperlative => {
            "So sánh hơn dùng -er/more, so sánh nhất dùng -est/most."
        }
        MistakeType::ModalVerb => {
            "Động từ khuyết thiếu (can, could, should, must...) + động từ nguyên mẫu."
        }
        MistakeType::PassiveActive => "Câu bị động: be + V3/V-ed.",
        MistakeType::Conditional => {
            "Câu điều kiện có cấu trúc riêng cho từng loại (type 1, 2, 3)."
        }
        MistakeType::Other => "Kiểm tra lại cấu trúc và ý nghĩa của câu.",
    }
}

pub fn examples(mistake_type: MistakeType) -> &'static [&'static str] {
    match mistake_type {
        MistakeType::Article => &[
            "I have a cat. (không xác định)",
            "The cat is sleeping. (xác định)",
            "She is an engineer. (nghề nghiệp)",
        ],
        MistakeType::Preposition => &[
            "I'm good at English.",
            "She depends on her parents.",
            "We arrived at the station.",
        ],
        MistakeType::Tense => &[
            "I am studying now. (hiện tại tiếp diễn)",
            "I studied yesterday. (quá khứ đơn)",
            "I will study tomorrow. (tương lai đơn)",
        ],
        MistakeType::SubjectVerbAgreement => &[
            "He is a student. (số ít)",
            "They are students. (số nhiều)",
            "She does her homework. (số ít)",
        ],
        MistakeType::WordOrder => &[
            "I eat an apple. (S + V + O)",
            "She speaks English fluently. (S + V + O + Adv)",
            "They live in Vietnam. (S + V + Prep phrase)",
        ],
        MistakeType::Vocabulary => &[
            "I want to learn English. (không phải 'study')",
            "She is wearing a dress. (không phải 'putting on')",
        ],
        MistakeType::Spelling => &[
            "receive (không phải recieve)",
            "separate (không phải seperate)",
        ],
        MistakeType::PluralSingular => &["one book → two books", "one child → two children"],
        MistakeType::Pronoun => &["He is my brother. (chủ ngữ)", "I love him. (tân ngữ)"],
        MistakeType::AdjectiveAdverb => &[
            "She is beautiful. (tính từ)",
            "She sings beautifully. (trạng từ)",
        ],
        MistakeType::ComparativeSuperlative => &[
            "bigger than (so sánh hơn)",
            "the biggest (so sánh nhất)",
        ],
        MistakeType::ModalVerb => &["I can swim.", "You should study.", "We must go."],
        MistakeType::PassiveActive => &["The book is written by John. (bị động)"],
        MistakeType::Conditional => &["If I study, I will pass. (điều kiện loại 1)"],
        MistakeType::Other => &["Hãy kiểm tra lại cấu trúc câu."],
    }
}

pub fn common_mistake_for_vietnamese(mistake_type: MistakeType) -> &'static str {
    match mistake_type {
        MistakeType::Article => "Người Việt thường quên mạo từ vì tiếng Việt không có mạo từ.",
        MistakeType::Preposition => {
            "Giới từ tiếng Anh khác tiếng Việt, cần học thuộc các cụm từ cố định."
        }
        MistakeType::Tense => "Tiếng Việt không chia động từ theo thì, nên dễ nhầm lẫn.",
        MistakeType::SubjectVerbAgreement => {
            "Tiếng Việt không chia động từ theo ngôi, cần chú ý quy tắc này."
        }
        MistakeType::WordOrder => {
            "Trật tự từ tiếng Anh khác tiếng Việt, đặc biệt là vị trí tính từ."
        }
        MistakeType::Vocabulary => "Dễ chọn sai từ do nghĩa tương tự hoặc dịch sát tiếng Việt.",
        MistakeType::Spelling => "Chú ý các từ có chính tả khó hoặc khác phát âm.",
        MistakeType::PluralSingular => "Tiếng Việt không chia số nhiều như tiếng Anh.",
        MistakeType::Pronoun => "Hệ thống đại từ tiếng Anh đơn giản hơn tiếng Việt.",
        MistakeType::AdjectiveAdverb => "Dễ nhầm lẫn giữa tính từ và trạng từ.",
        MistakeType::ComparativeSuperlative => "Cấu trúc so sánh khác tiếng Việt.",
        MistakeType::ModalVerb => "Động từ khuyết thiếu có cách dùng đặc biệt.",
        MistakeType::PassiveActive => "Câu bị động tiếng Anh có cấu trúc riêng.",
        MistakeType::Conditional => "Câu điều kiện có nhiều loại với cấu trúc khác nhau.",
        MistakeType::Other => "Hãy chú ý đến cấu trúc và ngữ cảnh của câu.",
    }
}

/// Vietnamese display name of a category, used inside encouragement copy
/// and model prompts.
pub fn mistake_label_vi(mistake_type: MistakeType) -> &'static str {
    match mistake_type {
        MistakeType::Article => "mạo từ",
        MistakeType::Preposition => "giới từ",
        MistakeType::Tense => "thì",
        MistakeType::SubjectVerbAgreement => "sự hòa hợp chủ ngữ - động từ",
        MistakeType::WordOrder => "trật tự từ",
        MistakeType::Vocabulary => "từ vựng",
        MistakeType::Spelling => "chính tả",
        MistakeType::PluralSingular => "số ít/số nhiều",
        MistakeType::Pronoun => "đại từ",
        MistakeType::AdjectiveAdverb => "tính từ/trạng từ",
        MistakeType::ComparativeSuperlative => "so sánh",
        MistakeType::ModalVerb => "động từ khuyết thiếu",
        MistakeType::PassiveActive => "câu bị động/chủ động",
        MistakeType::Conditional => "câu điều kiện",
        MistakeType::Other => "lỗi này",
    }
}

pub fn challenge_label_vi(challenge_type: ChallengeType) -> &'static str {
    match challenge_type {
        ChallengeType::Select => "Chọn đáp án đúng",
        ChallengeType::Assist => "Chọn nghĩa đúng",
        ChallengeType::Translation => "Dịch sang tiếng Anh",
        ChallengeType::ReverseTranslation => "Dịch sang tiếng Việt",
        ChallengeType::FillInBlank => "Điền vào chỗ trống",
        ChallengeType::MatchingPairs => "Ghép cặp",
        ChallengeType::WordOrder => "Sắp xếp từ",
    }
}

pub fn explanation(mistake_type: MistakeType, correct_answer: &str) -> String {
    match mistake_type {
        MistakeType::Article => format!(
            "Bạn đã sử dụng sai mạo từ. Đáp án đúng là \"{}\". Hãy xem lại quy tắc sử dụng mạo từ a/an/the.",
            correct_answer
        ),
        MistakeType::Preposition => format!(
            "Giới từ bạn chọn chưa chính xác. Đáp án đúng là \"{}\". Mỗi động từ/tính từ thường đi với giới từ cố định.",
            correct_answer
        ),
        MistakeType::Tense => format!(
            "Thì bạn sử dụng chưa phù hợp. Đáp án đúng là \"{}\". Hãy chú ý đến thời gian và ngữ cảnh của câu.",
            correct_answer
        ),
        MistakeType::SubjectVerbAgreement => format!(
            "Chủ ngữ và động từ chưa hòa hợp. Đáp án đúng là \"{}\". Chủ ngữ số ít đi với động từ số ít.",
            correct_answer
        ),
        MistakeType::WordOrder => format!(
            "Trật tự từ chưa đúng. Đáp án đúng là \"{}\". Tiếng Anh thường theo cấu trúc S + V + O.",
            correct_answer
        ),
        MistakeType::Vocabulary => format!(
            "Từ vựng bạn chọn chưa phù hợp. Đáp án đúng là \"{}\". Hãy chú ý ngữ cảnh và ý nghĩa.",
            correct_answer
        ),
        MistakeType::Spelling => format!("Chính tả chưa đúng. Đáp án đúng là \"{}\".", correct_answer),
        MistakeType::PluralSingular => format!(
            "Bạn nhầm lẫn giữa số ít và số nhiều. Đáp án đúng là \"{}\".",
            correct_answer
        ),
        MistakeType::Pronoun => format!("Đại từ chưa phù hợp. Đáp án đúng là \"{}\".", correct_answer),
        MistakeType::AdjectiveAdverb => format!(
            "Bạn nhầm lẫn giữa tính từ và trạng từ. Đáp án đúng là \"{}\".",
            correct_answer
        ),
        MistakeType::ComparativeSuperlative => format!(
            "Cấu trúc so sánh chưa đúng. Đáp án đúng là \"{}\".",
            correct_answer
        ),
        MistakeType::ModalVerb => format!(
            "Động từ khuyết thiếu sử dụng chưa chính xác. Đáp án đúng là \"{}\".",
            correct_answer
        ),
        MistakeType::PassiveActive => format!(
            "Cấu trúc câu bị động/chủ động chưa đúng. Đáp án đúng là \"{}\".",
            correct_answer
        ),
        MistakeType::Conditional => format!(
            "Câu điều kiện chưa chính xác. Đáp án đúng là \"{}\".",
            correct_answer
        ),
        MistakeType::Other => format!(
            "Đáp án của bạn chưa chính xác. Đáp án đúng là \"{}\".",
            correct_answer
        ),
    }
}

pub const PRAISE: [&str; 5] = [
    "Tuyệt vời! Bạn đã hiểu rất rõ!",
    "Chính xác! Tiếp tục phát huy nhé!",
    "Hoàn hảo! Bạn đang tiến bộ rất tốt!",
    "Xuất sắc! Kiến thức của bạn rất vững!",
    "Đúng rồi! Bạn thật giỏi!",
];

/// Confirmation sentence appended to praise for a correct answer.
pub fn correct_note(challenge_type: ChallengeType) -> &'static str {
    match challenge_type {
        ChallengeType::Select => "Bạn đã chọn đúng đáp án phù hợp với ngữ cảnh.",
        ChallengeType::Assist => "Bạn đã hoàn thành câu một cách chính xác.",
        ChallengeType::Translation => "Bản dịch của bạn chính xác về mặt ngữ nghĩa và ngữ pháp.",
        ChallengeType::ReverseTranslation => "Bạn đã dịch ngược lại chính xác.",
        ChallengeType::FillInBlank => "Bạn đã điền đúng từ vào chỗ trống.",
        ChallengeType::MatchingPairs => "Bạn đã ghép các cặp từ chính xác.",
        ChallengeType::WordOrder => "Bạn đã sắp xếp từ đúng thứ tự.",
    }
}

/// Study-plan text for the weaknesses report, with urgency scaling by count.
pub fn improvement_suggestion(mistake_type: MistakeType, count: u32) -> String {
    let base = match mistake_type {
        MistakeType::Article => {
            "Hãy ôn lại quy tắc sử dụng mạo từ a/an/the và làm thêm bài tập về mạo từ."
        }
        MistakeType::Preposition => {
            "Học thuộc các cụm động từ với giới từ (phrasal verbs) và danh sách giới từ theo chủ đề."
        }
        MistakeType::Tense => "Ôn lại các thì trong tiếng Anh và dấu hiệu nhận biết từng thì.",
        MistakeType::SubjectVerbAgreement => {
            "Chú ý quy tắc chia động từ theo chủ ngữ số ít/số nhiều."
        }
        MistakeType::WordOrder => {
            "Luyện tập sắp xếp từ và ghi nhớ cấu trúc câu cơ bản S + V + O."
        }
        MistakeType::Vocabulary => "Mở rộng vốn từ vựng theo chủ đề và học từ trong ngữ cảnh.",
        MistakeType::Spelling => "Luyện tập chính tả thường xuyên với các từ khó.",
        MistakeType::PluralSingular => "Ôn lại quy tắc thêm -s/-es và các danh từ bất quy tắc.",
        MistakeType::Pronoun => "Học thuộc bảng đại từ nhân xưng, sở hữu, phản thân.",
        MistakeType::AdjectiveAdverb => "Phân biệt rõ tính từ và trạng từ, cách thêm -ly.",
        MistakeType::ComparativeSuperlative => "Học quy tắc so sánh hơn và so sánh nhất.",
        MistakeType::ModalVerb => "Ôn lại các động từ khuyết thiếu và cách sử dụng.",
        MistakeType::PassiveActive => "Luyện tập chuyển đổi câu chủ động - bị động.",
        MistakeType::Conditional => "Học thuộc cấu trúc 3 loại câu điều kiện.",
        MistakeType::Other => "Tiếp tục luyện tập và chú ý đến các lỗi cơ bản.",
    };

    if count >= 10 {
        format!("⚠️ QUAN TRỌNG: {} Bạn đã mắc lỗi này {} lần.", base, count)
    } else if count >= 5 {
        format!("⚡ CHÚ Ý: {} Bạn đã mắc lỗi này {} lần.", base, count)
    } else {
        base.to_string()
    }
}

/// Curated explanations for classic confusable pairs. Keys are checked in
/// both orders before falling back to the generic sentence.
const CONFUSING_PAIRS: [(&str, &str, &str); 7] = [
    (
        "affect",
        "effect",
        "Affect là động từ (ảnh hưởng), Effect là danh từ (hiệu quả)",
    ),
    ("accept", "except", "Accept = chấp nhận, Except = ngoại trừ"),
    (
        "there",
        "their",
        "There = ở đó, Their = của họ, They're = họ là",
    ),
    ("your", "you're", "Your = của bạn, You're = bạn là"),
    ("its", "it's", "Its = của nó, It's = nó là"),
    ("to", "too", "To = đến, Too = quá, Two = số 2"),
    ("then", "than", "Then = sau đó, Than = hơn (so sánh)"),
];

pub fn confusing_pair_explanation(word1: &str, word2: &str) -> String {
    for (a, b, note) in CONFUSING_PAIRS {
        if (word1 == a && word2 == b) || (word1 == b && word2 == a) {
            return note.to_string();
        }
    }

    format!(
        "\"{}\" và \"{}\" thường bị nhầm lẫn. Hãy chú ý nghĩa và cách dùng của từng từ.",
        word1, word2
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_category_has_at_most_three_examples() {
        for mistake_type in MistakeType::ALL {
            let n = examples(mistake_type).len();
            assert!((1..=3).contains(&n), "{:?} has {} examples", mistake_type, n);
        }
    }

    #[test]
    fn explanation_quotes_the_correct_answer() {
        for mistake_type in MistakeType::ALL {
            assert!(explanation(mistake_type, "the cat sleeps").contains("\"the cat sleeps\""));
        }
    }

    #[test]
    fn confusing_pair_dictionary_is_order_insensitive() {
        let forward = confusing_pair_explanation("then", "than");
        let backward = confusing_pair_explanation("than", "then");
        assert_eq!(forward, backward);
        assert!(forward.contains("Then = sau đó"));
    }

    #[test]
    fn unknown_pair_gets_generic_explanation() {
        let note = confusing_pair_explanation("go to school", "went to school");
        assert!(note.contains("\"go to school\""));
        assert!(note.contains("\"went to school\""));
    }

    #[test]
    fn suggestion_urgency_scales_with_count() {
        assert!(improvement_suggestion(MistakeType::Tense, 2).starts_with("Ôn lại"));
        assert!(improvement_suggestion(MistakeType::Tense, 5).starts_with("⚡ CHÚ Ý"));
        assert!(improvement_suggestion(MistakeType::Tense, 12).starts_with("⚠️ QUAN TRỌNG"));
    }
}
