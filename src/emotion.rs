// src/emotion.rs
// Lightweight lexicon-based emotion inference over free text.
//
// Matching is substring containment over NFKC-normalized, lowercased text, so
// full-width / half-width / decorated variants hit the same entries. Lexicon
// entries are stored pre-normalized.

use unicode_normalization::UnicodeNormalization;

/// Closed set of inferable emotions. Declaration order is the tie-break
/// priority: when several tags share the maximum score, the earliest wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EmotionTag {
    Joy,
    Grateful,
    Sad,
    Angry,
    Anxious,
    Tired,
    Calm,
    Excited,
    Lonely,
}

impl EmotionTag {
    pub const ALL: [EmotionTag; 9] = [
        EmotionTag::Joy,
        EmotionTag::Grateful,
        EmotionTag::Sad,
        EmotionTag::Angry,
        EmotionTag::Anxious,
        EmotionTag::Tired,
        EmotionTag::Calm,
        EmotionTag::Excited,
        EmotionTag::Lonely,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EmotionTag::Joy => "joy",
            EmotionTag::Grateful => "grateful",
            EmotionTag::Sad => "sad",
            EmotionTag::Angry => "angry",
            EmotionTag::Anxious => "anxious",
            EmotionTag::Tired => "tired",
            EmotionTag::Calm => "calm",
            EmotionTag::Excited => "excited",
            EmotionTag::Lonely => "lonely",
        }
    }
}

/// Keyword/emoji substrings associated with each tag (NFKC-normalized forms).
fn keywords(tag: EmotionTag) -> &'static [&'static str] {
    match tag {
        EmotionTag::Joy => &[
            "うれ", "嬉", "楽しい", "最高", "やった", "わくわく", "ワクワク", "良かった",
            "😍", "🥳", "✨",
        ],
        EmotionTag::Grateful => &["ありがとう", "感謝", "助か", "サンキュー", "🙏"],
        EmotionTag::Sad => &[
            "さみ", "寂", "つら", "辛", "悲しい", "泣", "落ち込", "しんど", "最悪", "😭",
            "😢", "😞",
        ],
        EmotionTag::Angry => &["怒", "ムカ", "腹立", "イライラ", "許せ", "💢", "😡"],
        EmotionTag::Anxious => &["不安", "こわ", "怖", "緊張", "心配", "焦り", "ドキドキ", "😰", "😱"],
        EmotionTag::Tired => &["疲れ", "ねむ", "眠", "だる", "限界", "バテ", "ぐったり", "😴", "💤"],
        EmotionTag::Calm => &["落ち着", "静か", "まったり", "穏や", "ほっと", "安ら", "☺️"],
        EmotionTag::Excited => &["楽しみ", "テンション", "やるぞ", "燃える", "🔥"],
        EmotionTag::Lonely => &["ひとり", "独り", "孤独", "さみ", "誰も", "🥺"],
    }
}

/// Infer an emotion from raw message text. Returns `None` when nothing scores.
pub fn score(text: &str) -> Option<EmotionTag> {
    if text.is_empty() {
        return None;
    }
    let norm: String = text.nfkc().collect::<String>().to_lowercase();

    // Punctuation heuristics. Full-width `！` and the single-glyph ellipsis
    // both decompose under NFKC, so counting the ASCII forms covers them.
    let excited_boost = norm.matches('!').count() >= 2;
    let tired_boost = norm.contains("...") || norm.contains("。。") || norm.contains('…');

    let mut best: Option<(EmotionTag, usize)> = None;
    for tag in EmotionTag::ALL {
        let mut score = keywords(tag).iter().filter(|w| norm.contains(*w)).count();
        if tag == EmotionTag::Excited && excited_boost {
            score += 1;
        }
        if tag == EmotionTag::Tired && tired_boost {
            score += 1;
        }
        // Strictly-greater keeps the earliest tag on ties.
        if best.map_or(true, |(_, s)| score > s) {
            best = Some((tag, score));
        }
    }

    best.filter(|(_, s)| *s > 0).map(|(tag, _)| tag)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grateful_keywords_win() {
        assert_eq!(score("ありがとう、助かりました！"), Some(EmotionTag::Grateful));
    }

    #[test]
    fn empty_text_scores_nothing() {
        assert_eq!(score(""), None);
    }

    #[test]
    fn neutral_text_scores_nothing() {
        assert_eq!(score("今日は会議があります。"), None);
    }

    #[test]
    fn double_exclamation_boosts_excited() {
        assert_eq!(score("やるしかない！！"), Some(EmotionTag::Excited));
        // A single mark is not enough on its own.
        assert_eq!(score("やるしかない！"), None);
    }

    #[test]
    fn ellipsis_boosts_tired() {
        assert_eq!(score("今日も残業…"), Some(EmotionTag::Tired));
        assert_eq!(score("まあ。。いいか。。"), Some(EmotionTag::Tired));
    }

    #[test]
    fn halfwidth_katakana_matches_via_nfkc() {
        // ﾜｸﾜｸ normalizes to ワクワク and should hit the joy lexicon.
        assert_eq!(score("ﾜｸﾜｸする"), Some(EmotionTag::Joy));
    }

    #[test]
    fn tie_resolves_by_declared_priority() {
        // "さみしい" is in both the sad and lonely lexicons; sad is declared
        // first and must win the tie.
        assert_eq!(score("さみしい"), Some(EmotionTag::Sad));
    }

    #[test]
    fn emoji_only_input() {
        assert_eq!(score("😭"), Some(EmotionTag::Sad));
    }
}
