// src/recommend.rs
// Static BGM catalog and context-driven selection.

use rand::Rng;
use serde::Serialize;

use crate::emotion::EmotionTag;
use crate::temporal::TimeBlock;

/// One catalog entry. The transport layer renders it into a channel-specific
/// rich message; the engine only selects it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RecommendationItem {
    pub title: &'static str,
    pub url: &'static str,
    pub cover: &'static str,
    pub description: &'static str,
}

type TagPools = &'static [(&'static str, &'static [RecommendationItem])];

static MORNING: TagPools = &[
    (
        "clear",
        &[RecommendationItem {
            title: "Morning Lo-fi ☀️",
            url: "https://youtu.be/jfKfPfyJRdk",
            cover: "https://img.youtube.com/vi/jfKfPfyJRdk/hqdefault.jpg",
            description: "軽やかにスタート",
        }],
    ),
    (
        "rain",
        &[RecommendationItem {
            title: "Rainy Café Lofi ☔",
            url: "https://youtu.be/7NOSDKb0HlU",
            cover: "https://img.youtube.com/vi/7NOSDKb0HlU/hqdefault.jpg",
            description: "やさしい雨音系",
        }],
    ),
    (
        "default",
        &[RecommendationItem {
            title: "Lo-fi Beats",
            url: "https://open.spotify.com/playlist/37i9dQZF1DX8Uebhn9wzrS",
            cover: "https://i.imgur.com/1Qe5oQp.jpg",
            description: "定番チル",
        }],
    ),
];

static DAY: TagPools = &[(
    "default",
    &[RecommendationItem {
        title: "Focus Lo-fi",
        url: "https://open.spotify.com/playlist/37i9dQZF1DX8Uebhn9wzrS",
        cover: "https://i.imgur.com/5k9K1WJ.jpg",
        description: "集中モード",
    }],
)];

static EVENING: TagPools = &[
    (
        "clear",
        &[RecommendationItem {
            title: "Evening Chill",
            url: "https://youtu.be/2x4f4tqFJ6A",
            cover: "https://img.youtube.com/vi/2x4f4tqFJ6A/hqdefault.jpg",
            description: "やさしくクールダウン",
        }],
    ),
    (
        "default",
        &[RecommendationItem {
            title: "Chillhop Essentials",
            url: "https://open.spotify.com/playlist/0vvXsWCC9xrXsKd4FyS8kM",
            cover: "https://i.imgur.com/9O8v8lX.jpg",
            description: "落ち着いた夜に",
        }],
    ),
];

static NIGHT: TagPools = &[(
    "default",
    &[RecommendationItem {
        title: "Midnight Lo-fi 🌙",
        url: "https://youtu.be/5yx6BWlEVcY",
        cover: "https://img.youtube.com/vi/5yx6BWlEVcY/hqdefault.jpg",
        description: "眠る前の一枚",
    }],
)];

/// Catalog: block → condition tag → pool, with a per-block "default" pool.
fn catalog(block: TimeBlock) -> TagPools {
    match block {
        TimeBlock::Morning => MORNING,
        TimeBlock::Day => DAY,
        TimeBlock::Evening => EVENING,
        TimeBlock::Night => NIGHT,
    }
}

/// Emotion override: heavy moods steer to the soothing (night) catalog,
/// high-energy moods to the energetic (day) catalog.
pub fn effective_block(emotion: Option<EmotionTag>, block: TimeBlock) -> TimeBlock {
    match emotion {
        Some(EmotionTag::Sad | EmotionTag::Tired | EmotionTag::Lonely | EmotionTag::Anxious) => {
            TimeBlock::Night
        }
        Some(EmotionTag::Joy | EmotionTag::Excited) => TimeBlock::Day,
        _ => block,
    }
}

/// Pick one item for the effective block and weather tag. Falls back to the
/// block's default pool when the tag has no pool of its own.
pub fn select(
    block: TimeBlock,
    emotion: Option<EmotionTag>,
    weather_tag: Option<&str>,
    rng: &mut impl Rng,
) -> Option<RecommendationItem> {
    let table = catalog(effective_block(emotion, block));
    let lookup = |wanted: &str| {
        table
            .iter()
            .find(|(tag, _)| *tag == wanted)
            .map(|(_, pool)| *pool)
    };
    let pool = weather_tag
        .and_then(lookup)
        .or_else(|| lookup("default"))
        .unwrap_or(&[]);
    if pool.is_empty() {
        return None;
    }
    Some(pool[rng.random_range(0..pool.len())])
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn tired_always_lands_in_the_soothing_bucket() {
        let mut rng = StdRng::seed_from_u64(1);
        for block in [
            TimeBlock::Morning,
            TimeBlock::Day,
            TimeBlock::Evening,
            TimeBlock::Night,
        ] {
            let picked = select(block, Some(EmotionTag::Tired), Some("clear"), &mut rng).unwrap();
            assert_eq!(picked.title, "Midnight Lo-fi 🌙");
        }
    }

    #[test]
    fn joy_redirects_to_the_energetic_bucket() {
        let mut rng = StdRng::seed_from_u64(1);
        let picked = select(TimeBlock::Night, Some(EmotionTag::Joy), None, &mut rng).unwrap();
        assert_eq!(picked.title, "Focus Lo-fi");
    }

    #[test]
    fn weather_tag_selects_the_matching_pool() {
        let mut rng = StdRng::seed_from_u64(1);
        let picked = select(TimeBlock::Morning, None, Some("rain"), &mut rng).unwrap();
        assert_eq!(picked.title, "Rainy Café Lofi ☔");
    }

    #[test]
    fn unknown_tag_falls_back_to_default_pool() {
        let mut rng = StdRng::seed_from_u64(1);
        let picked = select(TimeBlock::Morning, None, Some("tornado"), &mut rng).unwrap();
        assert_eq!(picked.title, "Lo-fi Beats");
    }

    #[test]
    fn calm_emotion_leaves_the_block_unchanged() {
        assert_eq!(
            effective_block(Some(EmotionTag::Calm), TimeBlock::Evening),
            TimeBlock::Evening
        );
        assert_eq!(effective_block(None, TimeBlock::Morning), TimeBlock::Morning);
    }
}
