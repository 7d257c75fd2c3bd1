// src/reply/pools.rs
// Fixed template pools. A swappable data set, not a localization framework.

use crate::emotion::EmotionTag;
use crate::temporal::{Season, TimeBlock};

pub fn greetings(block: TimeBlock) -> &'static [&'static str] {
    match block {
        TimeBlock::Morning => &["☀️ おはようございます。", "☀️ 今日のはじまりですね。"],
        TimeBlock::Day => &["🌆 いい時間帯ですね。", "🌤 少し集中していきましょう。"],
        TimeBlock::Evening => &["🌙 今日もおつかれさま。", "🌃 一日、よくがんばりました。"],
        TimeBlock::Night => &["💤 もう夜更けですね。", "🌌 静かな時間が流れています。"],
    }
}

pub fn moods(season: Season) -> &'static [&'static str] {
    match season {
        Season::Spring => &[
            "春の空気みたいに、やわらかい音を。",
            "芽吹くように、少しずつ整えていきましょう。",
        ],
        Season::Summer => &[
            "夏の風が少し涼しい音を運んできます。",
            "熱をやわらげるクールダウンのリズムを。",
        ],
        Season::Autumn => &[
            "秋の色が深まるような落ち着きで。",
            "少しノスタルジックな響きをどうぞ。",
        ],
        Season::Winter => &[
            "冬の灯りみたいに、やさしく温かい音を。",
            "息の白さがほどけるようなスローなビートを。",
        ],
    }
}

pub fn tails(is_weekend: bool) -> &'static [&'static str] {
    if is_weekend {
        &["週末らしく、肩の力を抜いて。", "よい週末を。好きなテンポでいきましょう。"]
    } else {
        &["では、良い一日を。", "静かに調子を上げていきましょう。"]
    }
}

pub const ACKS: &[&str] = &[
    "メッセージ、受け取りました。",
    "その気分、大切にしましょう。",
    "ゆっくりいきましょう。",
    "今の心地に寄り添います。",
    "落ち着いて、音に身をあずけて。",
];

/// Tone lines keyed by the provider's lowercase condition tag. Tags without a
/// pool get no tone line, but the weather sentence is still emitted.
pub fn weather_tones(tag: &str) -> Option<&'static [&'static str]> {
    let pool: &'static [&'static str] = match tag {
        "rain" => &["☔ 雨ですね。窓のリズムに合わせて、ゆるく。"],
        "drizzle" => &["🌧 霧雨。輪郭の柔らかい音が似合いそう。"],
        "thunderstorm" => &["⚡ 雷の気配。低めのビートで熱を下げよう。"],
        "snow" => &["❄️ 雪模様。温かい音で手を温めましょう。"],
        "clear" => &["☀️ 晴れ。軽やかなグルーヴで。"],
        "clouds" => &["☁️ くもり。輪郭の優しいトーンで。"],
        "mist" => &["🌫 霞がかかっています。アンビエント寄りで静かに。"],
        _ => return None,
    };
    Some(pool)
}

pub fn emotion_lines(tag: EmotionTag) -> &'static [&'static str] {
    match tag {
        EmotionTag::Joy => &[
            "その嬉しさ、音でさらに彩りを。",
            "いいね、その明るさでいきましょう。",
        ],
        EmotionTag::Grateful => &["こちらこそ、ありがとう。穏やかなループをどうぞ。"],
        EmotionTag::Sad => &["今日は無理しないで。呼吸を整えて、やさしい音に身を預けよう。"],
        EmotionTag::Angry => &["気持ちを言葉にできてえらい。低めのビートで熱を下げよう。"],
        EmotionTag::Anxious => &["深呼吸。テンポを落として、心拍に寄り添う音を。"],
        EmotionTag::Tired => &["おつかれさま。短いループでゆっくり回復を。"],
        EmotionTag::Calm => &["静かな気分。長く伸びる音が合いそう。"],
        EmotionTag::Excited => &["その勢い、いいですね。跳ねるビートでいきましょう。"],
        EmotionTag::Lonely => &["ひとりの時間も、音がそっと寄り添います。"],
    }
}
