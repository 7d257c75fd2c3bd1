// src/reply/mod.rs
// Composes the multi-line reply from the context-indexed template pools.

pub mod pools;

use rand::Rng;

use crate::emotion;
use crate::temporal::TemporalContext;
use crate::weather::WeatherSnapshot;

fn pick<'a>(pool: &'a [&'a str], rng: &mut impl Rng) -> &'a str {
    pool[rng.random_range(0..pool.len())]
}

/// Build the reply text. Deterministic shape, random line choice within each
/// pool; any missing optional section is skipped. Never fails.
///
/// Line order: greeting+ack, seasonal mood, [emotion], [weather], tail.
pub fn compose(
    user_text: &str,
    weather: Option<&WeatherSnapshot>,
    ctx: TemporalContext,
    rng: &mut impl Rng,
) -> String {
    let greeting = pick(pools::greetings(ctx.block), rng);
    let ack = pick(pools::ACKS, rng);
    let mood = pick(pools::moods(ctx.season), rng);
    let tail = pick(pools::tails(ctx.is_weekend), rng);

    let mut parts = vec![format!("{greeting}{ack}"), mood.to_string()];

    if let Some(tag) = emotion::score(user_text) {
        parts.push(pick(pools::emotion_lines(tag), rng).to_string());
    }

    if let Some(w) = weather {
        let tone = pools::weather_tones(&w.tag)
            .map(|pool| pick(pool, rng))
            .unwrap_or("");
        let city = if w.city.is_empty() { "現在地" } else { &w.city };
        parts.push(format!("{city}は{}（{}℃）。{tone}", w.description, w.temp_c));
    }

    parts.push(tail.to_string());
    parts.join("\n")
}
