// src/temporal.rs
// Maps a localized timestamp to the coarse buckets that index the template pools.

use chrono::{Datelike, NaiveDateTime, Timelike, Weekday};
use serde::{Deserialize, Serialize};

/// Coarse time-of-day bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeBlock {
    Morning,
    Day,
    Evening,
    Night,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    Spring,
    Summer,
    Autumn,
    Winter,
}

/// Derived time classification for one request. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemporalContext {
    pub block: TimeBlock,
    pub season: Season,
    pub is_weekend: bool,
}

/// Classify a timestamp that is already in local civil time (the transport
/// shim applies the fixed UTC offset before calling the engine).
pub fn classify(ts: NaiveDateTime) -> TemporalContext {
    TemporalContext {
        block: time_block(ts.hour()),
        season: season(ts.month()),
        is_weekend: matches!(ts.weekday(), Weekday::Sat | Weekday::Sun),
    }
}

fn time_block(hour: u32) -> TimeBlock {
    match hour {
        5..=11 => TimeBlock::Morning,
        12..=17 => TimeBlock::Day,
        18..=22 => TimeBlock::Evening,
        _ => TimeBlock::Night,
    }
}

fn season(month: u32) -> Season {
    match month {
        12 | 1 | 2 => Season::Winter,
        3..=5 => Season::Spring,
        6..=8 => Season::Summer,
        _ => Season::Autumn,
    }
}
