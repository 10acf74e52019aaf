//! Day-bounded time interval primitives.
//!
//! Everything in the engine reasons about `(weekday, start, end)` triples
//! with half-open interval semantics: two intervals overlap iff they share a
//! day and `a.start < b.end && b.start < a.end`. Exact adjacency
//! (`a.end == b.start`) is NOT an overlap, so back-to-back periods are legal.

use chrono::{NaiveTime, TimeDelta, Weekday};
use serde::{Deserialize, Serialize};

/// Serde helper for the `HH:MM` wire format used throughout the API.
///
/// Accepts `HH:MM:SS` on input for tolerance; always emits `HH:MM`.
pub mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%H:%M";

    pub fn serialize<S>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&time.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&raw, FORMAT)
            .or_else(|_| NaiveTime::parse_from_str(&raw, "%H:%M:%S"))
            .map_err(serde::de::Error::custom)
    }
}

/// A same-day time span within the school week.
///
/// Invariant: `start < end`. Overnight spans are not representable by
/// construction; [`TimeInterval::new`] refuses them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeInterval {
    /// Day of the week this span lies on
    pub day: Weekday,
    /// Inclusive start time
    #[serde(with = "hhmm")]
    pub start: NaiveTime,
    /// Exclusive end time
    #[serde(with = "hhmm")]
    pub end: NaiveTime,
}

impl TimeInterval {
    pub fn new(day: Weekday, start: NaiveTime, end: NaiveTime) -> Option<Self> {
        if start < end {
            Some(Self { day, start, end })
        } else {
            None
        }
    }

    /// Deserialized data may bypass [`TimeInterval::new`]; validation paths
    /// re-check the invariant through this.
    pub fn is_well_formed(&self) -> bool {
        self.start < self.end
    }

    /// Half-open overlap test. Pure and total; symmetric in its arguments.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.day == other.day && self.start < other.end && other.start < self.end
    }

    /// Exact slot equality: same day, same start, same end.
    pub fn coincides_with(&self, other: &Self) -> bool {
        self.day == other.day && self.start == other.start && self.end == other.end
    }

    /// Length of the span in minutes.
    pub fn duration_minutes(&self) -> i64 {
        minutes_between(self.start, self.end)
    }
}

impl std::fmt::Display for TimeInterval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {}-{}",
            self.day,
            self.start.format("%H:%M"),
            self.end.format("%H:%M")
        )
    }
}

/// Add `minutes` to a time of day, wrapping on the 24h clock.
pub fn add_minutes(time: NaiveTime, minutes: i64) -> NaiveTime {
    time.overflowing_add_signed(TimeDelta::minutes(minutes)).0
}

/// Signed minute difference `to - from`, both on the same day.
pub fn minutes_between(from: NaiveTime, to: NaiveTime) -> i64 {
    (to - from).num_minutes()
}
