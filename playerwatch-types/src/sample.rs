//! Sample - one timestamped observation of the player count.

use chrono::{DateTime, TimeDelta, Utc};

/// A single observation of the monitored count.
///
/// Samples are immutable once created. A failed measurement is still
/// recorded, with a value of zero.
///
/// With the `serde` feature the value is serialized under the `players`
/// key, matching the on-disk stats file:
///
/// ```json
/// {"timestamp": "2024-05-01T18:00:00Z", "players": 42}
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Sample {
    /// When the observation was taken.
    #[cfg_attr(feature = "serde", serde(with = "timestamp"))]
    pub timestamp: DateTime<Utc>,

    /// Observed count.
    #[cfg_attr(feature = "serde", serde(rename = "players"))]
    pub value: u64,
}

impl Sample {
    /// Create a sample with an explicit timestamp.
    pub const fn new(timestamp: DateTime<Utc>, value: u64) -> Self {
        Self { timestamp, value }
    }

    /// Create a sample stamped with the current time.
    pub fn now(value: u64) -> Self {
        Self::new(Utc::now(), value)
    }

    /// Age of this sample relative to `now`.
    ///
    /// Negative if the sample lies in the future (clock adjustments).
    pub fn age_at(&self, now: DateTime<Utc>) -> TimeDelta {
        now - self.timestamp
    }
}

/// Serde adapter for sample timestamps.
///
/// Writes RFC 3339 in UTC. Reads RFC 3339, and also offset-less ISO-8601
/// timestamps (`2024-05-01T18:00:00.123456`), which are taken to be in the
/// host's local time zone. A local time skipped by a DST jump is read as if
/// the clock had not moved forward yet.
#[cfg(feature = "serde")]
pub mod timestamp {
    use chrono::{DateTime, Local, LocalResult, NaiveDateTime, SecondsFormat, TimeDelta, TimeZone, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    const NAIVE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

    pub fn serialize<S: Serializer>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&ts.to_rfc3339_opts(SecondsFormat::AutoSi, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| de::Error::custom(format!("invalid timestamp: {raw}")))
    }

    /// Parse a timestamp in any of the accepted formats.
    pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
        if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
            return Some(ts.with_timezone(&Utc));
        }
        let naive = NaiveDateTime::parse_from_str(raw, NAIVE_FORMAT).ok()?;
        Some(from_local(&Local, naive))
    }

    /// Resolve a wall-clock time in `tz`. Never fails: one bad record
    /// must not make the whole log unreadable.
    pub fn from_local<Tz: TimeZone>(tz: &Tz, naive: NaiveDateTime) -> DateTime<Utc> {
        match tz.from_local_datetime(&naive) {
            LocalResult::Single(ts) | LocalResult::Ambiguous(ts, _) => ts.with_timezone(&Utc),
            LocalResult::None => {
                // Inside a forward gap; gaps are at most an hour in practice
                let after = naive + TimeDelta::hours(1);
                match tz.from_local_datetime(&after).earliest() {
                    Some(ts) => ts.with_timezone(&Utc),
                    None => naive.and_utc(),
                }
            }
        }
    }
}
