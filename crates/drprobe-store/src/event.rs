//! Event rows, role labels and the list limit.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One row of `dr_events`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Store-assigned, strictly increasing.
    pub id: i64,
    /// Insertion time on the store's clock.
    #[serde(with = "ts_format")]
    pub ts: DateTime<Utc>,
    /// Node that wrote the row.
    pub node: String,
    /// Free text, empty when none was given.
    pub note: String,
}

impl From<(i64, DateTime<Utc>, String, String)> for Event {
    fn from((id, ts, node, note): (i64, DateTime<Utc>, String, String)) -> Self {
        Self { id, ts, node, note }
    }
}

/// Store-assigned fields of a freshly inserted event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InsertedEvent {
    /// Generated primary key.
    pub id: i64,
    /// Defaulted timestamp.
    pub ts: DateTime<Utc>,
}

/// Role of the store this node is connected to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Read-write.
    Primary,
    /// Read-only replica.
    Standby,
}

impl Role {
    /// Map the result of `pg_is_in_recovery()`.
    pub fn from_recovery(in_recovery: bool) -> Self {
        if in_recovery { Role::Standby } else { Role::Primary }
    }

    /// Label used on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Primary => "primary",
            Role::Standby => "standby",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Number of rows a recent-events query may return, always within
/// [`EventLimit::MIN`]..=[`EventLimit::MAX`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct EventLimit(i64);

impl EventLimit {
    /// Smallest accepted limit.
    pub const MIN: i64 = 1;
    /// Largest accepted limit.
    pub const MAX: i64 = 50;
    /// Used when `n` is absent or unparseable.
    pub const DEFAULT: EventLimit = EventLimit(5);

    /// Clamp any requested count into range.
    pub fn clamped(n: i64) -> Self {
        EventLimit(n.clamp(Self::MIN, Self::MAX))
    }

    /// Interpret a raw `n` query value. Absent or non-integer input yields
    /// [`EventLimit::DEFAULT`]; integers are clamped.
    pub fn from_query(raw: Option<&str>) -> Self {
        raw.and_then(|s| s.trim().parse::<i64>().ok())
            .map_or(Self::DEFAULT, Self::clamped)
    }

    /// The clamped value.
    pub fn get(self) -> i64 {
        self.0
    }
}

impl Default for EventLimit {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// RFC 3339 in UTC with microseconds, the resolution of `TIMESTAMPTZ`.
pub mod ts_format {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    /// Render a timestamp.
    pub fn format(ts: &DateTime<Utc>) -> String {
        ts.to_rfc3339_opts(SecondsFormat::Micros, true)
    }

    /// Serde `serialize_with` hook.
    pub fn serialize<S: Serializer>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format(ts))
    }

    /// Serde `deserialize_with` hook.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn role_from_recovery() {
        assert_eq!(Role::from_recovery(true), Role::Standby);
        assert_eq!(Role::from_recovery(false), Role::Primary);
    }

    #[test]
    fn role_serializes_lowercase() {
        assert_eq!(serde_json::to_value(Role::Standby).unwrap(), "standby");
        assert_eq!(Role::Primary.to_string(), "primary");
    }

    #[test]
    fn limit_clamps_into_range() {
        assert_eq!(EventLimit::clamped(0).get(), 1);
        assert_eq!(EventLimit::clamped(-7).get(), 1);
        assert_eq!(EventLimit::clamped(17).get(), 17);
        assert_eq!(EventLimit::clamped(51).get(), 50);
        assert_eq!(EventLimit::clamped(i64::MAX).get(), 50);
    }

    #[test]
    fn limit_from_query() {
        assert_eq!(EventLimit::from_query(None), EventLimit::DEFAULT);
        assert_eq!(EventLimit::from_query(Some("10")).get(), 10);
        assert_eq!(EventLimit::from_query(Some(" 3 ")).get(), 3);
        assert_eq!(EventLimit::from_query(Some("500")).get(), 50);
        assert_eq!(EventLimit::from_query(Some("-1")).get(), 1);
    }

    #[test]
    fn unparseable_limit_uses_default() {
        assert_eq!(EventLimit::from_query(Some("ten")), EventLimit::DEFAULT);
        assert_eq!(EventLimit::from_query(Some("")), EventLimit::DEFAULT);
        assert_eq!(EventLimit::from_query(Some("2.5")), EventLimit::DEFAULT);
        assert_eq!(
            EventLimit::from_query(Some("99999999999999999999999")),
            EventLimit::DEFAULT
        );
    }

    #[test]
    fn event_json_shape() {
        let event = Event {
            id: 42,
            ts: Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap(),
            node: "pg-a".into(),
            note: String::new(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["id"], 42);
        assert_eq!(json["ts"], "2024-05-01T12:30:00.000000Z");
        assert_eq!(json["node"], "pg-a");
        assert_eq!(json["note"], "");

        let back: Event = serde_json::from_value(json).unwrap();
        assert_eq!(back, event);
    }
}
