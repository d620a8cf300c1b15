//! UTC instants used for lifecycle and event times.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Serialized as an RFC 3339 string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    pub fn now() -> Self {
        Self(Utc::now())
    }

    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(value: DateTime<Utc>) -> Self {
        Self(value)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.to_rfc3339_opts(SecondsFormat::Millis, true))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn display_is_rfc3339_millis() {
        let ts = Timestamp::from(Utc.with_ymd_and_hms(2026, 3, 1, 8, 30, 0).unwrap());
        assert_eq!(ts.to_string(), "2026-03-01T08:30:00.000Z");
    }

    #[test]
    fn later_instants_order_after() {
        let earlier = Timestamp::from(Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap());
        let later = Timestamp::now();
        assert!(earlier < later);
        assert!(later.as_datetime() > earlier.as_datetime());
    }

    #[test]
    fn json_round_trip_keeps_instant() {
        let ts = Timestamp::now();
        let json = serde_json::to_string(&ts).unwrap();
        assert!(json.starts_with('"'));
        assert_eq!(serde_json::from_str::<Timestamp>(&json).unwrap(), ts);
    }
}
