//! UTC instants with nanosecond precision, serialized as RFC 3339 with
//! fractional seconds. The parser round-trips what the formatter emits.

use time::format_description::well_known::Rfc3339;
use time::{Duration, OffsetDateTime};

use crate::errors::{RvaError, RvaResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(OffsetDateTime);

impl Timestamp {
    pub fn now() -> Self {
        Self(OffsetDateTime::now_utc())
    }

    pub fn from_rfc3339(s: &str) -> RvaResult<Self> {
        OffsetDateTime::parse(s, &Rfc3339)
            .map(Self)
            .map_err(|e| RvaError::InvalidTimestamp(format!("{s:?}: {e}")))
    }

    pub fn to_rfc3339(&self) -> RvaResult<String> {
        self.0
            .format(&Rfc3339)
            .map_err(|e| RvaError::InvalidTimestamp(e.to_string()))
    }

    pub fn unix_timestamp_nanos(&self) -> i128 {
        self.0.unix_timestamp_nanos()
    }

    /// `max(self, prev + 1ns)` — the clamp recommended in the design notes
    /// to keep register timestamps monotonic under concurrent append even
    /// if the wall clock goes backward between threads.
    pub fn clamped_after(&self, prev: &Timestamp) -> Timestamp {
        let floor = prev.0 + Duration::nanoseconds(1);
        if self.0 > floor {
            *self
        } else {
            Timestamp(floor)
        }
    }
}

impl serde::Serialize for Timestamp {
    fn serialize<S: serde::Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        let text = self.to_rfc3339().map_err(serde::ser::Error::custom)?;
        s.serialize_str(&text)
    }
}

impl<'de> serde::Deserialize<'de> for Timestamp {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let s = String::deserialize(d)?;
        Self::from_rfc3339(&s).map_err(serde::de::Error::custom)
    }
}
