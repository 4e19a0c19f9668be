use std::fmt;

use serde::{Deserialize, Serialize};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::ValidationError;

/// Instant stamped on records and envelopes, written as RFC3339 in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UtcDateTime(OffsetDateTime);

impl UtcDateTime {
    pub fn now() -> Self {
        Self(OffsetDateTime::now_utc())
    }

    /// Accepts RFC3339 text whose offset is zero (`Z` or `+00:00`).
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        match OffsetDateTime::parse(input, &Rfc3339) {
            Ok(value) if value.offset().is_utc() => Ok(Self(value)),
            _ => Err(ValidationError::TimestampNotUtc {
                value: input.to_owned(),
            }),
        }
    }
}

impl fmt::Display for UtcDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.format(&Rfc3339) {
            Ok(text) => f.write_str(&text),
            // Only years outside 0..=9999 fail to format.
            Err(_) => write!(f, "{}", self.0.unix_timestamp()),
        }
    }
}

impl TryFrom<String> for UtcDateTime {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<UtcDateTime> for String {
    fn from(value: UtcDateTime) -> Self {
        value.to_string()
    }
}
