//! Lead records - discovered candidate sites awaiting analysis.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::ParseStatusError;

/// Status of a discovered lead.
///
/// A lead is born `Unscanned` and exits that state exactly once, when the
/// analysis stage visits it. The downstream outreach outcome lives in the
/// audit record, never here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LeadStatus {
    Unscanned,
    Processed,
}

impl LeadStatus {
    /// Wire string as persisted in the lead store.
    pub fn as_str(&self) -> &'static str {
        match self {
            LeadStatus::Unscanned => "Unscanned",
            LeadStatus::Processed => "Processed",
        }
    }
}

impl fmt::Display for LeadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LeadStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "unscanned" => Ok(LeadStatus::Unscanned),
            "processed" => Ok(LeadStatus::Processed),
            _ => Err(ParseStatusError(s.to_string())),
        }
    }
}

impl Serialize for LeadStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for LeadStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// One discovered candidate business website, pre-analysis.
///
/// The domain identity derived from `url` is unique across a client's
/// combined lead and audit history - enforced by the discovery stage's
/// known-domain set, not by this type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeadRecord {
    #[serde(rename = "URL")]
    pub url: String,

    #[serde(rename = "Status")]
    pub status: LeadStatus,
}

impl LeadRecord {
    /// Column order of the lead store.
    pub const HEADERS: &'static [&'static str] = &["URL", "Status"];

    /// A freshly discovered lead.
    pub fn unscanned(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            status: LeadStatus::Unscanned,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_roundtrips_through_wire_string() {
        for status in [LeadStatus::Unscanned, LeadStatus::Processed] {
            assert_eq!(status.as_str().parse::<LeadStatus>().unwrap(), status);
        }
    }

    #[test]
    fn status_parse_is_case_insensitive() {
        assert_eq!("  unscanned ".parse::<LeadStatus>().unwrap(), LeadStatus::Unscanned);
        assert_eq!("PROCESSED".parse::<LeadStatus>().unwrap(), LeadStatus::Processed);
    }

    #[test]
    fn unknown_status_is_a_parse_error() {
        assert!("Scanned".parse::<LeadStatus>().is_err());
    }
}
