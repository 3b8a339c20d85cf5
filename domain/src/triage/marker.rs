//! Trigger marker value object

use crate::core::error::DomainError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Substring in a triage answer that calls for the detailed stage (Value Object)
///
/// Stored case-folded; matching is a case-insensitive substring test.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TriggerMarker(String);

impl TriggerMarker {
    /// Marker emitted by the triage profile for case inquiries.
    pub const CASE_INQUIRY: &'static str = "case_inquiry";

    pub fn new(marker: impl AsRef<str>) -> Result<Self, DomainError> {
        let marker = marker.as_ref();
        if marker.trim().is_empty() {
            return Err(DomainError::InvalidMarker(
                "marker cannot be empty".to_string(),
            ));
        }
        Ok(Self(marker.to_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True iff `text` contains the marker, ignoring case.
    pub fn matches(&self, text: &str) -> bool {
        text.to_lowercase().contains(&self.0)
    }
}

impl Default for TriggerMarker {
    fn default() -> Self {
        Self(Self::CASE_INQUIRY.to_string())
    }
}

impl std::fmt::Display for TriggerMarker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for TriggerMarker {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for TriggerMarker {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        TriggerMarker::new(s).map_err(serde::de::Error::custom)
    }
}
