//! Model override value object

use crate::core::error::DomainError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Separator used by the backend between the parts of an alternate model string.
const SEPARATOR: &str = "__";

/// A provider/version pair used to override a session's model (Value Object)
///
/// The backend addresses models as `{name}__{provider}__{version}`, where
/// `name` is the configured provider entry (usually `Default`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModelSpec {
    name: String,
    provider: String,
    version: String,
}

impl ModelSpec {
    pub fn new(
        name: impl Into<String>,
        provider: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            provider: provider.into(),
            version: version.into(),
        }
    }

    /// The model every triage session runs under.
    pub fn triage_default() -> Self {
        Self::new("Default", "openai", "gpt-4o")
    }

    pub fn provider(&self) -> &str {
        &self.provider
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// The string form accepted by the model-override endpoint.
    pub fn alternate_model(&self) -> String {
        self.to_string()
    }
}

impl Default for ModelSpec {
    fn default() -> Self {
        Self::triage_default()
    }
}

impl std::fmt::Display for ModelSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}{SEPARATOR}{}{SEPARATOR}{}",
            self.name, self.provider, self.version
        )
    }
}

impl std::str::FromStr for ModelSpec {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(3, SEPARATOR);
        match (parts.next(), parts.next(), parts.next()) {
            (Some(name), Some(provider), Some(version))
                if !name.is_empty() && !provider.is_empty() && !version.is_empty() =>
            {
                Ok(Self::new(name, provider, version))
            }
            _ => Err(DomainError::InvalidModelSpec(format!(
                "expected name{SEPARATOR}provider{SEPARATOR}version, got '{}'",
                s
            ))),
        }
    }
}

impl Serialize for ModelSpec {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for ModelSpec {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
