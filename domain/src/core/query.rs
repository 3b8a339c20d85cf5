//! Query value object

use super::error::DomainError;

/// The caller's free-text query (Value Object)
///
/// The same query is sent verbatim to the triage exchange and, when
/// triggered, to the detailed exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    content: String,
}

impl Query {
    /// Try to create a query, rejecting empty or whitespace-only text
    pub fn try_new(content: impl Into<String>) -> Result<Self, DomainError> {
        let content = content.into();
        if content.trim().is_empty() {
            return Err(DomainError::InvalidQuery(
                "query cannot be empty".to_string(),
            ));
        }
        Ok(Self { content })
    }

    /// Get the query content
    pub fn content(&self) -> &str {
        &self.content
    }
}

impl std::fmt::Display for Query {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.content)
    }
}
