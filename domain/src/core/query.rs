//! Query value object

use serde::{Deserialize, Serialize};

/// A natural-language weather question (Value Object)
///
/// Immutable once received. Keyword matching always works on
/// [`Query::normalized`], the lowercased form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    text: String,
    normalized: String,
}

impl Query {
    /// Create a new query from raw user input
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let normalized = text.to_lowercase();
        Self { text, normalized }
    }

    /// Try to create a new query, returning None if blank
    pub fn try_new(text: impl Into<String>) -> Option<Self> {
        let text = text.into();
        if text.trim().is_empty() {
            None
        } else {
            Some(Self::new(text))
        }
    }

    /// The text exactly as received
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Lowercased text used for keyword matching
    pub fn normalized(&self) -> &str {
        &self.normalized
    }

    /// Whether the lowercased text contains any of the given keywords
    pub fn mentions_any(&self, keywords: &[&str]) -> bool {
        keywords.iter().any(|k| self.normalized.contains(k))
    }
}

impl std::fmt::Display for Query {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.text)
    }
}

impl From<&str> for Query {
    fn from(s: &str) -> Self {
        Query::new(s)
    }
}

impl From<String> for Query {
    fn from(s: String) -> Self {
        Query::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_keeps_original_text() {
        let q = Query::new("Weather in LONDON?");
        assert_eq!(q.text(), "Weather in LONDON?");
        assert_eq!(q.normalized(), "weather in london?");
    }

    #[test]
    fn test_try_new_blank() {
        assert!(Query::try_new("").is_none());
        assert!(Query::try_new("   ").is_none());
        assert!(Query::try_new("rain?").is_some());
    }

    #[test]
    fn test_mentions_any() {
        let q: Query = "Is a STORM coming?".into();
        assert!(q.mentions_any(&["storm", "alert"]));
        assert!(!q.mentions_any(&["snow"]));
    }
}
