//! Source cache entries

use serde::{Deserialize, Serialize};

/// A source the generator may cite
///
/// When both are present, curated `facts` take precedence over raw `content`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceCacheEntry {
    /// Identifier cited as `factId` in a claim map
    pub id: String,

    /// Canonical URL
    pub url: String,

    /// Human-readable title
    pub title: String,

    /// Raw extracted text
    #[serde(default)]
    pub content: String,

    /// Curated fact summary
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facts: Option<String>,

    /// Author, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,

    /// Publication date, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

impl SourceCacheEntry {
    /// Create an entry with only the required fields
    pub fn new(
        id: impl Into<String>,
        url: impl Into<String>,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            url: url.into(),
            title: title.into(),
            content: content.into(),
            facts: None,
            author: None,
            date: None,
        }
    }

    /// Attach a curated fact summary
    pub fn with_facts(mut self, facts: impl Into<String>) -> Self {
        self.facts = Some(facts.into());
        self
    }

    /// The text that best represents this source: curated facts when present
    /// and non-empty, raw content otherwise
    pub fn body(&self) -> &str {
        match self.facts.as_deref() {
            Some(facts) if !facts.trim().is_empty() => facts,
            _ => &self.content,
        }
    }
}
