//! Fact reference proposals

use serde::{Deserialize, Serialize};

/// A proposal to bind a span of visible text to a canonical (entity, fact) pair
///
/// Proposals that share `search_text` describe the same edit and collapse to a
/// single operation when applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FactReplacement {
    /// Literal text to locate in the document
    pub search_text: String,

    /// Entity identifier written into the `e` attribute
    pub entity_id: String,

    /// Fact identifier written into the `f` attribute
    pub fact_id: String,

    /// Suggested display text. Never written into the document: the tag body
    /// is always the text that was actually matched.
    #[serde(default)]
    pub display_text: String,
}

impl FactReplacement {
    /// Create a proposal whose display text equals its search text
    pub fn new(
        search_text: impl Into<String>,
        entity_id: impl Into<String>,
        fact_id: impl Into<String>,
    ) -> Self {
        let search_text = search_text.into();
        Self {
            display_text: search_text.clone(),
            search_text,
            entity_id: entity_id.into(),
            fact_id: fact_id.into(),
        }
    }
}

/// Result of applying a batch of fact proposals
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotationOutcome {
    /// The (possibly) edited content
    pub content: String,

    /// Number of proposals that produced an edit
    pub applied: usize,

    /// The proposals that produced an edit, in application order
    pub applied_replacements: Vec<FactReplacement>,
}

impl AnnotationOutcome {
    /// An outcome that leaves `content` untouched
    pub fn unchanged(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            applied: 0,
            applied_replacements: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_camel_case_proposal() {
        let json = r#"{
            "searchText": "$30 billion",
            "entityId": "anthropic",
            "factId": "5b0663a0",
            "displayText": "$30B"
        }"#;
        let proposal: FactReplacement = serde_json::from_str(json).unwrap();
        assert_eq!(proposal.search_text, "$30 billion");
        assert_eq!(proposal.entity_id, "anthropic");
        assert_eq!(proposal.fact_id, "5b0663a0");
        assert_eq!(proposal.display_text, "$30B");
    }

    #[test]
    fn test_display_text_is_optional() {
        let json = r#"{"searchText": "x", "entityId": "e", "factId": "f"}"#;
        let proposal: FactReplacement = serde_json::from_str(json).unwrap();
        assert!(proposal.display_text.is_empty());
    }

    #[test]
    fn test_unchanged_outcome() {
        let outcome = AnnotationOutcome::unchanged("text");
        assert_eq!(outcome.content, "text");
        assert_eq!(outcome.applied, 0);
        assert!(outcome.applied_replacements.is_empty());
    }
}
