//! Grounded section rewriting contract

use crate::SourceCacheEntry;
use serde::{Deserialize, Serialize};

/// Provenance edge from a generated claim to the source that justifies it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimMapEntry {
    /// The claim as it appears in the generated prose
    pub claim: String,

    /// Identifier of the cited source
    pub fact_id: String,

    /// URL of the cited source
    #[serde(default)]
    pub source_url: String,

    /// Supporting quote from the source, if the generator supplied one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quote: Option<String>,
}

/// Page-level context handed to the generator alongside the section
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageContext {
    /// Page title
    pub title: String,

    /// Kind of entity the page describes (organization, person, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_type: Option<String>,

    /// Short description of the page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl PageContext {
    /// Context with only a title
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }
}

/// Constraints on a grounded rewrite
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WriteConstraints {
    /// Permissive grounding: claims citing unknown sources are kept
    #[serde(default)]
    pub allow_training_knowledge: bool,

    /// Approximate target length of the rewritten section, in words
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_words: Option<usize>,
}

impl WriteConstraints {
    /// Only claims backed by known sources survive validation
    pub fn strict() -> Self {
        Self {
            allow_training_knowledge: false,
            target_words: None,
        }
    }

    /// Claims citing unknown sources are kept as-is
    pub fn permissive() -> Self {
        Self {
            allow_training_knowledge: true,
            target_words: None,
        }
    }
}

/// Request to rewrite one section with source-grounded prose
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroundedWriteRequest {
    /// Id of the section being rewritten
    pub section_id: String,

    /// Current section content (heading line included when available)
    pub section_content: String,

    /// Page-level context
    pub page_context: PageContext,

    /// Sources the generator may cite
    #[serde(default)]
    pub source_cache: Vec<SourceCacheEntry>,

    /// Free-form editorial directions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directions: Option<String>,

    /// Grounding and length constraints
    #[serde(default)]
    pub constraints: WriteConstraints,
}

/// Validated outcome of a grounded rewrite
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroundedWriteResult {
    /// Id of the section that was rewritten
    pub section_id: String,

    /// Rewritten section content
    pub content: String,

    /// Claims with an accepted source
    #[serde(default)]
    pub claim_map: Vec<ClaimMapEntry>,

    /// Claims that could not be tied to a known source
    #[serde(default)]
    pub unsourceable_claims: Vec<String>,
}
