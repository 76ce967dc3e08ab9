//! Configuration for grounded rewriting

use folio_domain::WriteConstraints;
use serde::{Deserialize, Serialize};

/// Default marker appended when sources are cut to the budget
pub const DEFAULT_TRUNCATION_MARKER: &str = "[... additional sources truncated ...]";

/// Configuration for the grounded rewriter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroundingConfig {
    /// Character budget for the formatted sources block of a prompt
    pub source_char_budget: usize,

    /// Text appended after the sources block when it was cut
    pub truncation_marker: String,

    /// Longest section (characters) accepted for rewriting
    pub max_section_length: usize,

    /// Grounding used when a caller does not choose one
    pub default_allow_training_knowledge: bool,
}

impl GroundingConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.source_char_budget == 0 {
            return Err("source_char_budget must be greater than 0".to_string());
        }
        if self.truncation_marker.trim().is_empty() {
            return Err("truncation_marker must not be blank".to_string());
        }
        if self.max_section_length == 0 {
            return Err("max_section_length must be greater than 0".to_string());
        }
        Ok(())
    }

    /// Constraints implied by this configuration
    pub fn default_constraints(&self) -> WriteConstraints {
        WriteConstraints {
            allow_training_knowledge: self.default_allow_training_knowledge,
            target_words: None,
        }
    }
}

impl Default for GroundingConfig {
    fn default() -> Self {
        Self {
            source_char_budget: 12_000,
            truncation_marker: DEFAULT_TRUNCATION_MARKER.to_string(),
            max_section_length: 50_000,
            default_allow_training_knowledge: false,
        }
    }
}

impl GroundingConfig {
    /// Compact preset: small prompts for short-context models
    pub fn compact() -> Self {
        Self {
            source_char_budget: 4_000,
            max_section_length: 20_000,
            ..Self::default()
        }
    }

    /// Expansive preset: room for many long sources
    pub fn expansive() -> Self {
        Self {
            source_char_budget: 48_000,
            max_section_length: 100_000,
            ..Self::default()
        }
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}
