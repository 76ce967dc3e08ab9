//! Trait definitions for external interactions
//!
//! These traits define the boundaries between the pure document core and the
//! collaborators it consumes. Implementations live in other crates or in the
//! caller.

use std::collections::{BTreeSet, HashSet};

/// A text generation backend
///
/// Implemented by the infrastructure layer (folio-llm) or by the caller.
/// A failure must surface as `Err`, never as a malformed `Ok` payload.
pub trait GenerationProvider {
    /// Error type for generation calls
    type Error;

    /// Generate a completion for `prompt`
    fn generate(&self, prompt: &str) -> Result<String, Self::Error>;
}

/// Read-only view of the fact/entity registry
///
/// Used only to decide whether a cited `factId` is known.
pub trait FactRegistry {
    /// Whether the registry knows `fact_id`
    fn contains_fact(&self, fact_id: &str) -> bool;
}

impl FactRegistry for HashSet<String> {
    fn contains_fact(&self, fact_id: &str) -> bool {
        self.contains(fact_id)
    }
}

impl FactRegistry for BTreeSet<String> {
    fn contains_fact(&self, fact_id: &str) -> bool {
        self.contains(fact_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_registries() {
        let hashed: HashSet<String> = ["a".to_string()].into_iter().collect();
        let ordered: BTreeSet<String> = ["b".to_string()].into_iter().collect();
        assert!(hashed.contains_fact("a"));
        assert!(!hashed.contains_fact("b"));
        assert!(ordered.contains_fact("b"));
    }
}
