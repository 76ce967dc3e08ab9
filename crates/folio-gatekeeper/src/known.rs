//! The set of source ids a claim may cite

use folio_domain::{FactRegistry, SourceCacheEntry};
use std::collections::HashSet;
use std::fmt;

/// Source ids considered known during validation
///
/// The ids of the request's source cache, optionally extended by a read-only
/// fact registry. The set counts as empty only when there are no cache ids
/// and no registry is attached.
#[derive(Default)]
pub struct KnownSources<'a> {
    ids: HashSet<&'a str>,
    registry: Option<&'a dyn FactRegistry>,
}

impl<'a> KnownSources<'a> {
    /// Known set built from a source cache
    pub fn from_cache(cache: &'a [SourceCacheEntry]) -> Self {
        Self {
            ids: cache.iter().map(|entry| entry.id.as_str()).collect(),
            registry: None,
        }
    }

    /// Also accept any fact the registry knows
    pub fn with_registry(mut self, registry: &'a dyn FactRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Whether nothing is known at all
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty() && self.registry.is_none()
    }

    /// Whether `fact_id` is a known source
    pub fn contains(&self, fact_id: &str) -> bool {
        self.ids.contains(fact_id) || self.registry.is_some_and(|r| r.contains_fact(fact_id))
    }

    /// Number of cache ids (the registry is not counted)
    pub fn cache_len(&self) -> usize {
        self.ids.len()
    }
}

impl fmt::Debug for KnownSources<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KnownSources")
            .field("ids", &self.ids)
            .field("registry", &self.registry.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn cache(ids: &[&str]) -> Vec<SourceCacheEntry> {
        ids.iter()
            .map(|id| SourceCacheEntry::new(*id, format!("https://{id}.example"), *id, ""))
            .collect()
    }

    #[test]
    fn test_empty_cache_without_registry_is_empty() {
        let entries = cache(&[]);
        let known = KnownSources::from_cache(&entries);
        assert!(known.is_empty());
        assert!(!known.contains("anything"));
    }

    #[test]
    fn test_cache_ids_are_known() {
        let entries = cache(&["a", "b"]);
        let known = KnownSources::from_cache(&entries);
        assert!(!known.is_empty());
        assert_eq!(known.cache_len(), 2);
        assert!(known.contains("a"));
        assert!(!known.contains("c"));
    }

    #[test]
    fn test_registry_extends_known_set() {
        let entries = cache(&["a"]);
        let registry: BTreeSet<String> = ["r1".to_string()].into_iter().collect();
        let known = KnownSources::from_cache(&entries).with_registry(&registry);
        assert!(known.contains("a"));
        assert!(known.contains("r1"));
        assert!(!known.contains("r2"));
    }

    #[test]
    fn test_registry_alone_is_not_empty() {
        let entries = cache(&[]);
        let registry: BTreeSet<String> = BTreeSet::new();
        let known = KnownSources::from_cache(&entries).with_registry(&registry);
        assert!(!known.is_empty());
    }
}
