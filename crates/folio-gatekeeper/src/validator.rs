//! Claim validation logic

use crate::KnownSources;
use folio_domain::{ClaimMapEntry, GroundedWriteResult, WriteConstraints};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// How claims citing unknown sources are treated
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroundingMode {
    /// Unknown citations are moved to the unsourceable list
    #[default]
    Strict,

    /// Unknown citations are kept; the generator may draw on training knowledge
    Permissive,
}

impl GroundingMode {
    /// Mode selected by a request's constraints
    pub fn from_constraints(constraints: &WriteConstraints) -> Self {
        if constraints.allow_training_knowledge {
            GroundingMode::Permissive
        } else {
            GroundingMode::Strict
        }
    }
}

/// Decision for a single claim-map entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimVerdict {
    /// Nothing is known, so every citation is accepted
    NoKnownSources,

    /// The cited id is known
    Known,

    /// Unknown id under strict grounding
    UnknownStrict,

    /// Unknown id under permissive grounding
    UnknownPermissive,
}

impl ClaimVerdict {
    /// Whether the entry stays in the claim map
    pub fn keeps_claim(self) -> bool {
        match self {
            ClaimVerdict::NoKnownSources | ClaimVerdict::Known | ClaimVerdict::UnknownPermissive => true,
            ClaimVerdict::UnknownStrict => false,
        }
    }
}

/// Overall outcome of a validation pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationStatus {
    /// Every claim cites a known source (or nothing is known)
    Grounded,

    /// Some claims cite unknown sources and were kept (permissive)
    AcceptedUnverified,

    /// Some claims were moved to the unsourceable list (strict)
    Reclassified,
}

/// Validated result plus the per-entry verdicts, in claim-map order
#[derive(Debug, Clone)]
pub struct ValidationReport {
    /// The result with the claim map filtered according to the verdicts
    pub result: GroundedWriteResult,

    /// One verdict per entry of the incoming claim map
    pub verdicts: Vec<ClaimVerdict>,
}

impl ValidationReport {
    /// Number of claims moved to the unsourceable list
    pub fn reclassified(&self) -> usize {
        self.count(ClaimVerdict::UnknownStrict)
    }

    /// Number of unknown citations kept under permissive grounding
    pub fn accepted_unverified(&self) -> usize {
        self.count(ClaimVerdict::UnknownPermissive)
    }

    fn count(&self, verdict: ClaimVerdict) -> usize {
        self.verdicts.iter().filter(|v| **v == verdict).count()
    }

    /// Summary status
    pub fn status(&self) -> ValidationStatus {
        if self.reclassified() > 0 {
            ValidationStatus::Reclassified
        } else if self.accepted_unverified() > 0 {
            ValidationStatus::AcceptedUnverified
        } else {
            ValidationStatus::Grounded
        }
    }
}

/// Validates generated claim maps against known sources
#[derive(Debug, Clone, Copy, Default)]
pub struct ClaimValidator {
    mode: GroundingMode,
}

impl ClaimValidator {
    /// Create a validator for `mode`
    pub fn new(mode: GroundingMode) -> Self {
        Self { mode }
    }

    /// Validator configured from a request's constraints
    pub fn for_constraints(constraints: &WriteConstraints) -> Self {
        Self::new(GroundingMode::from_constraints(constraints))
    }

    /// The grounding mode in force
    pub fn mode(&self) -> GroundingMode {
        self.mode
    }

    /// Decide one entry
    pub fn verdict(&self, entry: &ClaimMapEntry, known: &KnownSources<'_>) -> ClaimVerdict {
        match (known.is_empty(), known.contains(&entry.fact_id), self.mode) {
            (true, _, _) => ClaimVerdict::NoKnownSources,
            (false, true, _) => ClaimVerdict::Known,
            (false, false, GroundingMode::Strict) => ClaimVerdict::UnknownStrict,
            (false, false, GroundingMode::Permissive) => ClaimVerdict::UnknownPermissive,
        }
    }

    /// Validate every claim-map entry of `result`
    ///
    /// Entries are processed in order. Under strict grounding an entry citing
    /// an unknown source is dropped from the claim map and its claim text is
    /// appended to `unsourceable_claims`, after any the generator already
    /// listed. Content is never touched. This never fails.
    pub fn validate(&self, mut result: GroundedWriteResult, known: &KnownSources<'_>) -> ValidationReport {
        let entries = std::mem::take(&mut result.claim_map);
        let mut verdicts = Vec::with_capacity(entries.len());

        for entry in entries {
            let verdict = self.verdict(&entry, known);
            verdicts.push(verdict);
            match verdict {
                ClaimVerdict::NoKnownSources | ClaimVerdict::Known => result.claim_map.push(entry),
                ClaimVerdict::UnknownPermissive => {
                    debug!(fact_id = %entry.fact_id, "Keeping claim with unknown source");
                    result.claim_map.push(entry);
                }
                ClaimVerdict::UnknownStrict => {
                    debug!(fact_id = %entry.fact_id, "Moving claim with unknown source to unsourceable");
                    result.unsourceable_claims.push(entry.claim);
                }
            }
        }

        let report = ValidationReport { result, verdicts };
        if report.reclassified() > 0 {
            info!(
                section = %report.result.section_id,
                reclassified = report.reclassified(),
                "Claims citing unknown sources reclassified as unsourceable"
            );
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_domain::SourceCacheEntry;
    use std::collections::HashSet;

    fn entry(claim: &str, fact_id: &str) -> ClaimMapEntry {
        ClaimMapEntry {
            claim: claim.to_string(),
            fact_id: fact_id.to_string(),
            source_url: format!("https://{fact_id}.example"),
            quote: None,
        }
    }

    fn result_with(entries: Vec<ClaimMapEntry>) -> GroundedWriteResult {
        GroundedWriteResult {
            section_id: "funding".to_string(),
            content: "Body".to_string(),
            claim_map: entries,
            unsourceable_claims: vec!["generator flagged".to_string()],
        }
    }

    fn cache() -> Vec<SourceCacheEntry> {
        vec![
            SourceCacheEntry::new("src-1", "https://one.example", "One", "text"),
            SourceCacheEntry::new("src-2", "https://two.example", "Two", "text"),
        ]
    }

    #[test]
    fn test_mode_from_constraints() {
        assert_eq!(GroundingMode::from_constraints(&WriteConstraints::strict()), GroundingMode::Strict);
        assert_eq!(
            GroundingMode::from_constraints(&WriteConstraints::permissive()),
            GroundingMode::Permissive
        );
        assert_eq!(GroundingMode::default(), GroundingMode::Strict);
    }

    #[test]
    fn test_known_claim_kept() {
        let sources = cache();
        let known = KnownSources::from_cache(&sources);
        let report = ClaimValidator::new(GroundingMode::Strict)
            .validate(result_with(vec![entry("A", "src-1")]), &known);

        assert_eq!(report.verdicts, vec![ClaimVerdict::Known]);
        assert_eq!(report.result.claim_map.len(), 1);
        assert_eq!(report.result.unsourceable_claims, vec!["generator flagged"]);
        assert_eq!(report.status(), ValidationStatus::Grounded);
    }

    #[test]
    fn test_strict_moves_unknown() {
        let sources = cache();
        let known = KnownSources::from_cache(&sources);
        let report = ClaimValidator::new(GroundingMode::Strict).validate(
            result_with(vec![entry("A", "src-1"), entry("B", "invented"), entry("C", "src-2")]),
            &known,
        );

        assert_eq!(
            report.verdicts,
            vec![ClaimVerdict::Known, ClaimVerdict::UnknownStrict, ClaimVerdict::Known]
        );
        let kept: Vec<&str> = report.result.claim_map.iter().map(|e| e.claim.as_str()).collect();
        assert_eq!(kept, vec!["A", "C"]);
        assert_eq!(report.result.unsourceable_claims, vec!["generator flagged", "B"]);
        assert_eq!(report.reclassified(), 1);
        assert_eq!(report.status(), ValidationStatus::Reclassified);
        assert_eq!(report.result.content, "Body");
    }

    #[test]
    fn test_permissive_keeps_unknown() {
        let sources = cache();
        let known = KnownSources::from_cache(&sources);
        let report = ClaimValidator::new(GroundingMode::Permissive)
            .validate(result_with(vec![entry("B", "invented")]), &known);

        assert_eq!(report.verdicts, vec![ClaimVerdict::UnknownPermissive]);
        assert_eq!(report.result.claim_map, vec![entry("B", "invented")]);
        assert_eq!(report.result.unsourceable_claims, vec!["generator flagged"]);
        assert_eq!(report.accepted_unverified(), 1);
        assert_eq!(report.status(), ValidationStatus::AcceptedUnverified);
    }

    #[test]
    fn test_empty_known_set_accepts_everything() {
        let sources: Vec<SourceCacheEntry> = Vec::new();
        let known = KnownSources::from_cache(&sources);
        for mode in [GroundingMode::Strict, GroundingMode::Permissive] {
            let report = ClaimValidator::new(mode)
                .validate(result_with(vec![entry("X", "anything"), entry("Y", "")]), &known);
            assert_eq!(report.verdicts, vec![ClaimVerdict::NoKnownSources; 2]);
            assert_eq!(report.result.claim_map.len(), 2);
        }
    }

    #[test]
    fn test_registry_makes_claim_known() {
        let sources = cache();
        let registry: HashSet<String> = ["fact-9".to_string()].into_iter().collect();
        let known = KnownSources::from_cache(&sources).with_registry(&registry);
        let validator = ClaimValidator::new(GroundingMode::Strict);
        assert_eq!(validator.verdict(&entry("Z", "fact-9"), &known), ClaimVerdict::Known);
        assert_eq!(validator.verdict(&entry("Z", "fact-10"), &known), ClaimVerdict::UnknownStrict);
    }

    #[test]
    fn test_verdict_keeps_claim() {
        assert!(ClaimVerdict::NoKnownSources.keeps_claim());
        assert!(ClaimVerdict::Known.keeps_claim());
        assert!(ClaimVerdict::UnknownPermissive.keeps_claim());
        assert!(!ClaimVerdict::UnknownStrict.keeps_claim());
    }

    #[test]
    fn test_mode_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&GroundingMode::Permissive).unwrap(), "\"permissive\"");
    }
}
