//! Folio Gatekeeper
//!
//! Validates the claim map of a generated section before anything trusts it.
//! Generation output is treated as adversarial: every cited `factId` is
//! checked against the set of known sources, and the grounding mode decides
//! what happens to claims that cite something unknown.
//!
//! The decision has exactly four outcomes:
//!
//! | known set | cited id | mode | outcome |
//! |---|---|---|---|
//! | empty | any | any | kept |
//! | non-empty | known | any | kept |
//! | non-empty | unknown | strict | moved to `unsourceable_claims` |
//! | non-empty | unknown | permissive | kept unchanged |
//!
//! # Examples
//!
//! ```
//! use folio_domain::{ClaimMapEntry, GroundedWriteResult, SourceCacheEntry};
//! use folio_gatekeeper::{ClaimValidator, GroundingMode, KnownSources};
//!
//! let cache = vec![SourceCacheEntry::new("src-1", "https://a.example", "A", "")];
//! let known = KnownSources::from_cache(&cache);
//! let result = GroundedWriteResult {
//!     section_id: "funding".into(),
//!     content: "Raised money.".into(),
//!     claim_map: vec![ClaimMapEntry {
//!         claim: "Raised money".into(),
//!         fact_id: "made-up".into(),
//!         source_url: String::new(),
//!         quote: None,
//!     }],
//!     unsourceable_claims: vec![],
//! };
//!
//! let report = ClaimValidator::new(GroundingMode::Strict).validate(result, &known);
//! assert!(report.result.claim_map.is_empty());
//! assert_eq!(report.result.unsourceable_claims, vec!["Raised money"]);
//! ```

#![warn(missing_docs)]

mod known;
mod validator;

pub use known::KnownSources;
pub use validator::{ClaimValidator, ClaimVerdict, GroundingMode, ValidationReport, ValidationStatus};
