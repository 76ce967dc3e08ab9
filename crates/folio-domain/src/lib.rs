//! Folio Domain Layer
//!
//! Value types and trait seams shared by every Folio crate. Nothing in here
//! touches the network or the filesystem; documents, proposals and sources are
//! transient values re-derived from a document string on every invocation.
//!
//! ## Key Concepts
//!
//! - **Section**: a level-2 heading plus the body that follows it
//! - **Fact replacement**: a proposal to bind visible text to an (entity, fact) pair
//! - **Source cache entry**: a known source the generator is allowed to cite
//! - **Claim map**: provenance linking generated prose to a justifying source
//! - **Grounding**: strict (known sources only) or permissive citation rules
//!
//! ## Architecture
//!
//! - Only `serde` as an external dependency
//! - Infrastructure implementations (generation providers, registries) live in
//!   other crates and plug in through [`traits`]

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod fact;
pub mod grounding;
pub mod section;
pub mod source;
pub mod traits;

// Re-exports for convenience
pub use fact::{AnnotationOutcome, FactReplacement};
pub use grounding::{
    ClaimMapEntry, GroundedWriteRequest, GroundedWriteResult, PageContext, WriteConstraints,
};
pub use section::{ParsedDocument, Section};
pub use source::SourceCacheEntry;
pub use traits::{FactRegistry, GenerationProvider};
