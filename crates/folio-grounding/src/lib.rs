//! Folio Grounding
//!
//! Rewrites a single article section with generated prose that is grounded
//! in a cache of known sources.
//!
//! # Architecture
//!
//! ```text
//! Section + Sources → Relevance Filter → Prompt → Generator → Parser → Claim Validator
//! ```
//!
//! - **Relevance filter**: reorders sources by heading keyword hits; never drops any
//! - **Prompt**: page context, section, sources cut to a character budget, directions, constraints
//! - **Generator**: one call through [`folio_domain::GenerationProvider`]
//! - **Parser**: tolerant of fences, prose and malformed entries; falls back to raw text
//! - **Claim validator**: strict or permissive grounding via `folio-gatekeeper`
//!
//! # Example Usage
//!
//! ```no_run
//! use folio_domain::{PageContext, WriteConstraints};
//! use folio_grounding::{GroundedRewriter, GroundingConfig};
//! use folio_llm::MockProvider;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let provider = MockProvider::new(r#"{"content": "Acme was founded in 2021.", "claimMap": []}"#);
//! let rewriter = GroundedRewriter::new(provider, GroundingConfig::default());
//!
//! let doc = "Intro\n\n## History\n\nOld text.\n";
//! let rewrite = rewriter
//!     .rewrite_in_document(doc, "history", PageContext::titled("Acme"), vec![], None, WriteConstraints::strict())
//!     .await?;
//!
//! println!("{}", rewrite.document);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod parser;
mod prompt;
mod relevance;
mod rewriter;

pub use config::{GroundingConfig, DEFAULT_TRUNCATION_MARKER};
pub use error::GroundingError;
pub use parser::parse_generation_response;
pub use prompt::{format_source, pack_sources, PromptBuilder};
pub use relevance::{filter_sources, heading_keywords, score_source};
pub use rewriter::{section_request, DocumentRewrite, GroundedRewriter};
