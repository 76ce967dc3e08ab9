//! Folio Markup
//!
//! Pure, synchronous transforms over Markdown articles that embed annotation
//! tags.
//!
//! # Overview
//!
//! Every transform here is safe to re-run on its own output:
//!
//! - [`detect_protected_ranges`]: spans that pattern-based rewriting must never touch
//! - [`apply_fact_references`]: wrap verified facts in `<F>` tags outside protected spans
//! - [`repair`]: undo double-wrapping and stray escapes left by upstream tools
//! - [`split_document`] / [`reassemble`]: level-2 section structure
//! - [`renumber_footnotes`]: sequential footnote numbering by first appearance
//!
//! None of these functions return errors or panic on malformed input. The
//! worst case is a no-op, or a construct protected to the end of the document.
//!
//! # Example
//!
//! ```
//! use folio_domain::FactReplacement;
//! use folio_markup::apply_fact_references;
//!
//! let proposal = FactReplacement::new(r"\$30 billion", "anthropic", "5b0663a0");
//! let outcome = apply_fact_references(r"Anthropic raised \$30 billion.", &[proposal]);
//!
//! assert_eq!(outcome.applied, 1);
//! assert_eq!(
//!     outcome.content,
//!     r#"Anthropic raised <F e="anthropic" f="5b0663a0">\$30 billion</F>."#
//! );
//! ```

#![warn(missing_docs)]

mod scan;
mod tags;
mod protected;
mod annotate;
mod repair;
mod sections;
mod footnotes;

pub use protected::{detect_protected_ranges, ProtectedKind, ProtectedRange, ProtectedRanges};
pub use annotate::{apply_fact_references, render_fact_tag};
pub use repair::{collapse_nested_tags, repair, strip_stray_escapes};
pub use sections::{heading_to_id, reassemble, split_document};
pub use footnotes::{footnote_definitions, renumber_footnotes};
pub use tags::{TagFamily, TAG_FAMILIES};
