//! Rank command implementation.

use crate::cli::RankArgs;
use crate::error::{CliError, Result};
use crate::input::{read_document, read_json};
use crate::output::Formatter;
use folio_domain::SourceCacheEntry;
use folio_grounding::{filter_sources, heading_keywords, score_source};
use folio_markup::split_document;

/// Rank `sources` against the heading of section `section_id`, paired with
/// their scores.
pub fn rank_sources(
    document: &str,
    section_id: &str,
    sources: Vec<SourceCacheEntry>,
) -> Result<Vec<(usize, SourceCacheEntry)>> {
    let parsed = split_document(document);
    let section = parsed.section(section_id).ok_or_else(|| {
        CliError::InvalidInput(format!(
            "No section '{}' (available: {})",
            section_id,
            parsed.section_ids().join(", ")
        ))
    })?;

    let keywords = heading_keywords(&section.heading);
    Ok(filter_sources(&section.heading, sources)
        .into_iter()
        .map(|source| (score_source(&keywords, &source), source))
        .collect())
}

/// Execute the rank command.
pub fn execute_rank(args: RankArgs, formatter: &Formatter) -> Result<()> {
    let document = read_document(&args.input.input)?;
    let sources: Vec<SourceCacheEntry> = read_json(&args.sources)?;
    let ranked = rank_sources(&document, &args.section, sources)?;
    println!("{}", formatter.format_ranked_sources(&ranked)?);
    Ok(())
}
