//! Source relevance filtering
//!
//! Sources are ordered by how often the section heading's keywords occur in
//! their title and facts. Nothing is ever dropped.

use folio_domain::SourceCacheEntry;
use std::cmp::Reverse;

/// Minimum keyword length, exclusive
const MIN_KEYWORD_CHARS: usize = 3;

/// Lowercased heading words longer than three characters, first occurrence
/// order, without repeats
pub fn heading_keywords(heading: &str) -> Vec<String> {
    let mut keywords: Vec<String> = Vec::new();
    for word in heading.split(|c: char| !c.is_alphanumeric()) {
        if word.chars().count() <= MIN_KEYWORD_CHARS {
            continue;
        }
        let word = word.to_lowercase();
        if !keywords.contains(&word) {
            keywords.push(word);
        }
    }
    keywords
}

/// Total keyword occurrences in the source's title and facts text
///
/// Raw content is never scored; a source without curated facts is ranked by
/// its title alone.
pub fn score_source(keywords: &[String], source: &SourceCacheEntry) -> usize {
    let facts = source.facts.as_deref().unwrap_or("");
    let haystack = format!("{}\n{}", source.title, facts).to_lowercase();
    keywords
        .iter()
        .map(|keyword| haystack.matches(keyword.as_str()).count())
        .sum()
}

/// Reorder `sources` by descending relevance to `heading`
///
/// The sort is stable, so equally scored sources keep their input order.
/// Membership and length are unchanged.
pub fn filter_sources(heading: &str, mut sources: Vec<SourceCacheEntry>) -> Vec<SourceCacheEntry> {
    let keywords = heading_keywords(heading);
    if keywords.is_empty() {
        return sources;
    }
    sources.sort_by_cached_key(|source| Reverse(score_source(&keywords, source)));
    sources
}
