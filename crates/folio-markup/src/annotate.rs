//! Fact reference annotation

use crate::protected::{detect_protected_ranges, ProtectedRanges};
use crate::tags::{fact_tags, TagFamily};
use folio_domain::{AnnotationOutcome, FactReplacement};
use std::collections::HashSet;
use tracing::debug;

/// Render a fact reference tag around `body`
///
/// Attribute values have `&` and `"` escaped; the body is written verbatim.
pub fn render_fact_tag(entity_id: &str, fact_id: &str, body: &str) -> String {
    let name = TagFamily::FactReference.tag_name();
    format!(
        "<{name} e=\"{}\" f=\"{}\">{body}</{name}>",
        escape_attribute(entity_id),
        escape_attribute(fact_id),
    )
}

fn escape_attribute(value: &str) -> String {
    value.replace('&', "&amp;").replace('"', "&quot;")
}

/// Offset of the first occurrence of `needle` that does not touch a protected
/// range
///
/// Earlier protected occurrences are skipped, not treated as a stop.
/// Candidates may overlap a rejected one.
fn first_unprotected(haystack: &str, needle: &str, ranges: &ProtectedRanges) -> Option<usize> {
    let mut from = 0;
    while let Some(rel) = haystack[from..].find(needle) {
        let start = from + rel;
        if !ranges.intersects(start, start + needle.len()) {
            return Some(start);
        }
        let step = haystack[start..].chars().next().map_or(1, char::len_utf8);
        from = start + step;
    }
    None
}

/// Apply fact reference proposals to `content`
///
/// Proposals sharing a `search_text` collapse to the first of them. The
/// surviving proposals are applied in the order their first unprotected
/// occurrence appears in the original content; proposals with no such
/// occurrence keep their supplied order at the end and are skipped.
///
/// Each edit wraps the first unprotected occurrence of `search_text` in an
/// `<F>` tag whose body is the matched text itself. Protected ranges are
/// recomputed against the current content before every edit, so a tag
/// inserted by one proposal shields its text from the next. A proposal is
/// skipped when the incoming content already holds a fact tag with the same
/// attributes around exactly its search text, so running the function on
/// its own output applies nothing even when the search text occurs more than
/// once. Distinct search texts for one fact are each applied.
pub fn apply_fact_references(content: &str, proposals: &[FactReplacement]) -> AnnotationOutcome {
    let mut seen = HashSet::new();
    let unique: Vec<&FactReplacement> = proposals
        .iter()
        .filter(|p| !p.search_text.is_empty())
        .filter(|p| seen.insert(p.search_text.as_str()))
        .collect();

    if unique.is_empty() {
        return AnnotationOutcome::unchanged(content);
    }

    let initial = detect_protected_ranges(content);
    let mut ordered: Vec<(usize, &FactReplacement)> = unique
        .into_iter()
        .map(|p| {
            let position = first_unprotected(content, &p.search_text, &initial).unwrap_or(usize::MAX);
            (position, p)
        })
        .collect();
    ordered.sort_by_key(|(position, _)| *position);

    let mut current = content.to_string();
    let mut applied_replacements = Vec::new();
    let existing = fact_tags(content, &initial);

    for (_, proposal) in ordered {
        let key = (
            escape_attribute(&proposal.entity_id),
            escape_attribute(&proposal.fact_id),
            proposal.search_text.clone(),
        );
        if existing.contains(&key) {
            debug!(fact_id = %proposal.fact_id, "Fact already tagged; skipping proposal");
            continue;
        }
        let ranges = detect_protected_ranges(&current);
        let Some(start) = first_unprotected(&current, &proposal.search_text, &ranges) else {
            debug!(
                search_text = %proposal.search_text,
                fact_id = %proposal.fact_id,
                "No unprotected occurrence; skipping proposal"
            );
            continue;
        };
        let end = start + proposal.search_text.len();
        let tag = render_fact_tag(&proposal.entity_id, &proposal.fact_id, &current[start..end]);
        current.replace_range(start..end, &tag);
        applied_replacements.push(proposal.clone());
    }

    debug!(
        proposals = proposals.len(),
        applied = applied_replacements.len(),
        "Fact references applied"
    );

    AnnotationOutcome {
        content: current,
        applied: applied_replacements.len(),
        applied_replacements,
    }
}
