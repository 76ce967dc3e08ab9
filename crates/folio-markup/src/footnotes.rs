//! Footnote renumbering
//!
//! Markers come in two equivalent forms, numeric (`[^3]`) and namespaced
//! (`[^SRC-7]`). Identity is the marker string; numbers are assigned by first
//! appearance in the body, and every definition is rebuilt as a single block
//! at the end of the document. Frontmatter, fenced code and inline code are
//! literal text and never renumbered.

use crate::protected::{detect_protected_ranges, ProtectedKind, ProtectedRanges};
use crate::scan::{fence_marker, frontmatter, Frontmatter};
use indexmap::IndexMap;
use regex::{Captures, Regex};
use std::sync::LazyLock;
use tracing::debug;

static MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[\^([A-Za-z0-9][A-Za-z0-9_.:-]*)\]").expect("valid regex")
});

static DEFINITION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[ ]{0,3}\[\^([A-Za-z0-9][A-Za-z0-9_.:-]*)\]:[ \t]?(.*)$").expect("valid regex")
});

enum Line<'a> {
    /// Body text (raw, terminator included), its offset, and whether it is
    /// literal (frontmatter or fenced code) so markers must not be touched
    Body { raw: &'a str, start: usize, in_code: bool },
    /// A `[^label]: text` line
    Definition { label: &'a str, text: &'a str },
}

fn classify(content: &str) -> Vec<Line<'_>> {
    let frontmatter_end = match frontmatter(content) {
        Frontmatter::Closed(end) => end,
        Frontmatter::Absent | Frontmatter::Unterminated => 0,
    };
    let mut lines = Vec::new();
    let mut open_fence: Option<char> = None;
    let mut start = 0;
    for raw in content.split_inclusive('\n') {
        let line_start = start;
        start += raw.len();
        if line_start < frontmatter_end {
            lines.push(Line::Body { raw, start: line_start, in_code: true });
            continue;
        }
        let line = raw.trim_end_matches(['\n', '\r']);
        let marker = fence_marker(line);
        if let Some(style) = open_fence {
            if marker == Some(style) {
                open_fence = None;
            }
            lines.push(Line::Body { raw, start: line_start, in_code: true });
            continue;
        }
        if marker.is_some() {
            open_fence = marker;
            lines.push(Line::Body { raw, start: line_start, in_code: true });
            continue;
        }
        match DEFINITION.captures(line) {
            Some(caps) => {
                let label = caps.get(1).map_or("", |m| m.as_str());
                let text = caps.get(2).map_or("", |m| m.as_str());
                lines.push(Line::Definition { label, text });
            }
            None => lines.push(Line::Body { raw, start: line_start, in_code: false }),
        }
    }
    lines
}

/// Whether the byte at `pos` sits inside an inline code span
fn in_inline_code(ranges: &ProtectedRanges, pos: usize) -> bool {
    ranges
        .covering(pos)
        .is_some_and(|range| range.kind == ProtectedKind::InlineCode)
}

/// Footnote definitions outside frontmatter and fenced code, as
/// `(label, text)` in document order
///
/// Repeated labels are all returned; callers decide which one wins.
pub fn footnote_definitions(content: &str) -> Vec<(&str, &str)> {
    classify(content)
        .into_iter()
        .filter_map(|line| match line {
            Line::Definition { label, text } => Some((label, text)),
            Line::Body { .. } => None,
        })
        .collect()
}

/// Renumber footnotes sequentially by first appearance in the body
///
/// 1. Body lines are scanned top to bottom; each new marker gets the next
///    integer starting at 1, and repeats reuse theirs.
/// 2. Every body marker is rewritten to its number.
/// 3. For each assigned marker the first matching definition wins, and the
///    definitions are emitted once each, in assignment order, as one block at
///    the end of the document.
///
/// Markers and definition-like lines inside frontmatter or fenced code, and
/// markers inside inline code, are left alone.
/// A marker without a definition is renumbered but gets no definition, and
/// definitions whose marker never appears in the body are dropped. Content
/// with no body markers is returned unchanged.
pub fn renumber_footnotes(content: &str) -> String {
    let lines = classify(content);
    let ranges = detect_protected_ranges(content);

    let mut assignments: IndexMap<&str, usize> = IndexMap::new();
    for line in &lines {
        if let Line::Body { raw, start, in_code: false } = line {
            for caps in MARKER.captures_iter(raw) {
                if caps.get(0).is_some_and(|m| in_inline_code(&ranges, start + m.start())) {
                    continue;
                }
                if let Some(label) = caps.get(1) {
                    let next = assignments.len() + 1;
                    assignments.entry(label.as_str()).or_insert(next);
                }
            }
        }
    }

    if assignments.is_empty() {
        return content.to_string();
    }

    let mut definitions: IndexMap<&str, &str> = IndexMap::new();
    let mut body = String::with_capacity(content.len());
    let mut removed_definition = false;

    for line in &lines {
        match line {
            Line::Definition { label, text } => {
                definitions.entry(*label).or_insert(*text);
                removed_definition = true;
            }
            Line::Body { raw, start, in_code } => {
                let blank = raw.trim().is_empty();
                if blank && removed_definition && (body.is_empty() || body.ends_with("\n\n")) {
                    continue;
                }
                if !blank {
                    removed_definition = false;
                }
                if *in_code {
                    body.push_str(*raw);
                } else {
                    let rewritten = MARKER.replace_all(raw, |caps: &Captures| {
                        let literal = caps
                            .get(0)
                            .is_some_and(|m| in_inline_code(&ranges, start + m.start()));
                        let label = caps.get(1).map_or("", |m| m.as_str());
                        match assignments.get(label).filter(|_| !literal) {
                            Some(n) => format!("[^{n}]"),
                            None => caps[0].to_string(),
                        }
                    });
                    body.push_str(&rewritten);
                }
            }
        }
    }

    let block: Vec<String> = assignments
        .iter()
        .filter_map(|(label, n)| {
            definitions
                .get(label)
                .map(|text| format!("[^{n}]: {text}").trim_end().to_string())
        })
        .collect();

    let missing = assignments.len() - block.len();
    if missing > 0 {
        debug!(missing, "Footnote markers without a definition");
    }
    let orphaned = definitions
        .keys()
        .filter(|label| !assignments.contains_key(*label))
        .count();
    if orphaned > 0 {
        debug!(orphaned, "Dropping footnote definitions with no body marker");
    }

    let mut out = body.trim_end().to_string();
    if !block.is_empty() {
        if !out.is_empty() {
            out.push_str("\n\n");
        }
        out.push_str(&block.join("\n"));
    }
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_markers_is_noop() {
        let content = "No footnotes here.\n\n[^1]: orphan definition";
        assert_eq!(renumber_footnotes(content), content);
        assert_eq!(renumber_footnotes(""), "");
    }

    #[test]
    fn test_renumbers_by_first_appearance() {
        let content = "First[^b] then[^a] and again[^b].\n\n[^a]: Alpha\n[^b]: Beta\n";
        assert_eq!(
            renumber_footnotes(content),
            "First[^1] then[^2] and again[^1].\n\n[^1]: Beta\n[^2]: Alpha\n"
        );
    }

    #[test]
    fn test_mixed_dialects() {
        let content = "A[^SRC-7] B[^3] C[^SRC-7]\n\n[^3]: Three\n[^SRC-7]: Seven\n";
        assert_eq!(
            renumber_footnotes(content),
            "A[^1] B[^2] C[^1]\n\n[^1]: Seven\n[^2]: Three\n"
        );
    }

    #[test]
    fn test_first_definition_wins() {
        let content = "X[^1]\n\n[^1]: first\n[^1]: second\n";
        assert_eq!(renumber_footnotes(content), "X[^1]\n\n[^1]: first\n");
    }

    #[test]
    fn test_missing_definition_is_not_fabricated() {
        let content = "X[^src] Y[^other]\n\n[^other]: Other\n";
        assert_eq!(renumber_footnotes(content), "X[^1] Y[^2]\n\n[^2]: Other\n");
    }

    #[test]
    fn test_definitions_moved_from_middle() {
        let content = "Para one[^a].\n\n[^a]: Alpha\n\nPara two[^b].\n\n[^b]: Beta\n";
        assert_eq!(
            renumber_footnotes(content),
            "Para one[^1].\n\nPara two[^2].\n\n[^1]: Alpha\n[^2]: Beta\n"
        );
    }

    #[test]
    fn test_orphan_definitions_dropped() {
        let content = "X[^a]\n\n[^a]: A\n[^zzz]: unused\n";
        assert_eq!(renumber_footnotes(content), "X[^1]\n\n[^1]: A\n");
    }

    #[test]
    fn test_fenced_code_untouched() {
        let content = "Claim[^7].\n\n```md\nExample[^9]\n[^9]: inside code\n```\n\n[^7]: Real\n";
        assert_eq!(
            renumber_footnotes(content),
            "Claim[^1].\n\n```md\nExample[^9]\n[^9]: inside code\n```\n\n[^1]: Real\n"
        );
    }

    #[test]
    fn test_frontmatter_markers_untouched() {
        let content = "---\nnote: see [^z]\n---\nClaim[^a].\n\n[^a]: A\n";
        assert_eq!(
            renumber_footnotes(content),
            "---\nnote: see [^z]\n---\nClaim[^1].\n\n[^1]: A\n"
        );
    }

    #[test]
    fn test_inline_code_markers_untouched() {
        let content = "Syntax: `[^7]` marks a note[^b].\n\n[^b]: Bee\n";
        assert_eq!(
            renumber_footnotes(content),
            "Syntax: `[^7]` marks a note[^1].\n\n[^1]: Bee\n"
        );
        assert_eq!(renumber_footnotes("Only `[^7]` here.\n"), "Only `[^7]` here.\n");
    }

    #[test]
    fn test_footnote_definitions() {
        let content = "Body[^a]\n\n```\n[^x]: code\n```\n[^a]: Alpha\n[^b]:Beta\n";
        assert_eq!(footnote_definitions(content), vec![("a", "Alpha"), ("b", "Beta")]);
    }

    #[test]
    fn test_idempotent() {
        let content = "B[^b] A[^a] B[^b]\n\n[^a]: A\n[^b]: B\n";
        let once = renumber_footnotes(content);
        assert_eq!(renumber_footnotes(&once), once);
    }
}
