//! Protected-range detection
//!
//! A protected range is a span of text that pattern-based rewriting must not
//! touch: frontmatter, code, existing annotation tags and every link form.
//! Ranges are offsets into the text they were computed from. Any edit
//! invalidates them, so callers recompute after every mutation.

use crate::scan::{fence_marker, frontmatter, line_end, line_spans, Frontmatter};
use crate::tags::tag_extent;
use regex::Regex;
use std::sync::LazyLock;

/// Reference-style link definition: `[label]: destination`
///
/// Footnote definitions (`[^label]: text`) are deliberately excluded.
static REFERENCE_DEFINITION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ ]{0,3}\[[^\]\^\n][^\]\n]*\]:[ \t]*\S[^\n]*").expect("valid regex")
});

/// What kind of construct a range protects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProtectedKind {
    /// Leading `---` metadata block
    Frontmatter,
    /// Fenced code block (backtick or tilde fences)
    FencedCode,
    /// Single-backtick code span
    InlineCode,
    /// Existing annotation tag, children included
    AnnotationTag,
    /// `[text](url)` or `![alt](src)`
    InlineLink,
    /// `[text][ref]`
    ReferenceLink,
    /// `[ref]: url` definition line
    ReferenceDefinition,
}

impl ProtectedKind {
    /// Short kebab-case name
    pub fn as_str(self) -> &'static str {
        match self {
            ProtectedKind::Frontmatter => "frontmatter",
            ProtectedKind::FencedCode => "fenced-code",
            ProtectedKind::InlineCode => "inline-code",
            ProtectedKind::AnnotationTag => "annotation-tag",
            ProtectedKind::InlineLink => "inline-link",
            ProtectedKind::ReferenceLink => "reference-link",
            ProtectedKind::ReferenceDefinition => "reference-definition",
        }
    }
}

/// A half-open `[start, end)` byte range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProtectedRange {
    /// First protected byte
    pub start: usize,
    /// One past the last protected byte
    pub end: usize,
    /// Construct that claimed this range first
    pub kind: ProtectedKind,
}

impl ProtectedRange {
    /// Whether `pos` falls inside this range
    pub fn contains(&self, pos: usize) -> bool {
        self.start <= pos && pos < self.end
    }

    /// Whether `[start, end)` shares at least one byte with this range
    pub fn intersects(&self, start: usize, end: usize) -> bool {
        start < self.end && self.start < end
    }
}

/// Sorted, non-overlapping protected ranges for one version of a text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProtectedRanges {
    ranges: Vec<ProtectedRange>,
}

impl ProtectedRanges {
    /// All ranges in ascending order
    pub fn as_slice(&self) -> &[ProtectedRange] {
        &self.ranges
    }

    /// Iterate ranges in ascending order
    pub fn iter(&self) -> impl Iterator<Item = &ProtectedRange> {
        self.ranges.iter()
    }

    /// Number of ranges
    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    /// Whether nothing is protected
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// The range covering `pos`, if any
    pub fn covering(&self, pos: usize) -> Option<&ProtectedRange> {
        let idx = self.ranges.partition_point(|r| r.start <= pos);
        idx.checked_sub(1)
            .map(|i| &self.ranges[i])
            .filter(|r| r.contains(pos))
    }

    /// Whether `pos` is protected
    pub fn is_protected(&self, pos: usize) -> bool {
        self.covering(pos).is_some()
    }

    /// Whether any byte of `[start, end)` is protected
    pub fn intersects(&self, start: usize, end: usize) -> bool {
        let idx = self.ranges.partition_point(|r| r.end <= start);
        self.ranges
            .get(idx)
            .is_some_and(|r| r.intersects(start, end))
    }

    /// Claim `[start, end)`, merging with anything it overlaps
    ///
    /// The merged range keeps the kind of whichever piece starts first.
    fn claim(&mut self, start: usize, end: usize, kind: ProtectedKind) {
        if start >= end {
            return;
        }
        let first = self.ranges.partition_point(|r| r.end <= start);
        let last = self.ranges.partition_point(|r| r.start < end);
        if first >= last {
            self.ranges.insert(first, ProtectedRange { start, end, kind });
            return;
        }
        let merged_start = start.min(self.ranges[first].start);
        let merged_end = end.max(self.ranges[last - 1].end);
        let merged_kind = if self.ranges[first].start <= start {
            self.ranges[first].kind
        } else {
            kind
        };
        self.ranges.splice(
            first..last,
            [ProtectedRange {
                start: merged_start,
                end: merged_end,
                kind: merged_kind,
            }],
        );
    }
}

/// Compute the protected ranges of `text`
///
/// Categories are claimed in priority order (frontmatter, fenced code, inline
/// code, annotation tags, inline links, reference links and definitions). A
/// position already claimed by an earlier category is never used as the start
/// of a later construct. Unterminated frontmatter, fences, tags and link
/// destinations are protected to the end of the text.
pub fn detect_protected_ranges(text: &str) -> ProtectedRanges {
    let mut ranges = ProtectedRanges::default();
    claim_frontmatter(text, &mut ranges);
    claim_fenced_code(text, &mut ranges);
    claim_inline_code(text, &mut ranges);
    claim_annotation_tags(text, &mut ranges);
    claim_links(text, &mut ranges);
    claim_reference_definitions(text, &mut ranges);
    ranges
}

fn claim_frontmatter(text: &str, ranges: &mut ProtectedRanges) {
    match frontmatter(text) {
        Frontmatter::Closed(end) => ranges.claim(0, end, ProtectedKind::Frontmatter),
        Frontmatter::Unterminated => ranges.claim(0, text.len(), ProtectedKind::Frontmatter),
        Frontmatter::Absent => {}
    }
}

fn claim_fenced_code(text: &str, ranges: &mut ProtectedRanges) {
    let mut open: Option<(char, usize)> = None;
    for line in line_spans(text) {
        match open {
            Some((style, start)) => {
                if fence_marker(line.text) == Some(style) {
                    ranges.claim(start, line.end, ProtectedKind::FencedCode);
                    open = None;
                }
            }
            None => {
                if ranges.is_protected(line.start) {
                    continue;
                }
                if let Some(style) = fence_marker(line.text) {
                    open = Some((style, line.start));
                }
            }
        }
    }
    if let Some((_, start)) = open {
        ranges.claim(start, text.len(), ProtectedKind::FencedCode);
    }
}

/// Walk `text` byte by byte, jumping over already-claimed ranges, and let
/// `visit` claim constructs starting at unclaimed positions. `visit` returns
/// the offset to resume from, or `None` to advance one byte.
fn scan_unclaimed<F>(text: &str, ranges: &mut ProtectedRanges, trigger: u8, mut visit: F)
where
    F: FnMut(&str, usize, &mut ProtectedRanges) -> Option<usize>,
{
    let bytes = text.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if let Some(range) = ranges.covering(i) {
            i = range.end;
            continue;
        }
        if bytes[i] == trigger {
            if let Some(next) = visit(text, i, ranges) {
                i = next.max(i + 1);
                continue;
            }
        }
        i += 1;
    }
}

fn claim_inline_code(text: &str, ranges: &mut ProtectedRanges) {
    scan_unclaimed(text, ranges, b'`', |text, pos, ranges| {
        let end_of_line = line_end(text, pos);
        // A lone backtick is literal text, not an unterminated span.
        let close = text[pos + 1..end_of_line].find('`')? + pos + 1;
        ranges.claim(pos, close + 1, ProtectedKind::InlineCode);
        Some(close + 1)
    });
}

fn claim_annotation_tags(text: &str, ranges: &mut ProtectedRanges) {
    scan_unclaimed(text, ranges, b'<', |text, pos, ranges| {
        let (_, end) = tag_extent(text, pos)?;
        ranges.claim(pos, end, ProtectedKind::AnnotationTag);
        Some(end)
    });
}

fn claim_links(text: &str, ranges: &mut ProtectedRanges) {
    scan_unclaimed(text, ranges, b'[', |text, pos, ranges| {
        let bytes = text.as_bytes();
        // Footnote references are not links.
        if bytes.get(pos + 1) == Some(&b'^') {
            return None;
        }
        let close = matching_bracket(text, pos, ranges)?;
        let start = if pos > 0 && bytes[pos - 1] == b'!' { pos - 1 } else { pos };
        match bytes.get(close + 1) {
            Some(b'(') => {
                let end = balanced_paren_end(text, close + 1).unwrap_or(text.len());
                ranges.claim(start, end, ProtectedKind::InlineLink);
                Some(end)
            }
            Some(b'[') => {
                let label_end = line_end(text, close + 1);
                let ref_close = text[close + 2..label_end].find(']')? + close + 2;
                ranges.claim(start, ref_close + 1, ProtectedKind::ReferenceLink);
                Some(ref_close + 1)
            }
            _ => None,
        }
    });
}

/// Offset of the `]` matching the `[` at `open`, skipping claimed ranges and
/// refusing to cross a blank line
fn matching_bracket(text: &str, open: usize, ranges: &ProtectedRanges) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut depth = 0usize;
    let mut i = open;
    while i < bytes.len() {
        if i > open {
            if let Some(range) = ranges.covering(i) {
                i = range.end;
                continue;
            }
        }
        match bytes[i] {
            b'[' => depth += 1,
            b']' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            b'\n' if bytes.get(i + 1) == Some(&b'\n') => return None,
            _ => {}
        }
        i += 1;
    }
    None
}

/// Offset just past the `)` balancing the `(` at `open`
fn balanced_paren_end(text: &str, open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (i, b) in text.as_bytes().iter().enumerate().skip(open) {
        match b {
            b'(' => depth += 1,
            b')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i + 1);
                }
            }
            _ => {}
        }
    }
    None
}

fn claim_reference_definitions(text: &str, ranges: &mut ProtectedRanges) {
    for m in REFERENCE_DEFINITION.find_iter(text) {
        if !ranges.is_protected(m.start()) {
            ranges.claim(m.start(), m.end(), ProtectedKind::ReferenceDefinition);
        }
    }
}
