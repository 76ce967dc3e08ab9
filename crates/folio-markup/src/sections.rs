//! Section splitting and reassembly

use crate::scan::{fence_marker, frontmatter, Frontmatter};
use folio_domain::{ParsedDocument, Section};
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;
use tracing::debug;

static EXCESS_NEWLINES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("valid regex"));

/// Slug for a heading
///
/// Leading `#` markers are stripped, the text is lowercased, and every run of
/// non-alphanumeric characters becomes a single dash. Leading and trailing
/// dashes are trimmed.
///
/// ```
/// use folio_markup::heading_to_id;
///
/// assert_eq!(heading_to_id("## Funding (2023–2025)"), "funding-2023-2025");
/// ```
pub fn heading_to_id(heading: &str) -> String {
    let text = heading.trim_start().trim_start_matches('#');
    let mut id = String::with_capacity(text.len());
    let mut pending_dash = false;
    for c in text.chars().flat_map(char::to_lowercase) {
        if c.is_alphanumeric() {
            if pending_dash && !id.is_empty() {
                id.push('-');
            }
            pending_dash = false;
            id.push(c);
        } else {
            pending_dash = true;
        }
    }
    id
}

/// Heading text if `line` is a level-2 ATX heading
fn level_two_heading(line: &str) -> Option<&str> {
    let rest = line.strip_prefix("##")?;
    if rest.starts_with('#') {
        return None;
    }
    let text = rest.strip_prefix([' ', '\t'])?;
    (!text.trim().is_empty()).then_some(text)
}

/// Assigns ids, suffixing repeats with `-2`, `-3`, ...
#[derive(Default)]
struct IdAllocator {
    seen: HashMap<String, usize>,
}

impl IdAllocator {
    fn allocate(&mut self, heading: &str) -> String {
        let mut base = heading_to_id(heading);
        if base.is_empty() {
            base = "section".to_string();
        }
        let count = self.seen.entry(base.clone()).or_insert(0);
        *count += 1;
        if *count == 1 {
            base
        } else {
            format!("{base}-{count}")
        }
    }
}

/// Split a document into frontmatter, preamble and level-2 sections
///
/// Lines are scanned while tracking fenced code: a heading inside an open
/// fence is ordinary content. Preamble and section contents keep their
/// original line terminators, so concatenating the preamble with each
/// section's heading line and content reproduces the body exactly.
pub fn split_document(doc: &str) -> ParsedDocument {
    let (frontmatter, body) = match frontmatter(doc) {
        Frontmatter::Closed(end) => (Some(doc[..end].to_string()), &doc[end..]),
        Frontmatter::Absent | Frontmatter::Unterminated => (None, doc),
    };

    let mut parsed = ParsedDocument {
        frontmatter,
        preamble: String::new(),
        sections: Vec::new(),
    };
    let mut ids = IdAllocator::default();
    let mut open_fence: Option<char> = None;

    for raw in body.split_inclusive('\n') {
        let line = raw.trim_end_matches(['\n', '\r']);
        let marker = fence_marker(line);

        let heading = match open_fence {
            Some(style) => {
                if marker == Some(style) {
                    open_fence = None;
                }
                None
            }
            None => {
                open_fence = marker;
                if marker.is_none() {
                    level_two_heading(line)
                } else {
                    None
                }
            }
        };

        if heading.is_some() {
            parsed.sections.push(Section {
                id: ids.allocate(line),
                heading: line.to_string(),
                content: String::new(),
            });
            continue;
        }

        match parsed.sections.last_mut() {
            Some(section) => section.content.push_str(raw),
            None => parsed.preamble.push_str(raw),
        }
    }

    debug!(sections = parsed.sections.len(), "Document split");
    parsed
}

/// Join a parsed document back into text
///
/// Parts are separated by a single blank line, runs of three or more newlines
/// collapse to two, and the result ends with exactly one newline. An entirely
/// empty document reassembles to the empty string.
pub fn reassemble(doc: &ParsedDocument) -> String {
    let mut parts: Vec<String> = Vec::with_capacity(doc.sections.len() + 2);

    if let Some(frontmatter) = &doc.frontmatter {
        parts.push(frontmatter.trim_end().to_string());
    }
    let preamble = doc.preamble.trim_start_matches(['\n', '\r']).trim_end();
    if !preamble.is_empty() {
        parts.push(preamble.to_string());
    }
    for section in &doc.sections {
        let content = section.content.trim_start_matches(['\n', '\r']).trim_end();
        if content.is_empty() {
            parts.push(section.heading.trim_end().to_string());
        } else {
            parts.push(format!("{}\n\n{}", section.heading.trim_end(), content));
        }
    }

    let parts: Vec<String> = parts.into_iter().filter(|p| !p.trim().is_empty()).collect();
    if parts.is_empty() {
        return String::new();
    }

    let joined = parts.join("\n\n");
    let mut text = EXCESS_NEWLINES.replace_all(&joined, "\n\n").trim_end().to_string();
    text.push('\n');
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_to_id() {
        assert_eq!(heading_to_id("## Funding (2023–2025)"), "funding-2023-2025");
        assert_eq!(heading_to_id("## Overview"), "overview");
        assert_eq!(heading_to_id("### Key People & Roles!"), "key-people-roles");
        assert_eq!(heading_to_id("  ##   --Leading and trailing--  "), "leading-and-trailing");
        assert_eq!(heading_to_id("## Café Société"), "café-société");
        assert_eq!(heading_to_id("## !!!"), "");
    }

    #[test]
    fn test_split_basic() {
        let doc = "Intro text.\n\n## History\n\nFounded in 2021.\n\n## Funding\n\nRaised money.\n";
        let parsed = split_document(doc);
        assert!(parsed.frontmatter.is_none());
        assert_eq!(parsed.preamble, "Intro text.\n\n");
        assert_eq!(parsed.section_ids(), vec!["history", "funding"]);
        assert_eq!(parsed.sections[0].heading, "## History");
        assert_eq!(parsed.sections[0].content, "\nFounded in 2021.\n\n");
        assert_eq!(parsed.sections[1].content, "\nRaised money.\n");
    }

    #[test]
    fn test_split_partitions_body_exactly() {
        let doc = "Pre\n## A\na\n### Sub\nsub\n## B\nb";
        let parsed = split_document(doc);
        let mut rebuilt = parsed.preamble.clone();
        for section in &parsed.sections {
            rebuilt.push_str(&section.heading);
            rebuilt.push('\n');
            rebuilt.push_str(&section.content);
        }
        assert_eq!(rebuilt, doc);
        assert_eq!(parsed.sections.len(), 2);
        assert!(parsed.sections[0].content.contains("### Sub"));
    }

    #[test]
    fn test_split_with_frontmatter() {
        let doc = "---\ntitle: Acme\n---\nIntro\n## Overview\nText\n";
        let parsed = split_document(doc);
        assert_eq!(parsed.frontmatter.as_deref(), Some("---\ntitle: Acme\n---\n"));
        assert_eq!(parsed.preamble, "Intro\n");
        assert_eq!(parsed.sections[0].id, "overview");
    }

    #[test]
    fn test_headings_inside_fence_are_inert() {
        let doc = "## Real\n```markdown\n## Not a section\n```\n~~~\n## Also not\n~~~\n## Next\n";
        let parsed = split_document(doc);
        assert_eq!(parsed.section_ids(), vec!["real", "next"]);
        assert!(parsed.sections[0].content.contains("## Not a section"));
        assert!(parsed.sections[0].content.contains("## Also not"));
    }

    #[test]
    fn test_level_one_and_three_headings_do_not_split() {
        let parsed = split_document("# Title\n### Deep\n##NoSpace\n");
        assert!(parsed.sections.is_empty());
        assert_eq!(parsed.preamble, "# Title\n### Deep\n##NoSpace\n");
    }

    #[test]
    fn test_duplicate_ids_are_suffixed() {
        let parsed = split_document("## Notes\na\n## Notes\nb\n## Notes\nc\n## ???\n");
        assert_eq!(parsed.section_ids(), vec!["notes", "notes-2", "notes-3", "section"]);
    }

    #[test]
    fn test_reassemble_normalizes_spacing() {
        let doc = "---\ntitle: X\n---\n\n\nIntro\n\n\n\n## A\n\n\n\nBody A\n## B\nBody B\n\n\n";
        let text = reassemble(&split_document(doc));
        assert_eq!(text, "---\ntitle: X\n---\n\nIntro\n\n## A\n\nBody A\n\n## B\n\nBody B\n");
    }

    #[test]
    fn test_reassemble_is_stable() {
        let doc = "Intro\n\n## A\n\nBody\n\n## Empty\n";
        let once = reassemble(&split_document(doc));
        let twice = reassemble(&split_document(&once));
        assert_eq!(once, twice);
    }

    #[test]
    fn test_reassemble_empty() {
        assert_eq!(reassemble(&split_document("")), "");
        assert_eq!(reassemble(&split_document("\n\n")), "");
    }
}
