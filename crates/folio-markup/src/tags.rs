//! Annotation tag families and tag extent scanning

use crate::protected::{ProtectedKind, ProtectedRanges};
use regex::Regex;
use std::collections::{BTreeMap, HashSet};
use std::sync::LazyLock;

static ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([A-Za-z_][\w-]*)\s*=\s*"([^"]*)""#).expect("valid regex")
});

/// A whole paired fact reference tag: attributes, then body
static FACT_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)\A<F(\s[^<>]*)?>(.*)</F\s*>\z").expect("valid regex")
});

/// A family of embedded annotation tags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagFamily {
    /// `<F e="entity" f="fact">text</F>`
    FactReference,
    /// `<Calc expr="...">value</Calc>`
    Calculation,
    /// `<EntityLink id="...">name</EntityLink>`
    EntityLink,
}

impl TagFamily {
    /// The element name used in markup
    pub fn tag_name(self) -> &'static str {
        match self {
            TagFamily::FactReference => "F",
            TagFamily::Calculation => "Calc",
            TagFamily::EntityLink => "EntityLink",
        }
    }

    /// Look up a family by element name (case-sensitive)
    pub fn from_tag_name(name: &str) -> Option<Self> {
        TAG_FAMILIES.iter().copied().find(|f| f.tag_name() == name)
    }
}

/// All recognised tag families
pub const TAG_FAMILIES: [TagFamily; 3] = [
    TagFamily::FactReference,
    TagFamily::Calculation,
    TagFamily::EntityLink,
];

/// If an annotation tag opens at `pos`, its family and the offset just past
/// its opening `<Name`
fn tag_open_at(text: &str, pos: usize) -> Option<(TagFamily, usize)> {
    let bytes = text.as_bytes();
    if bytes.get(pos) != Some(&b'<') {
        return None;
    }
    let name_start = pos + 1;
    let name_len = bytes[name_start..]
        .iter()
        .take_while(|b| b.is_ascii_alphabetic())
        .count();
    let name_end = name_start + name_len;
    let family = TagFamily::from_tag_name(&text[name_start..name_end])?;
    match bytes.get(name_end) {
        Some(b) if b.is_ascii_whitespace() || *b == b'/' || *b == b'>' => Some((family, name_end)),
        _ => None,
    }
}

/// Offset just past the `>` closing an opening tag, plus whether it self-closes
///
/// Quoted attribute values may contain `>`.
fn opening_tag_end(text: &str, from: usize) -> Option<(usize, bool)> {
    let bytes = text.as_bytes();
    let mut quote: Option<u8> = None;
    let mut i = from;
    while i < bytes.len() {
        let b = bytes[i];
        match quote {
            Some(q) if b == q => quote = None,
            Some(_) => {}
            None if b == b'"' || b == b'\'' => quote = Some(b),
            None if b == b'>' => {
                let self_closing = i > from && bytes[i - 1] == b'/';
                return Some((i + 1, self_closing));
            }
            None => {}
        }
        i += 1;
    }
    None
}

/// If `</Name>` (whitespace allowed before `>`) starts at `pos`, the offset past it
fn closing_tag_at(text: &str, pos: usize, name: &str) -> Option<usize> {
    let rest = text.get(pos..)?;
    let after_name = rest.strip_prefix("</")?.strip_prefix(name)?;
    let trimmed = after_name.trim_start();
    trimmed
        .strip_prefix('>')
        .map(|tail| text.len() - tail.len())
}

/// The byte range covered by an annotation tag starting at `pos`
///
/// Returns `None` when no recognised tag opens at `pos`. An opening tag that
/// never finishes, or a paired tag that is never closed, extends to the end of
/// `text`. Paired tags of the same name nest.
pub(crate) fn tag_extent(text: &str, pos: usize) -> Option<(TagFamily, usize)> {
    let (family, name_end) = tag_open_at(text, pos)?;
    let Some((open_end, self_closing)) = opening_tag_end(text, name_end) else {
        return Some((family, text.len()));
    };
    if self_closing {
        return Some((family, open_end));
    }

    let name = family.tag_name();
    let bytes = text.as_bytes();
    let mut depth = 1usize;
    let mut i = open_end;
    while i < bytes.len() {
        if bytes[i] != b'<' {
            i += 1;
            continue;
        }
        if let Some(end) = closing_tag_at(text, i, name) {
            depth -= 1;
            if depth == 0 {
                return Some((family, end));
            }
            i = end;
            continue;
        }
        if let Some((inner, inner_name_end)) = tag_open_at(text, i) {
            if inner == family {
                match opening_tag_end(text, inner_name_end) {
                    Some((end, true)) => i = end,
                    Some((end, false)) => {
                        depth += 1;
                        i = end;
                    }
                    None => return Some((family, text.len())),
                }
                continue;
            }
        }
        i += 1;
    }
    Some((family, text.len()))
}

/// Attributes of a raw attribute string (`e="a" f="b"`) keyed by name
pub(crate) fn attributes(raw: &str) -> BTreeMap<&str, &str> {
    ATTRIBUTE
        .captures_iter(raw)
        .filter_map(|c| Some((c.get(1)?.as_str(), c.get(2)?.as_str())))
        .collect()
}

/// An existing fact reference: escaped entity, escaped fact, raw body
pub(crate) type FactTag = (String, String, String);

/// Every fact reference tag of `text` that stands on its own
///
/// Only annotation-tag ranges are read, so tag-like text inside code,
/// frontmatter or links is ignored. Attribute values are kept in their
/// escaped form.
pub(crate) fn fact_tags(text: &str, ranges: &ProtectedRanges) -> HashSet<FactTag> {
    ranges
        .iter()
        .filter(|range| range.kind == ProtectedKind::AnnotationTag)
        .filter_map(|range| {
            let caps = FACT_TAG.captures(text.get(range.start..range.end)?)?;
            let attrs = attributes(caps.get(1).map_or("", |m| m.as_str()));
            let entity = attrs.get("e")?;
            let fact = attrs.get("f")?;
            let body = caps.get(2)?.as_str();
            Some((entity.to_string(), fact.to_string(), body.to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protected::detect_protected_ranges;

    #[test]
    fn test_family_names_round_trip() {
        for family in TAG_FAMILIES {
            assert_eq!(TagFamily::from_tag_name(family.tag_name()), Some(family));
        }
        assert_eq!(TagFamily::from_tag_name("f"), None);
        assert_eq!(TagFamily::from_tag_name("div"), None);
    }

    #[test]
    fn test_paired_tag_extent() {
        let text = r#"x <F e="a" f="b">$1</F> y"#;
        let (family, end) = tag_extent(text, 2).unwrap();
        assert_eq!(family, TagFamily::FactReference);
        assert_eq!(&text[2..end], r#"<F e="a" f="b">$1</F>"#);
    }

    #[test]
    fn test_self_closing_tag_extent() {
        let text = r#"<EntityLink id="anthropic" /> rest"#;
        let (family, end) = tag_extent(text, 0).unwrap();
        assert_eq!(family, TagFamily::EntityLink);
        assert_eq!(&text[..end], r#"<EntityLink id="anthropic" />"#);
    }

    #[test]
    fn test_quoted_gt_in_attribute() {
        let text = r#"<Calc expr="a > b">3</Calc>!"#;
        let (_, end) = tag_extent(text, 0).unwrap();
        assert_eq!(&text[end..], "!");
    }

    #[test]
    fn test_nested_same_name_tags() {
        let text = r#"<F e="a" f="b"><F e="a" f="b">x</F></F> tail"#;
        let (_, end) = tag_extent(text, 0).unwrap();
        assert_eq!(&text[end..], " tail");
    }

    #[test]
    fn test_unclosed_tag_extends_to_end() {
        let text = r#"<F e="a" f="b">never closed"#;
        assert_eq!(tag_extent(text, 0).unwrap().1, text.len());
        let text = r#"<F e="a"#;
        assert_eq!(tag_extent(text, 0).unwrap().1, text.len());
    }

    #[test]
    fn test_attributes() {
        let attrs = attributes(r#" e="acme"  f = "x1" data-kind="n""#);
        assert_eq!(attrs.get("e"), Some(&"acme"));
        assert_eq!(attrs.get("f"), Some(&"x1"));
        assert_eq!(attrs.get("data-kind"), Some(&"n"));
    }

    #[test]
    fn test_fact_tags() {
        let text = r#"<F e="a" f="1">x</F> <F f="2" e="b">y</F> <Calc e="c" f="3">y</Calc> <F>z</F> <F e="d" f="4" />"#;
        let tags = fact_tags(text, &detect_protected_ranges(text));
        assert_eq!(tags.len(), 2);
        assert!(tags.contains(&("a".to_string(), "1".to_string(), "x".to_string())));
        assert!(tags.contains(&("b".to_string(), "2".to_string(), "y".to_string())));
    }

    #[test]
    fn test_fact_tags_ignore_code_and_frontmatter() {
        let text = "---\nnote: <F e=\"a\" f=\"1\">x</F>\n---\n```md\n<F e=\"a\" f=\"2\">x</F>\n```\nUse `<F e=\"a\" f=\"3\">x</F>`.\n";
        assert!(fact_tags(text, &detect_protected_ranges(text)).is_empty());
    }

    #[test]
    fn test_not_a_tag() {
        assert!(tag_extent("<Foo>x</Foo>", 0).is_none());
        assert!(tag_extent("<div>", 0).is_none());
        assert!(tag_extent("a < b", 2).is_none());
        assert!(tag_extent("<Fx>", 0).is_none());
    }
}
