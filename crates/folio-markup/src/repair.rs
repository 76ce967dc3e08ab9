//! Repairs for artifacts left by upstream tools
//!
//! Each repair is idempotent and the two compose in either order.

use crate::protected::{detect_protected_ranges, ProtectedKind, ProtectedRanges};
use crate::tags::attributes;
use regex::{Captures, Regex};
use std::sync::LazyLock;

/// An annotation tag directly wrapping another one with a plain-text body
static NESTED_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"<(F|Calc|EntityLink)((?:\s[^<>]*)?)>\s*<(F|Calc|EntityLink)((?:\s[^<>]*)?)>([^<]*)</(F|Calc|EntityLink)\s*>\s*</(F|Calc|EntityLink)\s*>",
    )
    .expect("valid regex")
});

/// A run of backslashes right before an annotation tag opener
static ESCAPED_OPENER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\\+)(<(?:F|Calc|EntityLink)[\s/>])").expect("valid regex")
});

/// Upper bound on collapse passes; each pass removes one nesting level
const MAX_COLLAPSE_PASSES: usize = 32;

/// Whether `pos` lies in code or frontmatter, where text is literal
fn in_literal_text(ranges: &ProtectedRanges, pos: usize) -> bool {
    ranges.covering(pos).is_some_and(|range| {
        matches!(
            range.kind,
            ProtectedKind::Frontmatter | ProtectedKind::FencedCode | ProtectedKind::InlineCode
        )
    })
}

fn collapse_once(content: &str) -> String {
    let ranges = detect_protected_ranges(content);
    NESTED_TAG
        .replace_all(content, |caps: &Captures| {
            let whole = &caps[0];
            if in_literal_text(&ranges, caps.get(0).map_or(0, |m| m.start())) {
                return whole.to_string();
            }
            let names = [&caps[1], &caps[3], &caps[6], &caps[7]];
            if names.iter().any(|n| *n != names[0]) {
                return whole.to_string();
            }
            let (outer, inner) = (&caps[2], &caps[4]);
            if outer.trim_end().ends_with('/') || inner.trim_end().ends_with('/') {
                return whole.to_string();
            }
            if attributes(outer) != attributes(inner) {
                return whole.to_string();
            }
            format!("<{name}{outer}>{body}</{name}>", name = names[0], body = &caps[5])
        })
        .into_owned()
}

/// Collapse a tag that directly wraps an identical-attribute tag of the same
/// family into the outer tag alone
///
/// Attribute order and spacing do not matter for the comparison. Tags whose
/// attributes differ are left as they are.
/// Examples inside code or frontmatter are never rewritten.
pub fn collapse_nested_tags(content: &str) -> String {
    let mut current = content.to_string();
    for _ in 0..MAX_COLLAPSE_PASSES {
        let next = collapse_once(&current);
        if next == current {
            break;
        }
        current = next;
    }
    current
}

/// Remove the stray backslash escaping an annotation tag opener
///
/// Upstream escaping sometimes turns `<F ...>` into `\<F ...>`. Only an odd
/// run of backslashes escapes the opener, and exactly one backslash is
/// removed from it; an even run is a sequence of literal backslashes and is
/// kept. Backslashes inside code, inside existing tags, or anywhere else in a
/// tag body are left alone.
pub fn strip_stray_escapes(content: &str) -> String {
    let ranges = detect_protected_ranges(content);
    ESCAPED_OPENER
        .replace_all(content, |caps: &Captures| {
            let whole = caps.get(0).map_or(0..0, |m| m.range());
            let run = &caps[1];
            if ranges.is_protected(whole.start) || run.len() % 2 == 0 {
                caps[0].to_string()
            } else {
                format!("{}{}", &run[1..], &caps[2])
            }
        })
        .into_owned()
}

/// Run every repair
pub fn repair(content: &str) -> String {
    collapse_nested_tags(&strip_stray_escapes(content))
}
