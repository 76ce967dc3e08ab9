//! Property tests for the markup transforms

use folio_domain::FactReplacement;
use folio_markup::{
    apply_fact_references, detect_protected_ranges, reassemble, renumber_footnotes, repair,
    split_document,
};
use proptest::prelude::*;

fn non_whitespace(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Lines that exercise headings, fences, tags, links, code and footnotes
fn article_line() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("## Funding".to_string()),
        Just("## History (2019–2021)".to_string()),
        Just("### Details".to_string()),
        Just("```".to_string()),
        Just("~~~".to_string()),
        Just("---".to_string()),
        Just(String::new()),
        Just("Anthropic raised \\$30 billion in 2025.".to_string()),
        Just("Revenue reached $5 billion[^1] by 2025[^SRC-2].".to_string()),
        Just("See [the filing](https://example.com/a_(b)) for revenue.".to_string()),
        Just("Use `revenue` as the key.".to_string()),
        Just("<F e=\"acme\" f=\"x1\">$5 billion</F> of revenue".to_string()),
        Just("[^1]: Source one".to_string()),
        Just("[^SRC-2]: Source two".to_string()),
        Just("[ref]: https://example.com/revenue".to_string()),
        "[a-z $]{0,30}",
    ]
}

fn article() -> impl Strategy<Value = String> {
    prop::collection::vec(article_line(), 0..24).prop_map(|lines| lines.join("\n"))
}

fn proposals() -> impl Strategy<Value = Vec<FactReplacement>> {
    let search = prop_oneof![
        Just("revenue"),
        Just("$5 billion"),
        Just("\\$30 billion"),
        Just("2025"),
        Just("Funding"),
    ];
    prop::collection::vec((search, "[a-z]{1,6}"), 0..6).prop_map(|pairs| {
        pairs
            .into_iter()
            .map(|(s, fact)| FactReplacement::new(s, "acme", fact))
            .collect()
    })
}

proptest! {
    /// Property: reassembling a split document keeps every non-whitespace character in order
    #[test]
    fn test_split_reassemble_preserves_text(doc in article()) {
        let rebuilt = reassemble(&split_document(&doc));
        prop_assert_eq!(non_whitespace(&rebuilt), non_whitespace(&doc));
    }

    /// Property: the same holds for arbitrary text
    #[test]
    fn test_split_reassemble_arbitrary(doc in "\\PC{0,300}") {
        let rebuilt = reassemble(&split_document(&doc));
        prop_assert_eq!(non_whitespace(&rebuilt), non_whitespace(&doc));
    }

    /// Property: protected ranges are sorted, non-overlapping and in bounds
    #[test]
    fn test_protected_ranges_well_formed(doc in article()) {
        let ranges = detect_protected_ranges(&doc);
        let mut previous_end = 0;
        for range in ranges.iter() {
            prop_assert!(range.start < range.end);
            prop_assert!(range.start >= previous_end);
            prop_assert!(range.end <= doc.len());
            previous_end = range.end;
        }
    }

    /// Property: detection never panics on arbitrary input
    #[test]
    fn test_protected_ranges_total(doc in "\\PC{0,300}") {
        let ranges = detect_protected_ranges(&doc);
        for range in ranges.iter() {
            prop_assert!(range.end <= doc.len());
        }
    }

    /// Property: a second application of the same proposals changes nothing
    #[test]
    fn test_annotation_idempotent(doc in article(), proposals in proposals()) {
        let first = apply_fact_references(&doc, &proposals);
        let second = apply_fact_references(&first.content, &proposals);
        prop_assert_eq!(second.applied, 0);
        prop_assert_eq!(second.content, first.content);
    }

    /// Property: annotation only adds markup, never drops text
    #[test]
    fn test_annotation_keeps_original_text(doc in article(), proposals in proposals()) {
        let outcome = apply_fact_references(&doc, &proposals);
        prop_assert!(outcome.content.len() >= doc.len());
        prop_assert_eq!(outcome.applied, outcome.applied_replacements.len());
    }

    /// Property: annotated output never contains an identically nested tag
    #[test]
    fn test_annotation_output_survives_repair(doc in article(), proposals in proposals()) {
        let outcome = apply_fact_references(&doc, &proposals);
        let repaired = repair(&outcome.content);
        prop_assert_eq!(repair(&repaired), repaired);
    }

    /// Property: renumbering twice equals renumbering once
    #[test]
    fn test_renumber_idempotent(doc in article()) {
        let once = renumber_footnotes(&doc);
        prop_assert_eq!(renumber_footnotes(&once), once);
    }
}
