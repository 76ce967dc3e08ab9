//! End-to-end tests over a realistic article

use folio_domain::FactReplacement;
use folio_markup::{
    apply_fact_references, detect_protected_ranges, reassemble, renumber_footnotes, repair,
    split_document, ProtectedKind,
};

const ARTICLE: &str = r#"---
title: Anthropic
revenue: $5 billion
---
Anthropic is an AI safety company.[^SRC-2]

## Funding (2023–2025)

Anthropic raised \$30 billion in its latest round.[^SRC-1] Annual revenue
reached $5 billion, according to [a revenue report](https://example.com/revenue_(2025)).

```python
revenue = "$5 billion"
```

Analysts cite `$5 billion` as the key figure; see also [the filing][filing].

[filing]: https://example.com/filing-$5-billion

## Leadership

The company is led by <EntityLink id="dario-amodei">Dario Amodei</EntityLink>.[^SRC-2]

[^SRC-1]: Funding announcement
[^SRC-2]: Company website
"#;

#[test]
fn test_article_sections() {
    let parsed = split_document(ARTICLE);
    assert!(parsed.frontmatter.as_deref().unwrap().contains("revenue: $5 billion"));
    assert_eq!(parsed.section_ids(), vec!["funding-2023-2025", "leadership"]);
    assert!(parsed.preamble.contains("AI safety company"));
    assert!(parsed.sections[0].content.contains("revenue = \"$5 billion\""));
}

#[test]
fn test_article_protected_kinds() {
    let ranges = detect_protected_ranges(ARTICLE);
    let kinds: Vec<ProtectedKind> = ranges.iter().map(|r| r.kind).collect();
    assert_eq!(
        kinds,
        vec![
            ProtectedKind::Frontmatter,
            ProtectedKind::InlineLink,
            ProtectedKind::FencedCode,
            ProtectedKind::InlineCode,
            ProtectedKind::ReferenceLink,
            ProtectedKind::ReferenceDefinition,
            ProtectedKind::AnnotationTag,
        ]
    );
}

#[test]
fn test_article_annotation_targets_only_prose() {
    let proposals = vec![
        FactReplacement::new("$5 billion", "anthropic", "rev-2025"),
        FactReplacement::new(r"\$30 billion", "anthropic", "5b0663a0"),
        FactReplacement::new("Dario Amodei", "dario-amodei", "ceo"),
    ];
    let outcome = apply_fact_references(ARTICLE, &proposals);

    // The revenue figure lands on the prose occurrence, after the protected
    // frontmatter occurrence; the name is already inside an entity link.
    assert_eq!(outcome.applied, 2);
    assert!(outcome
        .content
        .contains(r#"reached <F e="anthropic" f="rev-2025">$5 billion</F>, according"#));
    assert!(outcome
        .content
        .contains(r#"raised <F e="anthropic" f="5b0663a0">\$30 billion</F> in"#));
    assert!(outcome.content.contains("revenue: $5 billion\n"));
    assert!(outcome.content.contains("revenue = \"$5 billion\""));
    assert!(outcome.content.contains("`$5 billion`"));
    assert!(outcome.content.contains("https://example.com/filing-$5-billion"));

    // Document order: \$30 billion appears before the prose $5 billion.
    assert_eq!(outcome.applied_replacements[0].fact_id, "5b0663a0");
    assert_eq!(outcome.applied_replacements[1].fact_id, "rev-2025");

    let again = apply_fact_references(&outcome.content, &proposals);
    assert_eq!(again.applied, 0);
    assert_eq!(again.content, outcome.content);
}

#[test]
fn test_article_footnotes_follow_body_order() {
    let renumbered = renumber_footnotes(ARTICLE);
    assert!(renumbered.contains("AI safety company.[^1]"));
    assert!(renumbered.contains("latest round.[^2]"));
    assert!(renumbered.contains("Dario Amodei</EntityLink>.[^1]"));
    assert!(renumbered.ends_with("[^1]: Company website\n[^2]: Funding announcement\n"));
    assert_eq!(renumbered.matches("[^1]:").count(), 1);
}

#[test]
fn test_full_markup_pipeline_reaches_fixed_point() {
    let proposals = vec![FactReplacement::new("$5 billion", "anthropic", "rev-2025")];
    let run = |doc: &str| {
        let reassembled = reassemble(&split_document(doc));
        let renumbered = renumber_footnotes(&reassembled);
        let annotated = apply_fact_references(&renumbered, &proposals).content;
        repair(&annotated)
    };
    let once = run(ARTICLE);
    let twice = run(&once);
    assert_eq!(once, twice);
}
