//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use folio_domain::{AnnotationOutcome, GroundedWriteResult, ParsedDocument, SourceCacheEntry};
use folio_markup::ProtectedRanges;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Longest span preview shown in the ranges table
const PREVIEW_CHARS: usize = 40;

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// The output format in use.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Format the section listing of a document.
    pub fn format_sections(&self, doc: &ParsedDocument) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let sections: Vec<serde_json::Value> = doc
                    .sections
                    .iter()
                    .map(|s| {
                        serde_json::json!({
                            "id": s.id,
                            "heading": s.heading,
                            "chars": s.content.chars().count(),
                        })
                    })
                    .collect();
                let json = serde_json::json!({
                    "frontmatter": doc.frontmatter.is_some(),
                    "preambleChars": doc.preamble.chars().count(),
                    "sections": sections,
                });
                Ok(serde_json::to_string_pretty(&json)?)
            }
            OutputFormat::Quiet => Ok(doc.section_ids().join("\n")),
            OutputFormat::Table => {
                if doc.sections.is_empty() {
                    return Ok(self.colorize("No sections found.", "yellow"));
                }
                let mut builder = Builder::default();
                builder.push_record(["#", "Id", "Heading", "Chars"]);
                for (idx, section) in doc.sections.iter().enumerate() {
                    builder.push_record([
                        (idx + 1).to_string(),
                        section.id.clone(),
                        section.heading.trim_start_matches('#').trim().to_string(),
                        section.content.chars().count().to_string(),
                    ]);
                }
                Ok(self.render(builder))
            }
        }
    }

    /// Format protected ranges of `text`.
    pub fn format_ranges(&self, text: &str, ranges: &ProtectedRanges) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let json: Vec<serde_json::Value> = ranges
                    .iter()
                    .map(|r| {
                        serde_json::json!({
                            "start": r.start,
                            "end": r.end,
                            "kind": r.kind.as_str(),
                        })
                    })
                    .collect();
                Ok(serde_json::to_string_pretty(&json)?)
            }
            OutputFormat::Quiet => Ok(ranges
                .iter()
                .map(|r| format!("{}..{}", r.start, r.end))
                .collect::<Vec<_>>()
                .join("\n")),
            OutputFormat::Table => {
                if ranges.is_empty() {
                    return Ok(self.colorize("No protected ranges.", "yellow"));
                }
                let mut builder = Builder::default();
                builder.push_record(["Start", "End", "Kind", "Text"]);
                for range in ranges.iter() {
                    let span = text.get(range.start..range.end).unwrap_or_default();
                    builder.push_record([
                        range.start.to_string(),
                        range.end.to_string(),
                        range.kind.as_str().to_string(),
                        preview(span),
                    ]);
                }
                Ok(self.render(builder))
            }
        }
    }

    /// Format sources in ranked order with their scores.
    pub fn format_ranked_sources(&self, ranked: &[(usize, SourceCacheEntry)]) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let json: Vec<serde_json::Value> = ranked
                    .iter()
                    .map(|(score, source)| {
                        serde_json::json!({
                            "id": source.id,
                            "title": source.title,
                            "url": source.url,
                            "score": score,
                        })
                    })
                    .collect();
                Ok(serde_json::to_string_pretty(&json)?)
            }
            OutputFormat::Quiet => Ok(ranked
                .iter()
                .map(|(_, source)| source.id.as_str())
                .collect::<Vec<_>>()
                .join("\n")),
            OutputFormat::Table => {
                if ranked.is_empty() {
                    return Ok(self.colorize("No sources.", "yellow"));
                }
                let mut builder = Builder::default();
                builder.push_record(["Rank", "Score", "Id", "Title"]);
                for (idx, (score, source)) in ranked.iter().enumerate() {
                    builder.push_record([
                        (idx + 1).to_string(),
                        score.to_string(),
                        source.id.clone(),
                        source.title.clone(),
                    ]);
                }
                Ok(self.render(builder))
            }
        }
    }

    /// Summary line for an annotation pass.
    pub fn annotation_summary(&self, outcome: &AnnotationOutcome, proposed: usize) -> String {
        if outcome.applied == 0 {
            self.info(&format!("Applied 0 of {} proposal(s)", proposed))
        } else {
            self.success(&format!("Applied {} of {} proposal(s)", outcome.applied, proposed))
        }
    }

    /// Summary line for a grounded rewrite.
    pub fn rewrite_summary(&self, result: &GroundedWriteResult) -> String {
        let message = format!(
            "Rewrote section '{}': {} sourced claim(s), {} unsourceable",
            result.section_id,
            result.claim_map.len(),
            result.unsourceable_claims.len()
        );
        if result.unsourceable_claims.is_empty() {
            self.success(&message)
        } else {
            self.warning(&message)
        }
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    fn render(&self, builder: Builder) -> String {
        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));
        table.to_string()
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}

/// One-line preview of a span, newlines shown as `⏎`
fn preview(span: &str) -> String {
    let flat: String = span.chars().map(|c| if c == '\n' { '⏎' } else { c }).collect();
    if flat.chars().count() <= PREVIEW_CHARS {
        flat
    } else {
        let cut: String = flat.chars().take(PREVIEW_CHARS - 1).collect();
        format!("{cut}…")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_markup::{detect_protected_ranges, split_document};

    const DOC: &str = "Intro `code`\n\n## History\n\nFounded.\n\n## Funding\n\nSee [news](https://x.example).\n";

    #[test]
    fn test_sections_table() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_sections(&split_document(DOC)).unwrap();
        assert!(output.contains("Heading"));
        assert!(output.contains("history"));
        assert!(output.contains("Funding"));
    }

    #[test]
    fn test_sections_json() {
        let formatter = Formatter::new(OutputFormat::Json, false);
        let output = formatter.format_sections(&split_document(DOC)).unwrap();
        let json: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(json["sections"][1]["id"], "funding");
        assert_eq!(json["frontmatter"], false);
    }

    #[test]
    fn test_sections_quiet() {
        let formatter = Formatter::new(OutputFormat::Quiet, false);
        let output = formatter.format_sections(&split_document(DOC)).unwrap();
        assert_eq!(output, "history\nfunding");
    }

    #[test]
    fn test_empty_sections() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_sections(&split_document("just text")).unwrap();
        assert!(output.contains("No sections found"));
    }

    #[test]
    fn test_ranges_formats() {
        let ranges = detect_protected_ranges(DOC);
        let quiet = Formatter::new(OutputFormat::Quiet, false).format_ranges(DOC, &ranges).unwrap();
        assert_eq!(quiet.lines().count(), 2);
        let table = Formatter::new(OutputFormat::Table, false).format_ranges(DOC, &ranges).unwrap();
        assert!(table.contains("inline-code"));
        assert!(table.contains("inline-link"));
        let json = Formatter::new(OutputFormat::Json, false).format_ranges(DOC, &ranges).unwrap();
        assert!(json.contains("\"kind\": \"inline-code\""));
    }

    #[test]
    fn test_ranked_sources() {
        let ranked = vec![
            (2, SourceCacheEntry::new("a", "https://a.example", "Alpha", "")),
            (0, SourceCacheEntry::new("b", "https://b.example", "Beta", "")),
        ];
        let quiet = Formatter::new(OutputFormat::Quiet, false).format_ranked_sources(&ranked).unwrap();
        assert_eq!(quiet, "a\nb");
        let table = Formatter::new(OutputFormat::Table, false).format_ranked_sources(&ranked).unwrap();
        assert!(table.contains("Alpha"));
        assert!(table.contains("Score"));
    }

    #[test]
    fn test_colorize_disabled() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        assert_eq!(formatter.success("test"), "✓ test");
        assert_eq!(formatter.warning("careful"), "⚠ careful");
    }

    #[test]
    fn test_preview() {
        assert_eq!(preview("a\nb"), "a⏎b");
        let long = "x".repeat(100);
        assert_eq!(preview(&long).chars().count(), PREVIEW_CHARS);
        assert!(preview(&long).ends_with('…'));
    }
}
