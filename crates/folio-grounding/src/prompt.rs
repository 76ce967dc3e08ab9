//! Prompt construction for grounded section rewriting

use crate::config::DEFAULT_TRUNCATION_MARKER;
use folio_domain::{PageContext, SourceCacheEntry, WriteConstraints};
use std::fmt::Write;

/// Builds the single generation prompt for one section
pub struct PromptBuilder {
    section_id: String,
    section_content: String,
    page_context: PageContext,
    sources: Vec<SourceCacheEntry>,
    directions: Option<String>,
    constraints: WriteConstraints,
    source_char_budget: usize,
    truncation_marker: String,
}

impl PromptBuilder {
    /// Create a new prompt builder
    pub fn new(section_id: String, section_content: String, page_context: PageContext) -> Self {
        Self {
            section_id,
            section_content,
            page_context,
            sources: Vec::new(),
            directions: None,
            constraints: WriteConstraints::default(),
            source_char_budget: usize::MAX,
            truncation_marker: DEFAULT_TRUNCATION_MARKER.to_string(),
        }
    }

    /// Sources in the order they should appear (most relevant first)
    pub fn with_sources(mut self, sources: Vec<SourceCacheEntry>) -> Self {
        self.sources = sources;
        self
    }

    /// Free-form editorial directions
    pub fn with_directions(mut self, directions: Option<String>) -> Self {
        self.directions = directions.filter(|d| !d.trim().is_empty());
        self
    }

    /// Grounding and length constraints
    pub fn with_constraints(mut self, constraints: WriteConstraints) -> Self {
        self.constraints = constraints;
        self
    }

    /// Cut the sources block at `budget` characters and mark the cut
    pub fn with_source_budget(mut self, budget: usize, marker: impl Into<String>) -> Self {
        self.source_char_budget = budget;
        self.truncation_marker = marker.into();
        self
    }

    /// Build the complete prompt
    pub fn build(&self) -> String {
        let mut prompt = String::new();

        prompt.push_str(REWRITE_INSTRUCTIONS);
        prompt.push_str("\n\n");

        let _ = writeln!(prompt, "Page: {}", self.page_context.title);
        if let Some(entity_type) = &self.page_context.entity_type {
            let _ = writeln!(prompt, "Entity type: {entity_type}");
        }
        if let Some(description) = &self.page_context.description {
            let _ = writeln!(prompt, "Description: {description}");
        }
        let _ = writeln!(prompt, "Section id: {}\n", self.section_id);

        prompt.push_str("Current section:\n---\n");
        prompt.push_str(self.section_content.trim_end());
        prompt.push_str("\n---\n\n");

        prompt.push_str("Sources:\n");
        if self.sources.is_empty() {
            prompt.push_str("(no sources available)\n");
        } else {
            prompt.push_str(&pack_sources(
                &self.sources,
                self.source_char_budget,
                &self.truncation_marker,
            ));
            prompt.push('\n');
        }
        prompt.push('\n');

        if let Some(directions) = &self.directions {
            let _ = writeln!(prompt, "Editorial directions:\n{}\n", directions.trim());
        }

        prompt.push_str("Constraints:\n");
        if self.constraints.allow_training_knowledge {
            prompt.push_str(PERMISSIVE_RULE);
        } else {
            prompt.push_str(STRICT_RULE);
        }
        prompt.push('\n');
        if let Some(words) = self.constraints.target_words {
            let _ = writeln!(prompt, "- Aim for about {words} words.");
        }
        prompt.push('\n');

        prompt.push_str(OUTPUT_FORMAT_REMINDER);
        prompt
    }
}

/// Render one source: id and title, URL, author/date, then facts or content
pub fn format_source(source: &SourceCacheEntry) -> String {
    let mut out = format!("[{}] {}\nURL: {}\n", source.id, source.title, source.url);
    match (&source.author, &source.date) {
        (Some(author), Some(date)) => {
            let _ = writeln!(out, "By {author}, {date}");
        }
        (Some(author), None) => {
            let _ = writeln!(out, "By {author}");
        }
        (None, Some(date)) => {
            let _ = writeln!(out, "Published {date}");
        }
        (None, None) => {}
    }
    let body = source.body().trim();
    if !body.is_empty() {
        out.push_str(body);
        out.push('\n');
    }
    out
}

/// Format `sources` in order, cut to `budget` characters
///
/// When the formatted text is longer than the budget it is cut at a
/// character boundary and `marker` is appended on its own line.
pub fn pack_sources(sources: &[SourceCacheEntry], budget: usize, marker: &str) -> String {
    let full = sources.iter().map(format_source).collect::<Vec<_>>().join("\n");
    match full.char_indices().nth(budget) {
        None => full.trim_end().to_string(),
        Some((cut, _)) => format!("{}\n{}", full[..cut].trim_end(), marker),
    }
}

const REWRITE_INSTRUCTIONS: &str = r###"Rewrite one section of a reference article using the sources below.

Rules:
- Keep the section's scope; do not cover material that belongs to other sections
- Every factual statement should be supported by one of the listed sources
- Record each supported statement in claimMap with the id of its source as factId
- Keep existing footnote markers such as [^1] and existing tags such as <F ...>...</F> intact
- Do not invent URLs, quotes, or source ids
- Return the section body only, without its "## " heading line"###;

const STRICT_RULE: &str = "- Use only the listed sources. List any statement you cannot source in unsourceableClaims instead of citing a source for it.";

const PERMISSIVE_RULE: &str = "- Prefer the listed sources. Well-established background knowledge may be used where no source covers a point.";

const OUTPUT_FORMAT_REMINDER: &str = r#"Output format (a single JSON object, no additional text):
{
  "content": "rewritten section body in Markdown",
  "claimMap": [
    {
      "claim": "statement as it appears in content",
      "factId": "source id",
      "sourceUrl": "source URL",
      "quote": "optional supporting quote"
    }
  ],
  "unsourceableClaims": ["statement without a source"]
}

Remember: Return ONLY valid JSON, no markdown code blocks, no explanations."#;
