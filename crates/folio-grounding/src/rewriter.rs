//! Grounded section rewriting

use crate::config::GroundingConfig;
use crate::error::GroundingError;
use crate::parser::parse_generation_response;
use crate::prompt::PromptBuilder;
use crate::relevance::filter_sources;
use folio_domain::{
    FactRegistry, GenerationProvider, GroundedWriteRequest, GroundedWriteResult, PageContext,
    ParsedDocument, SourceCacheEntry, WriteConstraints,
};
use folio_gatekeeper::{ClaimValidator, KnownSources};
use folio_markup::{footnote_definitions, reassemble, renumber_footnotes, split_document};
use std::error::Error as StdError;
use std::sync::Arc;
use tracing::{debug, info};

/// A document after one of its sections was rewritten
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRewrite {
    /// The reassembled document with renumbered footnotes
    pub document: String,

    /// The validated result for the rewritten section
    pub result: GroundedWriteResult,
}

/// Rewrites sections with generated, source-grounded prose
///
/// Each rewrite makes exactly one generation call. There is no retry and no
/// timeout; a caller cancels by dropping the future.
pub struct GroundedRewriter<G>
where
    G: GenerationProvider,
{
    provider: Arc<G>,
    config: GroundingConfig,
    registry: Option<Arc<dyn FactRegistry + Send + Sync>>,
}

impl<G> GroundedRewriter<G>
where
    G: GenerationProvider + Send + Sync + 'static,
    G::Error: StdError + Send + Sync + 'static,
{
    /// Create a new rewriter
    pub fn new(provider: G, config: GroundingConfig) -> Self {
        Self {
            provider: Arc::new(provider),
            config,
            registry: None,
        }
    }

    /// Accept facts known to `registry` as well as the request's sources
    pub fn with_registry(mut self, registry: Arc<dyn FactRegistry + Send + Sync>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// The configuration in use
    pub fn config(&self) -> &GroundingConfig {
        &self.config
    }

    /// The prompt that [`rewrite`](Self::rewrite) would send for `request`
    pub fn build_prompt(&self, request: &GroundedWriteRequest) -> String {
        let heading = section_heading(request);
        let ranked = filter_sources(&heading, request.source_cache.clone());

        PromptBuilder::new(
            request.section_id.clone(),
            request.section_content.clone(),
            request.page_context.clone(),
        )
        .with_sources(ranked)
        .with_directions(request.directions.clone())
        .with_constraints(request.constraints.clone())
        .with_source_budget(self.config.source_char_budget, self.config.truncation_marker.clone())
        .build()
    }

    /// Rewrite one section
    ///
    /// Sources are ranked against the section heading and packed into the
    /// prompt, the generator is called once, its reply is parsed tolerantly
    /// and every claim is checked against the known sources. Only a failed
    /// generation call (or an oversized section) is an error.
    pub async fn rewrite(
        &self,
        request: GroundedWriteRequest,
    ) -> Result<GroundedWriteResult, GroundingError> {
        let length = request.section_content.chars().count();
        if length > self.config.max_section_length {
            return Err(GroundingError::SectionTooLong(length, self.config.max_section_length));
        }

        info!(
            "Rewriting section '{}' with {} sources",
            request.section_id,
            request.source_cache.len()
        );

        let prompt = self.build_prompt(&request);
        debug!("Prompt length: {} chars", prompt.len());

        let response = self.call_generator(prompt).await?;
        debug!("Generation response length: {} chars", response.len());

        let parsed = parse_generation_response(&request.section_id, &response);

        let mut known = KnownSources::from_cache(&request.source_cache);
        if let Some(registry) = &self.registry {
            known = known.with_registry(registry.as_ref());
        }
        let report = ClaimValidator::for_constraints(&request.constraints).validate(parsed, &known);

        info!(
            "Section '{}' rewritten: {} claims kept, {} unsourceable",
            report.result.section_id,
            report.result.claim_map.len(),
            report.result.unsourceable_claims.len()
        );

        Ok(report.result)
    }

    /// Rewrite the section `section_id` of `document` and rebuild the document
    ///
    /// The document is split, the section is rewritten with its heading as
    /// context, the new body replaces the old one, and the document is
    /// reassembled with its footnotes renumbered. Footnote definitions that
    /// lived in the old body are carried over unless the new body redefines
    /// the same label; renumbering then drops any nothing refers to.
    pub async fn rewrite_in_document(
        &self,
        document: &str,
        section_id: &str,
        page_context: PageContext,
        sources: Vec<SourceCacheEntry>,
        directions: Option<String>,
        constraints: WriteConstraints,
    ) -> Result<DocumentRewrite, GroundingError> {
        let mut parsed = split_document(document);
        let request = section_request(&parsed, section_id, page_context, sources, directions, constraints)?;

        let old_definitions: Vec<(String, String)> = parsed
            .section(section_id)
            .map(|section| footnote_definitions(&section.content))
            .unwrap_or_default()
            .into_iter()
            .map(|(label, text)| (label.to_string(), text.to_string()))
            .collect();

        let result = self.rewrite(request).await?;
        let body = carry_definitions(strip_heading_line(&result.content).trim(), &old_definitions);
        parsed.replace_section_content(section_id, format!("\n{body}\n"));

        let document = renumber_footnotes(&reassemble(&parsed));
        Ok(DocumentRewrite { document, result })
    }

    /// Call the generation provider
    async fn call_generator(&self, prompt: String) -> Result<String, GroundingError> {
        let provider = Arc::clone(&self.provider);

        // The provider trait is synchronous
        tokio::task::spawn_blocking(move || {
            provider
                .generate(&prompt)
                .map_err(|e| GroundingError::Generation(Box::new(e)))
        })
        .await
        .map_err(|e| GroundingError::Join(e.to_string()))?
    }
}

/// The rewrite request for section `section_id` of a split document
///
/// The section content sent to the generator starts with the heading line so
/// the heading is available for source ranking.
pub fn section_request(
    parsed: &ParsedDocument,
    section_id: &str,
    page_context: PageContext,
    sources: Vec<SourceCacheEntry>,
    directions: Option<String>,
    constraints: WriteConstraints,
) -> Result<GroundedWriteRequest, GroundingError> {
    let section = parsed
        .section(section_id)
        .ok_or_else(|| GroundingError::SectionNotFound(section_id.to_string()))?;
    Ok(GroundedWriteRequest {
        section_id: section.id.clone(),
        section_content: format!("{}\n{}", section.heading, section.content),
        page_context,
        source_cache: sources,
        directions,
        constraints,
    })
}

/// Heading used to rank sources: the request's own `## ` line when its
/// content starts with one, otherwise the section id with dashes as spaces
fn section_heading(request: &GroundedWriteRequest) -> String {
    let first = request
        .section_content
        .lines()
        .find(|line| !line.trim().is_empty())
        .unwrap_or_default();
    if first.trim_start().starts_with('#') {
        first.to_string()
    } else {
        request.section_id.replace('-', " ")
    }
}

/// Append old footnote definitions whose label `body` does not define
fn carry_definitions(body: &str, old: &[(String, String)]) -> String {
    let defined: Vec<&str> = footnote_definitions(body).into_iter().map(|(label, _)| label).collect();
    let carried: Vec<String> = old
        .iter()
        .filter(|(label, _)| !defined.contains(&label.as_str()))
        .map(|(label, text)| format!("[^{label}]: {text}"))
        .collect();
    if carried.is_empty() {
        body.to_string()
    } else {
        format!("{body}\n\n{}", carried.join("\n"))
    }
}

/// Drop a leading heading line the generator echoed back
fn strip_heading_line(content: &str) -> &str {
    let trimmed = content.trim_start();
    if trimmed.starts_with("## ") && !trimmed.starts_with("### ") {
        trimmed.split_once('\n').map_or("", |(_, rest)| rest)
    } else {
        content
    }
}
