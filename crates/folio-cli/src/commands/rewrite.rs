//! Rewrite command implementation.
//!
//! The generator reply is read from a file and replayed through the grounded
//! rewriter, so the full prompt, parse and validation path runs without a
//! network backend.

use crate::cli::RewriteArgs;
use crate::config::{Config, OutputFormat};
use crate::error::{CliError, Result};
use crate::input::{read_document, read_json, write_document};
use crate::output::Formatter;
use folio_domain::{PageContext, SourceCacheEntry, WriteConstraints};
use folio_grounding::{section_request, DocumentRewrite, GroundedRewriter, GroundingError};
use folio_llm::{FnProvider, LlmError};
use folio_markup::split_document;
use std::fs;

/// Everything a rewrite needs besides the document and the reply.
#[derive(Debug, Clone)]
pub struct RewritePlan {
    pub section_id: String,
    pub page_context: PageContext,
    /// Empty when no `--sources` file was given, which accepts any citation
    pub sources: Vec<SourceCacheEntry>,
    pub directions: Option<String>,
    pub constraints: WriteConstraints,
}

impl RewritePlan {
    /// Build a plan from command arguments and configured defaults.
    pub fn from_args(args: &RewriteArgs, config: &Config) -> Result<Self> {
        let sources = match &args.sources {
            Some(path) => read_json(path)?,
            None => Vec::new(),
        };

        let mut constraints = config.grounding.default_constraints();
        if args.permissive {
            constraints.allow_training_knowledge = true;
        }
        if args.target_words.is_some() {
            constraints.target_words = args.target_words;
        }

        let title = args.title.clone().unwrap_or_else(|| args.section.clone());
        Ok(Self {
            section_id: args.section.clone(),
            page_context: PageContext::titled(title),
            sources,
            directions: args.directions.clone(),
            constraints,
        })
    }
}

fn replaying_rewriter(
    reply: String,
    config: &Config,
) -> GroundedRewriter<FnProvider<impl Fn(&str) -> std::result::Result<String, LlmError> + Send + Sync + 'static>>
{
    let provider = FnProvider::new(move |_: &str| Ok::<_, LlmError>(reply.clone()));
    GroundedRewriter::new(provider, config.grounding.clone())
}

/// The prompt the rewriter would send for `plan`.
pub fn prompt_for(document: &str, plan: RewritePlan, config: &Config) -> Result<String> {
    let parsed = split_document(document);
    let request = section_request(
        &parsed,
        &plan.section_id,
        plan.page_context,
        plan.sources,
        plan.directions,
        plan.constraints,
    )?;
    Ok(replaying_rewriter(String::new(), config).build_prompt(&request))
}

/// Rewrite the planned section of `document` using `reply` as the generator
/// output.
pub async fn replay(document: &str, plan: RewritePlan, reply: String, config: &Config) -> Result<DocumentRewrite> {
    let rewrite = replaying_rewriter(reply, config)
        .rewrite_in_document(
            document,
            &plan.section_id,
            plan.page_context,
            plan.sources,
            plan.directions,
            plan.constraints,
        )
        .await?;
    Ok(rewrite)
}

/// Execute the rewrite command.
pub async fn execute_rewrite(args: RewriteArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let document = read_document(&args.edit.input)?;
    let plan = RewritePlan::from_args(&args, config)?;

    if args.print_prompt {
        println!("{}", prompt_for(&document, plan, config)?);
        return Ok(());
    }

    let Some(response_path) = &args.response else {
        return Err(CliError::InvalidInput("--response is required".to_string()));
    };
    let reply = fs::read_to_string(response_path)?;

    let rewrite = match replay(&document, plan, reply, config).await {
        Err(CliError::Grounding(GroundingError::SectionNotFound(id))) => {
            let available = split_document(&document).section_ids().join(", ");
            return Err(CliError::InvalidInput(format!(
                "No section '{}' (available: {})",
                id, available
            )));
        }
        other => other?,
    };

    if formatter.format() == OutputFormat::Json && !args.edit.in_place {
        let json = serde_json::json!({
            "document": rewrite.document,
            "result": rewrite.result,
        });
        println!("{}", serde_json::to_string_pretty(&json)?);
        return Ok(());
    }

    write_document(&args.edit.input, args.edit.in_place, &rewrite.document)?;
    if formatter.format() != OutputFormat::Quiet {
        eprintln!("{}", formatter.rewrite_summary(&rewrite.result));
    }
    Ok(())
}
