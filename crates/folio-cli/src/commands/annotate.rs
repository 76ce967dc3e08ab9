//! Annotate command implementation.

use crate::cli::AnnotateArgs;
use crate::config::OutputFormat;
use crate::error::Result;
use crate::input::{read_document, read_json, write_document};
use crate::output::Formatter;
use folio_domain::{AnnotationOutcome, FactReplacement};
use folio_markup::{apply_fact_references, repair};

/// Apply `proposals` and repair whatever the edits or upstream tools left
/// behind.
pub fn annotate(document: &str, proposals: &[FactReplacement]) -> AnnotationOutcome {
    let mut outcome = apply_fact_references(document, proposals);
    outcome.content = repair(&outcome.content);
    outcome
}

/// Execute the annotate command.
pub fn execute_annotate(args: AnnotateArgs, formatter: &Formatter) -> Result<()> {
    let document = read_document(&args.edit.input)?;
    let proposals: Vec<FactReplacement> = read_json(&args.proposals)?;
    let outcome = annotate(&document, &proposals);

    if formatter.format() == OutputFormat::Json && !args.edit.in_place {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        return Ok(());
    }

    write_document(&args.edit.input, args.edit.in_place, &outcome.content)?;
    if formatter.format() != OutputFormat::Quiet {
        eprintln!("{}", formatter.annotation_summary(&outcome, proposals.len()));
    }
    Ok(())
}
