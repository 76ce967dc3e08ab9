//! CLI command definitions and argument parsing.

use crate::config::OutputFormat;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Folio - Safely annotate, renumber and rewrite Markdown articles.
#[derive(Debug, Parser)]
#[command(name = "folio")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path (default: ~/.folio/config.toml)
    #[arg(short, long, global = true, env = "FOLIO_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (identifiers only)
    Quiet,
}

impl From<CliFormat> for OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => OutputFormat::Table,
            CliFormat::Json => OutputFormat::Json,
            CliFormat::Quiet => OutputFormat::Quiet,
        }
    }
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List the level-2 sections of a document
    Split(InputArgs),

    /// Renumber footnotes by first appearance
    Renumber(EditArgs),

    /// Wrap facts in reference tags from a JSON list of proposals
    Annotate(AnnotateArgs),

    /// Collapse double-wrapped tags and strip stray escapes
    Repair(EditArgs),

    /// Show the spans that pattern-based edits never touch
    Ranges(InputArgs),

    /// Rank sources by relevance to a section
    Rank(RankArgs),

    /// Rewrite a section from a recorded generator reply
    Rewrite(RewriteArgs),
}

/// A document to read.
#[derive(Debug, Clone, Args)]
pub struct InputArgs {
    /// Markdown file, or `-` for stdin
    pub input: String,
}

/// A document to read and possibly write back.
#[derive(Debug, Clone, Args)]
pub struct EditArgs {
    /// Markdown file, or `-` for stdin
    pub input: String,

    /// Write the result back to the input file instead of stdout
    #[arg(short, long)]
    pub in_place: bool,
}

/// Arguments for the annotate command.
#[derive(Debug, Clone, Args)]
pub struct AnnotateArgs {
    #[command(flatten)]
    pub edit: EditArgs,

    /// JSON file with an array of `{searchText, entityId, factId, displayText}`
    #[arg(short, long)]
    pub proposals: PathBuf,
}

/// Arguments for the rank command.
#[derive(Debug, Clone, Args)]
pub struct RankArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// JSON file with an array of source cache entries
    #[arg(long)]
    pub sources: PathBuf,

    /// Id of the section to rank against
    #[arg(short, long)]
    pub section: String,
}

/// Arguments for the rewrite command.
#[derive(Debug, Clone, Args)]
pub struct RewriteArgs {
    #[command(flatten)]
    pub edit: EditArgs,

    /// Id of the section to rewrite
    #[arg(short, long)]
    pub section: String,

    /// JSON file with an array of source cache entries
    #[arg(long)]
    pub sources: Option<PathBuf>,

    /// File holding the generator's reply (not needed with --print-prompt)
    #[arg(short, long, required_unless_present = "print_prompt")]
    pub response: Option<PathBuf>,

    /// Page title given to the generator (default: the section id)
    #[arg(long)]
    pub title: Option<String>,

    /// Editorial directions
    #[arg(short, long)]
    pub directions: Option<String>,

    /// Keep claims that cite unknown sources
    #[arg(long)]
    pub permissive: bool,

    /// Approximate target length in words
    #[arg(long)]
    pub target_words: Option<usize>,

    /// Print the prompt that would be sent and exit
    #[arg(long)]
    pub print_prompt: bool,
}
