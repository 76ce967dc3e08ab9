//! Folio CLI library.
//!
//! Runs the document transforms over local Markdown files: section listing,
//! footnote renumbering, fact annotation, repairs, protected-range inspection,
//! source ranking, and replaying a recorded generator reply as a grounded
//! section rewrite.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod input;
pub mod output;

pub use cli::{Cli, Command};
pub use config::Config;
pub use error::{CliError, Result};
pub use output::Formatter;
