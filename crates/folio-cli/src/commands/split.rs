//! Split command implementation.

use crate::cli::InputArgs;
use crate::error::Result;
use crate::input::read_document;
use crate::output::Formatter;
use folio_markup::split_document;

/// Execute the split command.
pub fn execute_split(args: InputArgs, formatter: &Formatter) -> Result<()> {
    let document = read_document(&args.input)?;
    let parsed = split_document(&document);
    println!("{}", formatter.format_sections(&parsed)?);
    Ok(())
}
