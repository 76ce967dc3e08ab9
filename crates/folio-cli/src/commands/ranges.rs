//! Ranges command implementation.

use crate::cli::InputArgs;
use crate::error::Result;
use crate::input::read_document;
use crate::output::Formatter;
use folio_markup::detect_protected_ranges;

/// Execute the ranges command.
pub fn execute_ranges(args: InputArgs, formatter: &Formatter) -> Result<()> {
    let document = read_document(&args.input)?;
    let ranges = detect_protected_ranges(&document);
    println!("{}", formatter.format_ranges(&document, &ranges)?);
    Ok(())
}
