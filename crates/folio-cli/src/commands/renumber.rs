//! Renumber command implementation.

use crate::cli::EditArgs;
use crate::error::Result;
use crate::input::{read_document, write_document};
use crate::output::Formatter;
use folio_markup::renumber_footnotes;

/// Execute the renumber command.
pub fn execute_renumber(args: EditArgs, formatter: &Formatter) -> Result<()> {
    let document = read_document(&args.input)?;
    let renumbered = renumber_footnotes(&document);
    write_document(&args.input, args.in_place, &renumbered)?;

    if args.in_place {
        let message = if renumbered == document {
            formatter.info("Footnotes already in order")
        } else {
            formatter.success(&format!("Renumbered footnotes in {}", args.input))
        };
        eprintln!("{}", message);
    }
    Ok(())
}
