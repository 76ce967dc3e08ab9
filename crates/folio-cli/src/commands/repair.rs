//! Repair command implementation.

use crate::cli::EditArgs;
use crate::error::Result;
use crate::input::{read_document, write_document};
use crate::output::Formatter;
use folio_markup::repair;

/// Execute the repair command.
pub fn execute_repair(args: EditArgs, formatter: &Formatter) -> Result<()> {
    let document = read_document(&args.input)?;
    let repaired = repair(&document);
    write_document(&args.input, args.in_place, &repaired)?;

    if args.in_place {
        let message = if repaired == document {
            formatter.info("Nothing to repair")
        } else {
            formatter.success(&format!("Repaired {}", args.input))
        };
        eprintln!("{}", message);
    }
    Ok(())
}
