//! Reading documents and JSON inputs, and writing results.

use crate::error::{CliError, Result};
use serde::de::DeserializeOwned;
use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

/// Marker for standard input
pub const STDIN: &str = "-";

/// Read a document from a path, or from stdin when `input` is `-`.
pub fn read_document(input: &str) -> Result<String> {
    if input == STDIN {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        Ok(buf)
    } else {
        Ok(fs::read_to_string(input)?)
    }
}

/// Read and deserialize a JSON file.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let contents = fs::read_to_string(path)
        .map_err(|e| CliError::InvalidInput(format!("Cannot read {}: {}", path.display(), e)))?;
    Ok(serde_json::from_str(&contents)?)
}

/// Write `content` back to `input` when `in_place`, otherwise to stdout.
pub fn write_document(input: &str, in_place: bool, content: &str) -> Result<()> {
    if in_place {
        if input == STDIN {
            return Err(CliError::InvalidInput("--in-place needs a file, not stdin".to_string()));
        }
        fs::write(input, content)?;
    } else {
        let mut stdout = io::stdout().lock();
        stdout.write_all(content.as_bytes())?;
        stdout.flush()?;
    }
    Ok(())
}
