//! Error types for grounded rewriting

use std::error::Error as StdError;
use thiserror::Error;

/// Errors that can occur during a grounded rewrite
///
/// A malformed generation payload is never an error; it is recovered by the
/// response parser.
#[derive(Error, Debug)]
pub enum GroundingError {
    /// The generation call itself failed; the provider's error is the source
    #[error("Generation failed: {0}")]
    Generation(#[source] Box<dyn StdError + Send + Sync>),

    /// No section with the requested id
    #[error("Section not found: {0}")]
    SectionNotFound(String),

    /// Section exceeds the configured maximum length
    #[error("Section too long: {0} chars (max: {1})")]
    SectionTooLong(usize, usize),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// The blocking generation task did not complete
    #[error("Task join error: {0}")]
    Join(String),
}

impl GroundingError {
    /// The provider's error, if this is a generation failure of type `E`
    pub fn generation_error<E: StdError + 'static>(&self) -> Option<&E> {
        match self {
            GroundingError::Generation(source) => source.downcast_ref::<E>(),
            _ => None,
        }
    }
}
