//! Folio generation providers
//!
//! Implementations of the `GenerationProvider` trait from `folio-domain`.
//! The core never talks to a model directly; callers hand it one of these,
//! or their own implementation.
//!
//! # Providers
//!
//! - `MockProvider`: deterministic responses for tests and dry runs
//! - `FnProvider`: adapts any closure to the provider trait
//!
//! # Examples
//!
//! ```
//! use folio_domain::GenerationProvider;
//! use folio_llm::MockProvider;
//!
//! let provider = MockProvider::new(r#"{"content": "Hello"}"#);
//! let result = provider.generate("test prompt").unwrap();
//! assert_eq!(result, r#"{"content": "Hello"}"#);
//! ```

#![warn(missing_docs)]

mod closure;

pub use closure::FnProvider;

use folio_domain::GenerationProvider;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use thiserror::Error;
use tracing::debug;

/// Errors that can occur during generation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// The backend answered with something that is not a completion
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}

#[derive(Debug, Clone)]
enum Scripted {
    Response(String),
    Failure(LlmError),
}

/// Mock provider for deterministic testing
///
/// Returns pre-configured responses without any I/O. Clones share their
/// response table and call count.
///
/// # Examples
///
/// ```
/// use folio_domain::GenerationProvider;
/// use folio_llm::MockProvider;
///
/// // Simple fixed response
/// let provider = MockProvider::new("Fixed response");
/// assert_eq!(provider.generate("any prompt").unwrap(), "Fixed response");
///
/// // Per-prompt responses
/// let provider = MockProvider::default();
/// provider.add_response("prompt1", "response1");
/// provider.add_response("prompt2", "response2");
/// assert_eq!(provider.generate("prompt1").unwrap(), "response1");
/// assert_eq!(provider.generate("prompt2").unwrap(), "response2");
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_response: Arc<Mutex<Scripted>>,
    responses: Arc<Mutex<HashMap<String, Scripted>>>,
    prompts: Arc<Mutex<Vec<String>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockProvider {
    /// Create a MockProvider with a fixed response for all prompts
    pub fn new(response: impl Into<String>) -> Self {
        Self::scripted(Scripted::Response(response.into()))
    }

    /// Create a MockProvider that fails every call with `error`
    pub fn failing(error: LlmError) -> Self {
        Self::scripted(Scripted::Failure(error))
    }

    fn scripted(default: Scripted) -> Self {
        Self {
            default_response: Arc::new(Mutex::new(default)),
            responses: Arc::new(Mutex::new(HashMap::new())),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Replace the response returned for prompts with no specific entry
    pub fn set_default_response(&self, response: impl Into<String>) {
        *lock(&self.default_response) = Scripted::Response(response.into());
    }

    /// Add a specific response for a given prompt
    pub fn add_response(&self, prompt: impl Into<String>, response: impl Into<String>) {
        lock(&self.responses).insert(prompt.into(), Scripted::Response(response.into()));
    }

    /// Configure to return an error for a specific prompt
    pub fn add_error(&self, prompt: impl Into<String>, error: LlmError) {
        lock(&self.responses).insert(prompt.into(), Scripted::Failure(error));
    }

    /// Get the number of times generate was called
    pub fn call_count(&self) -> usize {
        lock(&self.prompts).len()
    }

    /// Prompts received so far, oldest first
    pub fn prompts(&self) -> Vec<String> {
        lock(&self.prompts).clone()
    }

    /// The most recent prompt, if any
    pub fn last_prompt(&self) -> Option<String> {
        lock(&self.prompts).last().cloned()
    }

    /// Reset the call count and forget recorded prompts
    pub fn reset_call_count(&self) {
        lock(&self.prompts).clear();
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("Default mock response")
    }
}

impl GenerationProvider for MockProvider {
    type Error = LlmError;

    fn generate(&self, prompt: &str) -> Result<String, Self::Error> {
        lock(&self.prompts).push(prompt.to_string());

        let scripted = match lock(&self.responses).get(prompt) {
            Some(specific) => specific.clone(),
            None => lock(&self.default_response).clone(),
        };
        debug!(prompt_len = prompt.len(), "Mock generation");

        match scripted {
            Scripted::Response(text) => Ok(text),
            Scripted::Failure(error) => Err(error),
        }
    }
}
