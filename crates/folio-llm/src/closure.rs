//! Closure-backed provider

use folio_domain::GenerationProvider;
use std::fmt;

/// Adapts a closure `Fn(&str) -> Result<String, E>` to [`GenerationProvider`]
///
/// ```
/// use folio_domain::GenerationProvider;
/// use folio_llm::{FnProvider, LlmError};
///
/// let echo = FnProvider::new(|prompt: &str| Ok::<_, LlmError>(prompt.len().to_string()));
/// assert_eq!(echo.generate("abcd").unwrap(), "4");
/// ```
pub struct FnProvider<F> {
    generate: F,
}

impl<F> FnProvider<F> {
    /// Wrap `generate`
    pub fn new(generate: F) -> Self {
        Self { generate }
    }
}

impl<F> fmt::Debug for FnProvider<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnProvider").finish_non_exhaustive()
    }
}

impl<F, E> GenerationProvider for FnProvider<F>
where
    F: Fn(&str) -> Result<String, E>,
{
    type Error = E;

    fn generate(&self, prompt: &str) -> Result<String, E> {
        (self.generate)(prompt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LlmError;

    #[test]
    fn test_closure_result_passes_through() {
        let provider = FnProvider::new(|prompt: &str| {
            if prompt.contains("fail") {
                Err(LlmError::ModelNotAvailable("m".into()))
            } else {
                Ok(format!("echo: {prompt}"))
            }
        });
        assert_eq!(provider.generate("hi").unwrap(), "echo: hi");
        assert_eq!(
            provider.generate("please fail").unwrap_err(),
            LlmError::ModelNotAvailable("m".into())
        );
    }
}
