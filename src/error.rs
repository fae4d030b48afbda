//! Crate-wide error type

use crate::llm::GatewayError;
use thiserror::Error;

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, DigestError>;

/// Errors surfaced by the digest pipeline
///
/// A missing section is not an error: the locator returns an empty span and
/// the summarizer substitutes a marker text.
#[derive(Debug, Error)]
pub enum DigestError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Language model request failed: {0}")]
    Gateway(#[from] GatewayError),

    #[error("Please upload and process a paper first.")]
    NotReady,

    #[error("Please ask a valid question.")]
    InvalidInput,

    #[error("Text extraction failed: {0}")]
    Extraction(String),

    #[error("Invalid heading pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl DigestError {
    /// Message suitable for showing to an end user
    pub fn user_message(&self) -> String {
        match self {
            DigestError::NotReady | DigestError::InvalidInput => self.to_string(),
            DigestError::Gateway(e) => format!("The language model could not answer: {}", e),
            other => format!("Error: {}", other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_facing_messages() {
        assert_eq!(
            DigestError::NotReady.user_message(),
            "Please upload and process a paper first."
        );
        assert_eq!(
            DigestError::InvalidInput.user_message(),
            "Please ask a valid question."
        );
    }

    #[test]
    fn test_gateway_error_conversion() {
        let err: DigestError = GatewayError::EmptyResponse.into();
        assert!(matches!(err, DigestError::Gateway(_)));
        assert!(err.user_message().starts_with("The language model could not answer"));
    }
}
