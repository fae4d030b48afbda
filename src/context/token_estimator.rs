//! Token estimation using tiktoken

use crate::error::{DigestError, Result};
use std::sync::Arc;
use tiktoken_rs::{cl100k_base, CoreBPE};
use tracing::warn;

/// Token estimator trait for different tokenization strategies
pub trait TokenEstimator: Send + Sync {
    /// Estimate the number of tokens in the given text
    fn estimate(&self, text: &str) -> usize;
}

/// Tiktoken-based token estimator using cl100k_base (GPT-4, GPT-3.5-turbo)
pub struct TiktokenEstimator {
    bpe: Arc<CoreBPE>,
}

impl TiktokenEstimator {
    /// Create a new tiktoken estimator with cl100k_base encoding
    pub fn new() -> Result<Self> {
        let bpe = cl100k_base().map_err(|e| DigestError::Configuration(e.to_string()))?;
        Ok(Self { bpe: Arc::new(bpe) })
    }
}

impl TokenEstimator for TiktokenEstimator {
    fn estimate(&self, text: &str) -> usize {
        self.bpe.encode_with_special_tokens(text).len()
    }
}

/// Word-based token estimator (fallback, ~1.3 tokens per word)
pub struct WordBasedEstimator {
    tokens_per_word: f64,
}

impl WordBasedEstimator {
    pub fn new(tokens_per_word: f64) -> Self {
        Self { tokens_per_word }
    }
}

impl Default for WordBasedEstimator {
    fn default() -> Self {
        Self::new(1.3)
    }
}

impl TokenEstimator for WordBasedEstimator {
    fn estimate(&self, text: &str) -> usize {
        let word_count = text.split_whitespace().count();
        (word_count as f64 * self.tokens_per_word).ceil() as usize
    }
}

/// Tiktoken when its encoding loads, otherwise the word-based fallback
pub fn default_estimator() -> Arc<dyn TokenEstimator> {
    match TiktokenEstimator::new() {
        Ok(estimator) => Arc::new(estimator),
        Err(e) => {
            warn!("Tiktoken initialization failed ({}), falling back to word-based estimate", e);
            Arc::new(WordBasedEstimator::default())
        }
    }
}
