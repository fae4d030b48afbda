//! Direct and hierarchical summarization
//!
//! Short inputs go to the model in one request. Inputs estimated at or above
//! the direct threshold are chunked, each chunk is summarized in order, and
//! the joined chunk summaries are combined by a final request. Requests are
//! issued one at a time; any gateway failure fails the whole call.

use super::chunker::chunk_text;
use super::prompts;
use super::token_estimator::TokenEstimator;
use crate::config::SummarizationConfig;
use crate::error::Result;
use crate::llm::{GenerationRequest, LlmGateway};
use crate::metrics::METRICS;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

/// Which strategy produced a document summary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryPath {
    Direct,
    Hierarchical,
}

/// A document summary plus how it was produced
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummarizationOutcome {
    pub summary: String,
    pub path: SummaryPath,
    pub estimated_tokens: usize,
    /// Zero on the direct path
    pub chunk_count: usize,
}

/// Summarization over an [`LlmGateway`]
pub struct SummarizationEngine {
    gateway: Arc<dyn LlmGateway>,
    estimator: Arc<dyn TokenEstimator>,
    config: SummarizationConfig,
}

impl SummarizationEngine {
    pub fn new(
        gateway: Arc<dyn LlmGateway>,
        estimator: Arc<dyn TokenEstimator>,
        config: SummarizationConfig,
    ) -> Self {
        Self {
            gateway,
            estimator,
            config,
        }
    }

    pub fn config(&self) -> &SummarizationConfig {
        &self.config
    }

    /// Text returned for a section that was not found
    pub fn absent_marker(label: &str) -> String {
        format!("No {} section found.", label)
    }

    /// Summarize one located section
    ///
    /// Blank input yields [`Self::absent_marker`] without calling the gateway.
    pub async fn summarize_section(&self, text: &str, label: &str) -> Result<String> {
        if text.trim().is_empty() {
            debug!("Section {} absent, skipping summarization", label);
            return Ok(Self::absent_marker(label));
        }

        METRICS.record_summarization("section");
        self.generate(
            prompts::SECTION_SYSTEM,
            prompts::section(label, text),
            self.config.section_max_tokens,
        )
        .await
    }

    /// Summarize a whole document
    pub async fn summarize_document(&self, text: &str) -> Result<String> {
        Ok(self.summarize_document_detailed(text).await?.summary)
    }

    /// Summarize a whole document, reporting the path taken
    pub async fn summarize_document_detailed(&self, text: &str) -> Result<SummarizationOutcome> {
        let estimated_tokens = self.estimator.estimate(text);

        if estimated_tokens < self.config.direct_threshold_tokens {
            info!("Summarizing document directly ({} estimated tokens)", estimated_tokens);
            METRICS.record_summarization("direct");

            let summary = self
                .generate(
                    prompts::PAPER_SYSTEM,
                    prompts::whole_paper(text),
                    self.config.document_max_tokens,
                )
                .await?;

            return Ok(SummarizationOutcome {
                summary,
                path: SummaryPath::Direct,
                estimated_tokens,
                chunk_count: 0,
            });
        }

        let chunks = chunk_text(text, self.config.chunk_units);
        info!(
            "Summarizing document hierarchically ({} estimated tokens, {} chunks)",
            estimated_tokens,
            chunks.len()
        );
        METRICS.record_summarization("hierarchical");

        let summary = self.summarize_chunks(&chunks).await?;

        Ok(SummarizationOutcome {
            summary,
            path: SummaryPath::Hierarchical,
            estimated_tokens,
            chunk_count: chunks.len(),
        })
    }

    /// One request per chunk in order, then one combining request
    async fn summarize_chunks(&self, chunks: &[String]) -> Result<String> {
        let mut chunk_summaries = Vec::with_capacity(chunks.len());

        for (i, chunk) in chunks.iter().enumerate() {
            debug!("Summarizing chunk {}/{}", i + 1, chunks.len());
            let summary = self
                .generate(
                    prompts::SECTION_SYSTEM,
                    prompts::chunk(chunk),
                    self.config.chunk_max_tokens,
                )
                .await?;
            METRICS.chunks_summarized.inc();
            chunk_summaries.push(summary);
        }

        let combined = chunk_summaries.join("\n\n");
        self.generate(
            prompts::SECTION_SYSTEM,
            prompts::combine(&combined),
            self.config.combine_max_tokens,
        )
        .await
    }

    async fn generate(&self, system: &str, user: String, max_tokens: usize) -> Result<String> {
        let request = GenerationRequest::new(system, user, max_tokens, self.config.temperature);
        let text = self.gateway.generate(request).await?;
        Ok(text.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::token_estimator::WordBasedEstimator;
    use crate::error::DigestError;
    use crate::llm::RecordingGateway;

    fn engine(gateway: Arc<RecordingGateway>) -> SummarizationEngine {
        SummarizationEngine::new(
            gateway,
            Arc::new(WordBasedEstimator::new(1.0)),
            SummarizationConfig::default(),
        )
    }

    fn words(n: usize) -> String {
        (0..n).map(|i| format!("w{}", i)).collect::<Vec<_>>().join(" ")
    }

    #[tokio::test]
    async fn test_absent_section_skips_gateway() {
        let gateway = Arc::new(RecordingGateway::new());
        let engine = engine(gateway.clone());

        let summary = engine.summarize_section("", "Abstract").await.unwrap();
        assert_eq!(summary, "No Abstract section found.");

        let summary = engine.summarize_section("  \n\t", "Methods").await.unwrap();
        assert_eq!(summary, "No Methods section found.");

        assert_eq!(gateway.call_count(), 0);
    }

    #[tokio::test]
    async fn test_section_summary_request() {
        let gateway = Arc::new(RecordingGateway::new());
        let engine = engine(gateway.clone());

        let summary = engine
            .summarize_section("Methods\nWe surveyed 200 users.", "Methods")
            .await
            .unwrap();
        assert_eq!(summary, "summary 1");

        let calls = gateway.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].max_tokens, 200);
        assert_eq!(calls[0].temperature, 0.7);
        let prompt = calls[0].user_prompt().unwrap();
        assert!(prompt.contains("following Methods section"));
        assert!(prompt.contains("We surveyed 200 users."));
    }

    #[tokio::test]
    async fn test_short_document_is_direct() {
        let gateway = Arc::new(RecordingGateway::new());
        let engine = engine(gateway.clone());

        let outcome = engine.summarize_document_detailed(&words(500)).await.unwrap();
        assert_eq!(outcome.path, SummaryPath::Direct);
        assert_eq!(outcome.chunk_count, 0);
        assert_eq!(outcome.summary, "summary 1");
        assert_eq!(gateway.call_count(), 1);
        assert_eq!(gateway.calls()[0].max_tokens, 500);
    }

    #[tokio::test]
    async fn test_large_document_is_hierarchical() {
        let gateway = Arc::new(RecordingGateway::new());
        let engine = engine(gateway.clone());

        let outcome = engine
            .summarize_document_detailed(&words(25_000))
            .await
            .unwrap();

        // 25,000 words at 2,000 per chunk
        assert_eq!(outcome.path, SummaryPath::Hierarchical);
        assert_eq!(outcome.chunk_count, 13);
        assert_eq!(gateway.call_count(), outcome.chunk_count + 1);
        assert_eq!(outcome.summary, "summary 14");

        let calls = gateway.calls();
        assert!(calls[0].user_prompt().unwrap().contains("w0 w1 w2"));
        assert!(calls[12].user_prompt().unwrap().contains("w24999"));

        let combine = calls[13].user_prompt().unwrap();
        assert!(combine.contains("summary 1\n\nsummary 2\n\nsummary 3"));
        assert!(combine.contains("summary 13\n\nFinal Summary:"));
    }

    #[tokio::test]
    async fn test_threshold_boundary() {
        let gateway = Arc::new(RecordingGateway::new());
        let engine = engine(gateway.clone());

        let outcome = engine.summarize_document_detailed(&words(11_999)).await.unwrap();
        assert_eq!(outcome.path, SummaryPath::Direct);

        let outcome = engine.summarize_document_detailed(&words(12_000)).await.unwrap();
        assert_eq!(outcome.path, SummaryPath::Hierarchical);
        assert_eq!(outcome.chunk_count, 6);
    }

    #[tokio::test]
    async fn test_chunk_failure_fails_whole_summary() {
        let gateway = Arc::new(RecordingGateway::failing_at(3));
        let engine = engine(gateway.clone());

        let result = engine.summarize_document(&words(25_000)).await;
        assert!(matches!(result, Err(DigestError::Gateway(_))));
        // no further chunks and no combine request after the failure
        assert_eq!(gateway.call_count(), 4);
    }
}
