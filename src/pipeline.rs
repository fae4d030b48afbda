//! End-to-end processing of one paper
//!
//! Processing locates and summarizes each configured section, then
//! summarizes the full text. Every model request runs to completion before
//! the next one starts.

use crate::config::Config;
use crate::context::{
    default_estimator, ContextRetriever, QuestionAnswerer, SummarizationEngine, SummaryPath,
    TokenEstimator,
};
use crate::error::{DigestError, Result};
use crate::llm::{LlmGateway, OpenAiGateway};
use crate::sections::SectionLocator;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

/// Summary of one named section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionSummary {
    pub name: String,
    pub found: bool,
    pub summary: String,
}

/// Everything produced by processing a paper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaperDigest {
    pub id: Uuid,
    pub sections: Vec<SectionSummary>,
    pub full_summary: String,
    pub path: SummaryPath,
    pub estimated_tokens: usize,
    pub chunk_count: usize,
    pub processed_at: DateTime<Utc>,
}

impl PaperDigest {
    pub fn section(&self, name: &str) -> Option<&SectionSummary> {
        self.sections
            .iter()
            .find(|s| s.name.eq_ignore_ascii_case(name))
    }
}

/// Section location, summarization and question answering wired together
pub struct PaperPipeline {
    locator: SectionLocator,
    engine: SummarizationEngine,
    answerer: QuestionAnswerer,
    targets: Vec<String>,
}

impl PaperPipeline {
    pub fn new(
        config: &Config,
        gateway: Arc<dyn LlmGateway>,
        estimator: Arc<dyn TokenEstimator>,
    ) -> Self {
        let answerer = QuestionAnswerer::new(
            gateway.clone(),
            ContextRetriever::new(config.retrieval.top_k),
            config.summarization.answer_max_tokens,
            config.summarization.temperature,
        );

        Self {
            locator: SectionLocator::from_config(&config.sections),
            engine: SummarizationEngine::new(gateway, estimator, config.summarization.clone()),
            answerer,
            targets: config.sections.targets.clone(),
        }
    }

    /// Pipeline talking to the configured OpenAI-compatible endpoint
    pub fn from_config(config: &Config) -> Result<Self> {
        if config.llm.api_key.is_none() {
            warn!("No API key configured; requests to {} are unauthenticated", config.llm.api_url);
        }

        let gateway = OpenAiGateway::new(config.llm.clone()).map_err(DigestError::Gateway)?;
        Ok(Self::new(config, Arc::new(gateway), default_estimator()))
    }

    pub fn locator(&self) -> &SectionLocator {
        &self.locator
    }

    pub fn engine(&self) -> &SummarizationEngine {
        &self.engine
    }

    /// Locate and summarize one section
    pub async fn summarize_section(&self, document: &str, name: &str) -> Result<SectionSummary> {
        let text = self.locator.locate(document, name)?;
        let summary = self.engine.summarize_section(text, name).await?;

        Ok(SectionSummary {
            name: name.to_string(),
            found: !text.is_empty(),
            summary,
        })
    }

    /// Summarize every configured section and the whole document
    pub async fn process(&self, document: &str) -> Result<PaperDigest> {
        let id = Uuid::new_v4();
        info!(digest_id = %id, "Processing document ({} bytes)", document.len());

        let mut sections = Vec::with_capacity(self.targets.len());
        for name in &self.targets {
            sections.push(self.summarize_section(document, name).await?);
        }

        let outcome = self.engine.summarize_document_detailed(document).await?;

        info!(
            digest_id = %id,
            "Processed document: {} of {} sections found, {:?} summary",
            sections.iter().filter(|s| s.found).count(),
            sections.len(),
            outcome.path
        );

        Ok(PaperDigest {
            id,
            sections,
            full_summary: outcome.summary,
            path: outcome.path,
            estimated_tokens: outcome.estimated_tokens,
            chunk_count: outcome.chunk_count,
            processed_at: Utc::now(),
        })
    }

    pub async fn answer(&self, question: &str, document: &str, summary: &str) -> Result<String> {
        self.answerer.answer(question, document, summary).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::WordBasedEstimator;
    use crate::llm::RecordingGateway;

    const PAPER: &str = "Abstract\nThis study examines trust.\nMethods\nWe surveyed 200 users.\nDiscussion\nTrust matters.";

    fn pipeline(gateway: Arc<RecordingGateway>) -> PaperPipeline {
        PaperPipeline::new(
            &Config::default(),
            gateway,
            Arc::new(WordBasedEstimator::default()),
        )
    }

    #[tokio::test]
    async fn test_process_sections_then_document() {
        let gateway = Arc::new(RecordingGateway::new());
        let pipeline = pipeline(gateway.clone());

        let digest = pipeline.process(PAPER).await.unwrap();

        assert_eq!(digest.sections.len(), 3);
        assert_eq!(digest.section("abstract").unwrap().summary, "summary 1");
        assert_eq!(digest.section("Methods").unwrap().summary, "summary 2");

        let results = digest.section("Results").unwrap();
        assert!(!results.found);
        assert_eq!(results.summary, "No Results section found.");

        assert_eq!(digest.full_summary, "summary 3");
        assert_eq!(digest.path, SummaryPath::Direct);
        assert_eq!(gateway.call_count(), 3);

        let calls = gateway.calls();
        assert!(calls[0].user_prompt().unwrap().contains("This study examines trust."));
        assert!(!calls[0].user_prompt().unwrap().contains("We surveyed"));
    }

    #[tokio::test]
    async fn test_digest_serializes() {
        let gateway = Arc::new(RecordingGateway::new());
        let digest = pipeline(gateway).process(PAPER).await.unwrap();

        let json = serde_json::to_value(&digest).unwrap();
        assert_eq!(json["path"], "direct");
        assert_eq!(json["sections"][2]["found"], false);
    }
}
