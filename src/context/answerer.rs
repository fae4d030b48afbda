//! Question answering over a processed document

use super::prompts;
use super::retriever::ContextRetriever;
use crate::error::{DigestError, Result};
use crate::llm::{GenerationRequest, LlmGateway};
use std::sync::Arc;
use tracing::debug;

/// Answers free-form questions from the document summary plus retrieved paragraphs
pub struct QuestionAnswerer {
    gateway: Arc<dyn LlmGateway>,
    retriever: ContextRetriever,
    max_tokens: usize,
    temperature: f32,
}

impl QuestionAnswerer {
    pub fn new(
        gateway: Arc<dyn LlmGateway>,
        retriever: ContextRetriever,
        max_tokens: usize,
        temperature: f32,
    ) -> Self {
        Self {
            gateway,
            retriever,
            max_tokens,
            temperature,
        }
    }

    /// Answer `question`; a blank question is rejected before any request is made
    pub async fn answer(&self, question: &str, document: &str, summary: &str) -> Result<String> {
        let question = question.trim();
        if question.is_empty() {
            return Err(DigestError::InvalidInput);
        }

        let context = self.retriever.build_context(question, document, summary);
        debug!("Answering question with {} bytes of context", context.len());

        let request = GenerationRequest::new(
            prompts::ANSWER_SYSTEM,
            prompts::answer(&context, question),
            self.max_tokens,
            self.temperature,
        );
        let answer = self.gateway.generate(request).await?;
        Ok(answer.trim().to_string())
    }
}
