//! Process-then-ask session state
//!
//! A session starts unpopulated. `process` is the only writer and populates it
//! once the whole process phase succeeds on a non-empty document; questions
//! asked before that are rejected with [`DigestError::NotReady`] and never
//! reach the model.

use crate::error::{DigestError, Result};
use crate::metrics::METRICS;
use crate::pipeline::{PaperDigest, PaperPipeline};
use tracing::{info, warn};

#[derive(Debug)]
struct LoadedPaper {
    document: String,
    digest: PaperDigest,
}

/// Holds one processed paper for follow-up questions
pub struct PaperSession {
    pipeline: PaperPipeline,
    // None until a paper has been fully processed
    paper: Option<LoadedPaper>,
}

impl PaperSession {
    pub fn new(pipeline: PaperPipeline) -> Self {
        Self {
            pipeline,
            paper: None,
        }
    }

    pub fn pipeline(&self) -> &PaperPipeline {
        &self.pipeline
    }

    pub fn is_ready(&self) -> bool {
        self.paper.is_some()
    }

    pub fn digest(&self) -> Option<&PaperDigest> {
        self.paper.as_ref().map(|p| &p.digest)
    }

    /// Process `document`, replacing any previous paper only on success
    pub async fn process(&mut self, document: String) -> Result<&PaperDigest> {
        if document.trim().is_empty() {
            return Err(DigestError::Extraction(
                "no text extracted from document".to_string(),
            ));
        }

        let digest = self.pipeline.process(&document).await?;
        info!(digest_id = %digest.id, "Session ready for questions");

        let paper = self.paper.insert(LoadedPaper { document, digest });
        Ok(&paper.digest)
    }

    /// Answer a question about the processed paper
    pub async fn ask(&self, question: &str) -> Result<String> {
        let Some(paper) = &self.paper else {
            METRICS.record_question("not_ready");
            return Err(DigestError::NotReady);
        };

        if question.trim().is_empty() {
            METRICS.record_question("invalid");
            return Err(DigestError::InvalidInput);
        }

        let result = self
            .pipeline
            .answer(question, &paper.document, &paper.digest.full_summary)
            .await;
        METRICS.record_question(if result.is_ok() { "answered" } else { "error" });
        result
    }

    /// [`Self::ask`] with failures rendered as user-facing text
    pub async fn respond(&self, question: &str) -> String {
        match self.ask(question).await {
            Ok(answer) => answer,
            Err(e) => {
                if matches!(e, DigestError::Gateway(_)) {
                    warn!("Question failed: {}", e);
                }
                e.user_message()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::context::WordBasedEstimator;
    use crate::llm::RecordingGateway;
    use std::sync::Arc;

    fn session(gateway: Arc<RecordingGateway>) -> PaperSession {
        PaperSession::new(PaperPipeline::new(
            &Config::default(),
            gateway,
            Arc::new(WordBasedEstimator::default()),
        ))
    }

    #[tokio::test]
    async fn test_question_before_processing() {
        let gateway = Arc::new(RecordingGateway::new());
        let session = session(gateway.clone());

        assert!(!session.is_ready());
        assert!(matches!(session.ask("What is it about?").await, Err(DigestError::NotReady)));
        assert_eq!(
            session.respond("What is it about?").await,
            "Please upload and process a paper first."
        );
        assert_eq!(gateway.call_count(), 0);
    }

    #[tokio::test]
    async fn test_failed_processing_keeps_previous_state() {
        // section summaries are calls 0..=2 for a paper with all three sections
        let gateway = Arc::new(RecordingGateway::failing_at(1));
        let mut session = session(gateway.clone());

        let doc = "Abstract\nA.\nMethods\nB.\nResults\nC.".to_string();
        assert!(session.process(doc).await.is_err());
        assert!(!session.is_ready());
        assert_eq!(
            session.respond("anything").await,
            "Please upload and process a paper first."
        );
    }

    #[tokio::test]
    async fn test_empty_document_leaves_session_unready() {
        let gateway = Arc::new(RecordingGateway::new());
        let mut session = session(gateway.clone());

        for doc in ["", "  \n\t "] {
            let result = session.process(doc.to_string()).await;
            assert!(matches!(result, Err(DigestError::Extraction(_))));
        }
        assert!(!session.is_ready());
        assert!(session.digest().is_none());

        assert!(matches!(session.ask("what?").await, Err(DigestError::NotReady)));
        assert_eq!(
            session.respond("what?").await,
            "Please upload and process a paper first."
        );
        assert_eq!(gateway.call_count(), 0);
    }

    #[tokio::test]
    async fn test_empty_document_keeps_previous_paper() {
        let gateway = Arc::new(RecordingGateway::new());
        let mut session = session(gateway.clone());

        session.process("Abstract\nA.".to_string()).await.unwrap();
        let calls = gateway.call_count();

        assert!(session.process(String::new()).await.is_err());
        assert!(session.is_ready());
        assert_eq!(gateway.call_count(), calls);
    }

    #[tokio::test]
    async fn test_process_then_ask() {
        let gateway = Arc::new(RecordingGateway::new());
        let mut session = session(gateway.clone());

        let digest = session
            .process("Abstract\nTrust in chatbots.\nResults\nTrust rose.".to_string())
            .await
            .unwrap();
        assert_eq!(digest.full_summary, "summary 3");
        assert!(session.is_ready());

        assert_eq!(session.respond("  ").await, "Please ask a valid question.");
        assert_eq!(gateway.call_count(), 3);

        let answer = session.ask("Did trust rise?").await.unwrap();
        assert_eq!(answer, "summary 4");

        let prompt = gateway.calls()[3].user_prompt().unwrap().to_string();
        assert!(prompt.contains("summary 3\n\nTrust in chatbots.\n\nTrust rose."));
    }
}
