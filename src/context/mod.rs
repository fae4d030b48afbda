//! Summarization and question context
//!
//! Token estimation, word-budget chunking, direct and hierarchical
//! summarization, keyword-overlap retrieval and question answering.

pub mod answerer;
pub mod chunker;
pub mod prompts;
pub mod retriever;
pub mod summarizer;
pub mod token_estimator;

pub use answerer::QuestionAnswerer;
pub use chunker::chunk_text;
pub use retriever::{ContextRetriever, ScoredParagraph};
pub use summarizer::{SummarizationEngine, SummarizationOutcome, SummaryPath};
pub use token_estimator::{default_estimator, TiktokenEstimator, TokenEstimator, WordBasedEstimator};
