//! Academic paper digests
//!
//! Locates named sections (Abstract, Methods, Results, ...) in text extracted
//! from a paper, summarizes them, produces a whole-paper summary that stays
//! within a model's token budget by chunking and combining, and answers
//! questions from that summary plus keyword-matched paragraphs.

pub mod config;
pub mod context;
pub mod error;
pub mod extract;
pub mod llm;
pub mod logging;
pub mod metrics;
pub mod pipeline;
pub mod sections;
pub mod session;

pub use error::{DigestError, Result};

pub mod prelude {
    pub use crate::config::Config;
    pub use crate::context::{
        chunk_text, ContextRetriever, QuestionAnswerer, SummarizationEngine, SummaryPath,
        TokenEstimator,
    };
    pub use crate::error::{DigestError, Result};
    pub use crate::extract::{extract_document, TextExtractor};
    pub use crate::llm::{GenerationRequest, LlmGateway};
    pub use crate::pipeline::{PaperDigest, PaperPipeline, SectionSummary};
    pub use crate::sections::SectionLocator;
    pub use crate::session::PaperSession;
}
