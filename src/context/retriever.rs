//! Keyword-overlap paragraph retrieval for question answering

use std::collections::HashSet;
use tracing::debug;

/// A candidate paragraph and its overlap with the question
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoredParagraph<'a> {
    pub text: &'a str,
    /// Position among the document's non-empty lines
    pub index: usize,
    pub score: usize,
}

fn word_set(text: &str) -> HashSet<String> {
    text.split_whitespace().map(|w| w.to_lowercase()).collect()
}

/// Builds question context from a document summary plus matching paragraphs
#[derive(Debug, Clone)]
pub struct ContextRetriever {
    top_k: usize,
}

impl Default for ContextRetriever {
    fn default() -> Self {
        Self::new(5)
    }
}

impl ContextRetriever {
    pub fn new(top_k: usize) -> Self {
        Self { top_k }
    }

    /// Non-empty lines with a positive score, in document order
    pub fn score_paragraphs<'a>(&self, question: &str, document: &'a str) -> Vec<ScoredParagraph<'a>> {
        let query_words = word_set(question);

        document
            .lines()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .enumerate()
            .filter_map(|(index, text)| {
                let score = word_set(text).intersection(&query_words).count();
                (score > 0).then_some(ScoredParagraph { text, index, score })
            })
            .collect()
    }

    /// Highest-scoring paragraphs, ties going to the earlier one, returned in document order
    pub fn select<'a>(&self, question: &str, document: &'a str) -> Vec<ScoredParagraph<'a>> {
        let mut scored = self.score_paragraphs(question, document);

        // stable sort keeps document order among equal scores
        scored.sort_by(|a, b| b.score.cmp(&a.score));
        scored.truncate(self.top_k);
        scored.sort_by_key(|p| p.index);

        scored
    }

    /// Summary alone, or summary followed by the selected paragraphs, blank-line separated
    pub fn build_context(&self, question: &str, document: &str, summary: &str) -> String {
        let selected = self.select(question, document);
        debug!("Selected {} paragraphs for context", selected.len());

        if selected.is_empty() {
            return summary.to_string();
        }

        let mut parts = Vec::with_capacity(selected.len() + 1);
        parts.push(summary);
        parts.extend(selected.iter().map(|p| p.text));
        parts.join("\n\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = "Trust in chatbots\n\
                       We surveyed 200 users about trust levels.\n\
                       \n\
                       Humanoid design increased willingness to use.\n\
                       Unrelated closing line.";

    #[test]
    fn test_no_overlap_returns_summary() {
        let retriever = ContextRetriever::default();
        let context = retriever.build_context("zebra giraffe?", DOC, "The summary.");
        assert_eq!(context, "The summary.");
    }

    #[test]
    fn test_scores_are_case_insensitive_set_overlap() {
        let retriever = ContextRetriever::default();
        let scored = retriever.score_paragraphs("TRUST trust users", DOC);
        assert_eq!(scored.len(), 2);
        assert_eq!(scored[0].text, "Trust in chatbots");
        assert_eq!(scored[0].score, 1);
        assert_eq!(scored[1].score, 2);
        assert_eq!(scored[1].index, 1);
    }

    #[test]
    fn test_context_layout() {
        let retriever = ContextRetriever::default();
        let context = retriever.build_context("how did humanoid design affect trust", DOC, "S");
        assert_eq!(
            context,
            "S\n\nTrust in chatbots\n\nWe surveyed 200 users about trust levels.\n\nHumanoid design increased willingness to use."
        );
    }

    #[test]
    fn test_top_k_keeps_best_in_document_order() {
        let doc = "a\nb x\nc x y\nd\ne x y z\nf x";
        let retriever = ContextRetriever::new(2);
        let picked: Vec<&str> = retriever
            .select("x y z", doc)
            .iter()
            .map(|p| p.text)
            .collect();
        assert_eq!(picked, vec!["c x y", "e x y z"]);
    }

    #[test]
    fn test_ties_prefer_earlier_paragraphs() {
        let doc = "one k\ntwo k\nthree k\nfour k\nfive k\nsix k\nseven k";
        let retriever = ContextRetriever::default();
        let picked: Vec<usize> = retriever.select("k", doc).iter().map(|p| p.index).collect();
        assert_eq!(picked, vec![0, 1, 2, 3, 4]);
    }
}
