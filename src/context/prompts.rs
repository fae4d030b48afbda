//! Prompt templates

pub const SECTION_SYSTEM: &str = "You are a helpful assistant that summarizes academic text.";

pub const PAPER_SYSTEM: &str = "You are a helpful assistant that summarizes academic papers.";

pub const ANSWER_SYSTEM: &str =
    "You are a helpful assistant that accurately answers questions about academic paper content.";

pub fn section(label: &str, text: &str) -> String {
    format!(
        "Please provide a concise summary of the following {} section:\n\n{}\n\nSummary:",
        label, text
    )
}

pub fn whole_paper(text: &str) -> String {
    format!(
        "Please provide a concise summary of the entire paper:\n\n{}\n\nSummary:",
        text
    )
}

pub fn chunk(text: &str) -> String {
    format!("Summarize the following part of a paper:\n\n{}\n\nSummary:", text)
}

pub fn combine(chunk_summaries: &str) -> String {
    format!(
        "Combine and summarize these chunk summaries into a final concise summary:\n\n{}\n\nFinal Summary:",
        chunk_summaries
    )
}

pub fn answer(context: &str, question: &str) -> String {
    format!(
        "Use the following paper summary and context excerpts:\n\n{}\n\nQuestion: {}\n\nPlease answer concisely:",
        context, question
    )
}
