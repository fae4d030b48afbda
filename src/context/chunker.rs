//! Word-budget chunking
//!
//! One unit per whitespace-delimited word. This is a consistent proxy for
//! token count, not an exact one; the summarizer keeps its per-chunk budget
//! well below the direct-summary threshold to absorb the difference.

/// Split `text` into consecutive chunks of at most `max_units` words
///
/// Words are rejoined with single spaces. Chunks never overlap and, taken in
/// order, reproduce the input's word sequence. A budget of zero is treated
/// as one word per chunk.
pub fn chunk_text(text: &str, max_units: usize) -> Vec<String> {
    let max_units = max_units.max(1);

    let mut chunks = Vec::new();
    let mut current: Vec<&str> = Vec::with_capacity(max_units.min(4096));
    let mut count = 0;

    for word in text.split_whitespace() {
        current.push(word);
        count += 1;
        if count >= max_units {
            chunks.push(current.join(" "));
            current.clear();
            count = 0;
        }
    }

    if !current.is_empty() {
        chunks.push(current.join(" "));
    }

    chunks
}
