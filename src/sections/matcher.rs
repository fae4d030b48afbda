//! Line-anchored heading matching

use crate::error::Result;
use regex::Regex;

/// Where a heading was found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeadingMatch {
    /// Byte offset of the heading's line start
    pub start: usize,
    /// Byte offset just past the heading text
    pub end: usize,
}

/// Finds headings that begin a line
///
/// Matching ignores case and requires a word boundary after the heading, so
/// `Methods` does not match `Methodsology`.
pub trait HeadingMatcher: Send + Sync {
    /// First heading at or after byte offset `from`
    fn find_at(&self, text: &str, from: usize) -> Option<HeadingMatch>;

    fn find(&self, text: &str) -> Option<HeadingMatch> {
        self.find_at(text, 0)
    }
}

/// Regex alternation over escaped variants, `None` when nothing is left to match
pub(crate) fn alternation<S: AsRef<str>>(variants: &[S]) -> Option<String> {
    let escaped: Vec<String> = variants
        .iter()
        .map(|v| v.as_ref().trim())
        .filter(|v| !v.is_empty())
        .map(regex::escape)
        .collect();

    if escaped.is_empty() {
        None
    } else {
        Some(escaped.join("|"))
    }
}

/// [`HeadingMatcher`] backed by the `regex` crate
#[derive(Debug, Clone)]
pub struct RegexHeadingMatcher {
    regex: Option<Regex>,
}

impl RegexHeadingMatcher {
    pub fn new<S: AsRef<str>>(variants: &[S]) -> Result<Self> {
        let regex = match alternation(variants) {
            Some(alt) => Some(Regex::new(&format!(r"(?im)^(?:{})\b", alt))?),
            None => None,
        };
        Ok(Self { regex })
    }
}

impl HeadingMatcher for RegexHeadingMatcher {
    fn find_at(&self, text: &str, from: usize) -> Option<HeadingMatch> {
        // find_at keeps the surrounding text as context, so `^` only matches real line starts
        let m = self.regex.as_ref()?.find_at(text, from)?;
        Some(HeadingMatch {
            start: m.start(),
            end: m.end(),
        })
    }
}
