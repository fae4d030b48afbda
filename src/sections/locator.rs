//! Section span extraction

use super::matcher::{alternation, HeadingMatcher, RegexHeadingMatcher};
use super::variants::SectionVariants;
use super::DEFAULT_BOUNDARIES;
use crate::config::SectionsConfig;
use crate::error::Result;
use crate::metrics::METRICS;
use regex::Regex;
use tracing::{debug, warn};

/// Locates named sections in extracted paper text
#[derive(Debug, Clone)]
pub struct SectionLocator {
    variants: SectionVariants,
    boundaries: Vec<String>,
}

impl Default for SectionLocator {
    fn default() -> Self {
        Self::new(
            SectionVariants::default(),
            DEFAULT_BOUNDARIES.iter().map(|s| s.to_string()).collect(),
        )
    }
}

impl SectionLocator {
    pub fn new(variants: SectionVariants, boundaries: Vec<String>) -> Self {
        Self {
            variants,
            boundaries,
        }
    }

    pub fn from_config(config: &SectionsConfig) -> Self {
        Self::new(
            SectionVariants::with_overrides(&config.variants),
            config.boundaries.clone(),
        )
    }

    pub fn variants(&self) -> &SectionVariants {
        &self.variants
    }

    /// Text of `section`, using the configured boundary headings
    ///
    /// Returns an empty string when no heading for the section exists.
    pub fn locate<'a>(&self, document: &'a str, section: &str) -> Result<&'a str> {
        self.locate_with_boundaries(document, section, &self.boundaries)
    }

    /// Text of `section`, ending at the first line that starts with one of `boundaries`
    pub fn locate_with_boundaries<'a, S: AsRef<str>>(
        &self,
        document: &'a str,
        section: &str,
        boundaries: &[S],
    ) -> Result<&'a str> {
        let variants = self.variants.resolve(section);

        // A section must never be closed by its own heading
        let boundaries: Vec<&str> = boundaries
            .iter()
            .map(|b| b.as_ref())
            .filter(|b| !variants.iter().any(|v| v.eq_ignore_ascii_case(b.trim())))
            .collect();

        let span = match span_pattern(&variants, &boundaries) {
            Some(Ok(pattern)) => primary_span(&pattern, document),
            Some(Err(e)) => {
                warn!("Combined section pattern for {} unusable: {}", section, e);
                None
            }
            None => return Ok(""),
        };

        let span = match span {
            Some(span) => span,
            None => fallback_span(&variants, &boundaries, document)?,
        };

        let span = span.trim();
        METRICS.record_section(!span.is_empty());
        debug!("Located section {}: {} bytes", section, span.len());

        Ok(span)
    }
}

/// Heading, then everything lazily up to a boundary line or end of input.
/// The `end` group marks where the span stops.
fn span_pattern(variants: &[String], boundaries: &[&str]) -> Option<std::result::Result<Regex, regex::Error>> {
    let heads = alternation(variants)?;
    let pattern = match alternation(boundaries) {
        Some(bounds) => format!(r"(?ims)^(?:{})\b.*?(?P<end>^(?:{})\b|\z)", heads, bounds),
        None => format!(r"(?ims)^(?:{})\b.*?(?P<end>\z)", heads),
    };
    Some(Regex::new(&pattern))
}

fn primary_span<'a>(pattern: &Regex, document: &'a str) -> Option<&'a str> {
    let caps = pattern.captures(document)?;
    let start = caps.get(0)?.start();
    let end = caps.name("end")?.start();
    Some(&document[start..end])
}

/// Find the heading first, then search for a boundary after it
fn fallback_span<'a>(variants: &[String], boundaries: &[&str], document: &'a str) -> Result<&'a str> {
    let heading = match RegexHeadingMatcher::new(variants)?.find(document) {
        Some(m) => m,
        None => return Ok(""),
    };

    let end = RegexHeadingMatcher::new(boundaries)?
        .find_at(document, heading.end)
        .map(|m| m.start)
        .unwrap_or(document.len());

    Ok(&document[heading.start..end])
}
