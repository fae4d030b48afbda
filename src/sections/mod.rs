//! Section location in unstructured paper text
//!
//! Sections are discovered, not stored: a section name resolves to a set of
//! heading variants, and the section's span runs from the first line that
//! starts with one of them up to the next boundary heading.

pub mod locator;
pub mod matcher;
pub mod variants;

pub use locator::SectionLocator;
pub use matcher::{HeadingMatch, HeadingMatcher, RegexHeadingMatcher};
pub use variants::SectionVariants;

/// Headings that end a section unless configured otherwise
pub const DEFAULT_BOUNDARIES: &[&str] = &[
    "Introduction",
    "Methods",
    "Results",
    "Discussion",
    "Conclusion",
    "References",
];
