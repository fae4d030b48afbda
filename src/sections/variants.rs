//! Heading variants per logical section

use std::collections::{BTreeMap, HashSet};

/// Built-in variant table
const BUILTIN: &[(&str, &[&str])] = &[
    ("Abstract", &["Abstract", "Summary", "Executive Summary"]),
    (
        "Methods",
        &["Methods", "Methodology", "Materials and Methods", "Research Methods"],
    ),
    ("Results", &["Results", "Findings", "Observations", "Outcomes"]),
];

/// Maps section names to the literal headings that may introduce them
///
/// Lookups ignore case. A name with no registered variants resolves to itself.
#[derive(Debug, Clone)]
pub struct SectionVariants {
    // keyed by lowercased section name
    table: BTreeMap<String, Vec<String>>,
}

impl Default for SectionVariants {
    fn default() -> Self {
        let mut variants = Self::empty();
        for (name, list) in BUILTIN {
            variants.register(name, list.iter().copied());
        }
        variants
    }
}

impl SectionVariants {
    /// A table with no registered sections
    pub fn empty() -> Self {
        Self {
            table: BTreeMap::new(),
        }
    }

    /// Built-in table with `extra` merged on top
    pub fn with_overrides(extra: &BTreeMap<String, Vec<String>>) -> Self {
        let mut variants = Self::default();
        for (name, list) in extra {
            variants.register(name, list.iter().map(String::as_str));
        }
        variants
    }

    /// Add variants for `name`; a new section always includes its own name
    pub fn register<'a>(&mut self, name: &str, extra: impl IntoIterator<Item = &'a str>) {
        let entry = self
            .table
            .entry(name.to_lowercase())
            .or_insert_with(|| vec![name.to_string()]);

        let mut seen: HashSet<String> = entry.iter().map(|v| v.to_lowercase()).collect();
        for variant in extra {
            let variant = variant.trim();
            if variant.is_empty() {
                continue;
            }
            if seen.insert(variant.to_lowercase()) {
                entry.push(variant.to_string());
            }
        }
    }

    /// Variants for `name`, falling back to the name itself
    pub fn resolve(&self, name: &str) -> Vec<String> {
        match self.table.get(&name.to_lowercase()) {
            Some(list) => list.clone(),
            None => vec![name.trim().to_string()],
        }
    }

    /// Whether `heading` is one of `name`'s variants
    pub fn is_variant_of(&self, name: &str, heading: &str) -> bool {
        let heading = heading.trim().to_lowercase();
        self.resolve(name)
            .iter()
            .any(|v| v.to_lowercase() == heading)
    }
}
