/// Extension-based file classification.
///
/// Category ownership is decided by longest-suffix match over the flattened
/// extension table, so a compound extension (`.fastq.gz`) always wins over a
/// shorter tail of itself (`.gz`) no matter which category declares which.
/// Matching is case-insensitive; a file whose name matches no configured
/// extension is simply not classified.
use crate::config::Category;
use std::collections::HashMap;

/// Flattened extension → category lookup, longest extension first.
///
/// Built once per scan from the configured categories.  When two categories
/// declare the same extension, the later declaration owns it.
#[derive(Debug, Clone)]
pub struct ExtensionMap {
    /// `(lower-cased extension, category name)` sorted by extension length
    /// descending; equal lengths order by extension for determinism.
    entries: Vec<(String, String)>,
}

impl ExtensionMap {
    pub fn new(categories: &[Category]) -> Self {
        let mut by_extension: HashMap<String, String> = HashMap::new();
        for category in categories {
            for ext in &category.extensions {
                by_extension.insert(ext.to_lowercase(), category.name.clone());
            }
        }

        let mut entries: Vec<(String, String)> = by_extension.into_iter().collect();
        entries.sort_by(|(a, _), (b, _)| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        Self { entries }
    }

    /// The owning category for a file name, or `None` when no configured
    /// extension matches.  Hidden names never classify.
    pub fn classify(&self, file_name: &str) -> Option<&str> {
        if is_hidden(file_name) {
            return None;
        }
        self.entries
            .iter()
            .find(|(ext, _)| has_suffix_ci(file_name, ext))
            .map(|(_, category)| category.as_str())
    }

    /// The union of configured extensions, longest first — the same match
    /// order used when stripping extensions off file names.
    pub fn extensions(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(ext, _)| ext.as_str())
    }
}

/// Hidden files (leading dot) are excluded before any classification attempt.
pub fn is_hidden(file_name: &str) -> bool {
    file_name.starts_with('.')
}

/// ASCII case-insensitive suffix test without allocating a lowered copy.
pub(crate) fn has_suffix_ci(name: &str, suffix: &str) -> bool {
    name.len() >= suffix.len()
        && name.is_char_boundary(name.len() - suffix.len())
        && name[name.len() - suffix.len()..].eq_ignore_ascii_case(suffix)
}
