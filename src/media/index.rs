//! Lookup of extracted files by several spellings of their name.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::Result;

/// Drops every code point outside printable ASCII (32–126).
///
/// Export tools sometimes add invisible marks or re-encode accented names,
/// so this form is what both sides have the best chance of agreeing on.
pub fn printable_ascii(name: &str) -> String {
    name.chars().filter(|c| matches!(*c as u32, 32..=126)).collect()
}

/// Every extracted file, keyed by its base name as written, lowercased,
/// printable-ASCII-only, and printable-ASCII-only lowercased.
///
/// Keys are kept sorted, which makes the substring fallback in
/// [`find`](Self::find) deterministic.
#[derive(Debug, Clone, Default)]
pub struct AvailableFileIndex {
    files: BTreeMap<String, PathBuf>,
}

impl AvailableFileIndex {
    /// Creates an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Indexes every regular file below `root`.
    pub fn build(root: &Path) -> Result<Self> {
        let mut index = Self::new();
        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry = entry?;
            if entry.file_type().is_file() {
                index.insert(entry.into_path());
            }
        }
        Ok(index)
    }

    /// Adds `path` under all of its name variants.
    pub fn insert(&mut self, path: PathBuf) {
        let Some(name) = path.file_name().map(|n| n.to_string_lossy().into_owned()) else {
            return;
        };
        let clean = printable_ascii(&name);
        for key in [name.to_lowercase(), clean.to_lowercase(), clean, name] {
            if !key.is_empty() {
                self.files.insert(key, path.clone());
            }
        }
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Returns `true` if nothing was indexed.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Exact key lookup.
    pub fn get(&self, key: &str) -> Option<&Path> {
        self.files.get(key).map(PathBuf::as_path)
    }

    /// Locates the file a transcript reference points to.
    ///
    /// Tried in order: the reference as written, its printable-ASCII form,
    /// the lowercase of each, and finally the first key (in sorted order)
    /// that contains either lowercase form as a substring.
    pub fn find(&self, reference: &str) -> Option<&Path> {
        let clean = printable_ascii(reference);
        let lower = reference.to_lowercase();
        let clean_lower = clean.to_lowercase();

        [reference, clean.as_str(), lower.as_str(), clean_lower.as_str()]
            .into_iter()
            .filter(|key| !key.is_empty())
            .find_map(|key| self.get(key))
            .or_else(|| self.find_by_substring(&lower, &clean_lower))
    }

    fn find_by_substring(&self, lower: &str, clean_lower: &str) -> Option<&Path> {
        self.files
            .iter()
            .find(|(name, _)| {
                let name = name.to_lowercase();
                (!lower.is_empty() && name.contains(lower))
                    || (!clean_lower.is_empty() && name.contains(clean_lower))
            })
            .map(|(_, path)| path.as_path())
    }
}
