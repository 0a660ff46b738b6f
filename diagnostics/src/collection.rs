//! Diagnostic collection — latest published diagnostics per document.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::types::Diagnostic;

/// Per-document diagnostics.
///
/// Publishing replaces a document's set wholesale; there is no merging with
/// what was there before.
#[derive(Debug, Default)]
pub struct DiagnosticCollection {
    data: HashMap<PathBuf, Vec<Diagnostic>>,
}

impl DiagnosticCollection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the diagnostics for `path`. An empty set clears the entry.
    pub fn set(&mut self, path: PathBuf, items: Vec<Diagnostic>) {
        if items.is_empty() {
            self.data.remove(&path);
        } else {
            self.data.insert(path, items);
        }
    }

    /// Forget `path` entirely (document closed).
    pub fn delete(&mut self, path: &Path) {
        self.data.remove(path);
    }

    #[must_use]
    pub fn get(&self, path: &Path) -> &[Diagnostic] {
        self.data.get(path).map(Vec::as_slice).unwrap_or_default()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Total diagnostic count across all documents.
    #[must_use]
    pub fn total_count(&self) -> usize {
        self.data.values().map(Vec::len).sum()
    }

    /// All documents with diagnostics, sorted by path.
    #[must_use]
    pub fn files(&self) -> Vec<(&Path, &[Diagnostic])> {
        let mut files: Vec<(&Path, &[Diagnostic])> = self
            .data
            .iter()
            .map(|(path, items)| (path.as_path(), items.as_slice()))
            .collect();
        files.sort_by(|a, b| a.0.cmp(b.0));
        files
    }

    /// Compact status like "E:3", empty when there is nothing to report.
    #[must_use]
    pub fn status_string(&self) -> String {
        if self.is_empty() {
            return String::new();
        }
        format!("E:{}", self.total_count())
    }
}
