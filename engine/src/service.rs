//! DiagnosticsService — the single owner of document state, debounce timers
//! and published diagnostics.
//!
//! The host feeds [`DocumentEvent`]s in and drains [`Published`] results
//! out. Results for a document always come from its most recent text: a
//! burst of edits collapses into one compiler run after the quiet period.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use lazyscript_diagnostics::{Diagnostic, DiagnosticCollection};
use lazyscript_tools::Validator;

use crate::debounce::Debouncer;

/// Language identifier of documents this service validates.
pub const LANGUAGE_ID: &str = "lazyscript";

/// Document lifecycle notification from the editor host.
#[derive(Debug, Clone)]
pub enum DocumentEvent {
    Opened {
        path: PathBuf,
        language_id: String,
        text: String,
    },
    Changed {
        path: PathBuf,
        text: String,
    },
    Saved {
        path: PathBuf,
    },
    Closed {
        path: PathBuf,
    },
}

/// A document's freshly computed diagnostics, already stored in the
/// collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Published {
    pub path: PathBuf,
    pub diagnostics: Vec<Diagnostic>,
}

pub struct DiagnosticsService {
    validator: Validator,
    debounce: Duration,
    /// Latest text of every open LazyScript document.
    documents: HashMap<PathBuf, String>,
    debouncer: Debouncer<PathBuf>,
    collection: DiagnosticCollection,
}

impl DiagnosticsService {
    #[must_use]
    pub fn new(validator: Validator, debounce: Duration) -> Self {
        Self {
            validator,
            debounce,
            documents: HashMap::new(),
            debouncer: Debouncer::new(),
            collection: DiagnosticCollection::new(),
        }
    }

    /// Apply one host event. Must be called inside a tokio runtime.
    pub fn handle_event(&mut self, event: DocumentEvent) {
        match event {
            DocumentEvent::Opened {
                path,
                language_id,
                text,
            } => {
                if language_id != LANGUAGE_ID {
                    tracing::trace!(path = %path.display(), language_id = %language_id, "Ignoring document");
                    return;
                }
                self.documents.insert(path.clone(), text);
                self.debouncer.schedule(path, self.debounce);
            }
            DocumentEvent::Changed { path, text } => {
                let Some(current) = self.documents.get_mut(&path) else {
                    return;
                };
                *current = text;
                self.debouncer.schedule(path, self.debounce);
            }
            DocumentEvent::Saved { path } => {
                if self.documents.contains_key(&path) {
                    self.debouncer.schedule(path, self.debounce);
                }
            }
            DocumentEvent::Closed { path } => {
                self.debouncer.cancel(&path);
                self.documents.remove(&path);
                self.collection.delete(&path);
                tracing::debug!(path = %path.display(), "Document closed");
            }
        }
    }

    /// Wait until some document's quiet period has elapsed.
    ///
    /// Cancel-safe, so it can sit in a `select!` next to the host's event
    /// source. Follow up with [`publish`](Self::publish).
    pub async fn next_due(&mut self) -> PathBuf {
        loop {
            let path = self.debouncer.next_fired().await;
            if self.documents.contains_key(&path) {
                return path;
            }
        }
    }

    /// Validate `path`'s current text and replace its diagnostics.
    ///
    /// Tool failures are logged and publish an empty set. Returns `None` if
    /// the document is not open.
    pub async fn publish(&mut self, path: PathBuf) -> Option<Published> {
        let text = self.documents.get(&path)?;
        let diagnostics = match self.validator.validate(&path, text).await {
            Ok(diagnostics) => diagnostics,
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    compiler = %self.validator.compiler().program().display(),
                    "Validation failed: {e}"
                );
                Vec::new()
            }
        };

        tracing::debug!(
            path = %path.display(),
            count = diagnostics.len(),
            "Publishing diagnostics"
        );
        self.collection.set(path.clone(), diagnostics.clone());
        Some(Published { path, diagnostics })
    }

    /// [`next_due`](Self::next_due) followed by [`publish`](Self::publish).
    pub async fn next_publish(&mut self) -> Published {
        loop {
            let path = self.next_due().await;
            if let Some(published) = self.publish(path).await {
                return published;
            }
        }
    }

    #[must_use]
    pub fn collection(&self) -> &DiagnosticCollection {
        &self.collection
    }

    #[must_use]
    pub fn is_open(&self, path: &Path) -> bool {
        self.documents.contains_key(path)
    }

    /// Whether a validation is scheduled but not yet due for `path`.
    #[must_use]
    pub fn is_scheduled(&self, path: &Path) -> bool {
        self.debouncer.is_pending(&path.to_path_buf())
    }
}
