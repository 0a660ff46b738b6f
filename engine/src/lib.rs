//! Event-driven validation for open LazyScript documents.
//!
//! The editor host reports document lifecycle events to a
//! [`DiagnosticsService`]. Edits are debounced per document; when a
//! document has been quiet long enough the compiler runs on its latest text
//! and the result replaces that document's diagnostics.

mod debounce;
mod service;

pub use debounce::Debouncer;
pub use service::{DiagnosticsService, DocumentEvent, LANGUAGE_ID, Published};
