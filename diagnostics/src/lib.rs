//! Positional diagnostics for LazyScript documents.
//!
//! The compiler reports problems as `path:line.col[-endCol]: message` lines.
//! [`extract`] turns that text into [`Diagnostic`]s for one document, and
//! [`DiagnosticCollection`] holds the latest published set per document.

pub mod types;

mod collection;
mod extract;

pub use collection::DiagnosticCollection;
pub use extract::{extract, extract_relative_to};
pub use types::{Diagnostic, DiagnosticSeverity, Position, Range, TextEdit};
