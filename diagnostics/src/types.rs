//! Public types shared by the extractor, the tool runners and the CLI.
//!
//! Coordinates are 0-indexed throughout. The compiler reports 1-indexed
//! `line.column` pairs; conversion happens once, inside the extractor.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

/// Severity level for a diagnostic.
///
/// The compiler only reports hard errors, so there is a single level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticSeverity {
    Error,
}

impl DiagnosticSeverity {
    #[must_use]
    pub fn is_error(self) -> bool {
        self == Self::Error
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Error => "error",
        }
    }
}

/// A 0-indexed (line, column) point in a document.
///
/// Columns count Unicode scalar values, not bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Position {
    #[must_use]
    pub const fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

/// Half-open span `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    #[must_use]
    pub const fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// Range covering an entire document of `line_count` lines.
    #[must_use]
    pub const fn whole_document(line_count: u32) -> Self {
        Self {
            start: Position::new(0, 0),
            end: Position::new(line_count, 0),
        }
    }
}

/// A single problem reported by the compiler for one document.
///
/// Fields are private; the extractor is the only producer outside tests.
/// A diagnostic never spans lines: its range is one column wide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    file_path: PathBuf,
    line: u32,
    column: u32,
    message: String,
    severity: DiagnosticSeverity,
}

impl Diagnostic {
    #[must_use]
    pub fn new(file_path: PathBuf, line: u32, column: u32, message: String) -> Self {
        Self {
            file_path,
            line,
            column,
            message,
            severity: DiagnosticSeverity::Error,
        }
    }

    #[must_use]
    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    /// 0-indexed line number.
    #[must_use]
    pub fn line(&self) -> u32 {
        self.line
    }

    /// 0-indexed column.
    #[must_use]
    pub fn column(&self) -> u32 {
        self.column
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[must_use]
    pub fn severity(&self) -> DiagnosticSeverity {
        self.severity
    }

    /// `[column, column + 1)` on `line`.
    #[must_use]
    pub fn range(&self) -> Range {
        Range::new(
            Position::new(self.line, self.column),
            Position::new(self.line, self.column.saturating_add(1)),
        )
    }

    /// Re-home the diagnostic onto another path, keeping its position.
    ///
    /// Used when the compiler was pointed at a scratch copy of a document.
    #[must_use]
    pub fn with_file_path(mut self, file_path: PathBuf) -> Self {
        self.file_path = file_path;
        self
    }
}

/// Formats as `path:line:col: severity: message` (1-indexed for display).
impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}: {}: {}",
            self.file_path.display(),
            u64::from(self.line) + 1,
            u64::from(self.column) + 1,
            self.severity.label(),
            self.message,
        )
    }
}

/// Replacement of a range of a document with new text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextEdit {
    pub range: Range,
    pub new_text: String,
}

impl TextEdit {
    /// Edit replacing everything in `text` with `new_text`.
    #[must_use]
    pub fn replace_all(text: &str, new_text: String) -> Self {
        Self {
            range: Range::whole_document(line_count(text)),
            new_text,
        }
    }

    /// Apply the edit to `text`.
    ///
    /// Positions past the end of a line clamp to the line end; lines past the
    /// end of the document clamp to the end of the text.
    #[must_use]
    pub fn apply(&self, text: &str) -> String {
        let start = byte_offset(text, self.range.start);
        let end = byte_offset(text, self.range.end).max(start);
        let mut out = String::with_capacity(text.len() - (end - start) + self.new_text.len());
        out.push_str(&text[..start]);
        out.push_str(&self.new_text);
        out.push_str(&text[end..]);
        out
    }
}

/// Number of lines as an editor counts them: a trailing newline opens a
/// final empty line, and the empty document has one line.
#[must_use]
pub fn line_count(text: &str) -> u32 {
    u32::try_from(text.split('\n').count()).unwrap_or(u32::MAX)
}

fn byte_offset(text: &str, pos: Position) -> usize {
    let mut line_start = 0;
    for _ in 0..pos.line {
        match text[line_start..].find('\n') {
            Some(i) => line_start += i + 1,
            None => return text.len(),
        }
    }
    let line_end = text[line_start..]
        .find('\n')
        .map_or(text.len(), |i| line_start + i);
    text[line_start..line_end]
        .char_indices()
        .nth(pos.column as usize)
        .map_or(line_end, |(i, _)| line_start + i)
}
