//! Compiler-backed validation of a document.

use std::path::Path;
use std::time::Duration;

use lazyscript_diagnostics::{Diagnostic, extract, extract_relative_to};

use crate::document_dir;
use crate::process::{ToolCommand, ToolError, run_tool};
use crate::scratch::ScratchFile;

#[derive(Debug, Clone)]
pub struct Validator {
    compiler: ToolCommand,
    timeout: Duration,
}

impl Validator {
    #[must_use]
    pub fn new(compiler: ToolCommand, timeout: Duration) -> Self {
        Self { compiler, timeout }
    }

    #[must_use]
    pub fn compiler(&self) -> &ToolCommand {
        &self.compiler
    }

    /// Compile `text` as the contents of `document` and return its diagnostics.
    ///
    /// The compiler sees a scratch copy, so it reports the scratch path;
    /// diagnostics for that path are re-homed onto `document`. Reports for
    /// any other file (imports, preludes) are dropped.
    pub async fn validate(&self, document: &Path, text: &str) -> Result<Vec<Diagnostic>, ToolError> {
        let scratch = ScratchFile::create(text).map_err(ToolError::Scratch)?;
        let cwd = document_dir(document);

        let output = run_tool(&self.compiler, scratch.path(), cwd, self.timeout).await?;
        let combined = output.combined();

        let diagnostics = match cwd {
            Some(cwd) => extract_relative_to(&combined, scratch.path(), cwd),
            None => extract(&combined, scratch.path()),
        };

        tracing::debug!(
            document = %document.display(),
            count = diagnostics.len(),
            "Validated document"
        );

        Ok(diagnostics
            .into_iter()
            .map(|d| d.with_file_path(document.to_path_buf()))
            .collect())
    }
}
