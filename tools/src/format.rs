//! Formatter-backed document formatting.

use std::path::Path;
use std::time::Duration;

use lazyscript_diagnostics::TextEdit;

use crate::document_dir;
use crate::process::{ToolCommand, ToolError, run_tool};
use crate::scratch::ScratchFile;

#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    #[error(transparent)]
    Tool(#[from] ToolError),
    /// The formatter ran but rejected the input.
    #[error("{message}")]
    Failed {
        status: Option<i32>,
        message: String,
    },
}

#[derive(Debug, Clone)]
pub struct Formatter {
    formatter: ToolCommand,
    timeout: Duration,
}

impl Formatter {
    #[must_use]
    pub fn new(formatter: ToolCommand, timeout: Duration) -> Self {
        Self { formatter, timeout }
    }

    #[must_use]
    pub fn formatter(&self) -> &ToolCommand {
        &self.formatter
    }

    /// Format `text` (the contents of `document`).
    ///
    /// On success returns a single edit replacing the whole document with
    /// the formatter's stdout, line endings normalized to `\n`.
    pub async fn format(&self, document: &Path, text: &str) -> Result<Vec<TextEdit>, FormatError> {
        let scratch = ScratchFile::create(text).map_err(ToolError::Scratch)?;
        let output = run_tool(
            &self.formatter,
            scratch.path(),
            document_dir(document),
            self.timeout,
        )
        .await?;

        if !output.success() {
            let message = failure_message(output.status, &output.stdout, &output.stderr);
            tracing::debug!(
                document = %document.display(),
                status = ?output.status,
                "Formatter rejected document"
            );
            return Err(FormatError::Failed {
                status: output.status,
                message,
            });
        }

        let formatted = output.stdout.replace("\r\n", "\n");
        Ok(vec![TextEdit::replace_all(text, formatted)])
    }
}

/// stderr, else stdout, else the exit status; trimmed.
fn failure_message(status: Option<i32>, stdout: &str, stderr: &str) -> String {
    let raw = if !stderr.is_empty() {
        stderr.to_string()
    } else if !stdout.is_empty() {
        stdout.to_string()
    } else {
        match status {
            Some(code) => format!("Formatter exited with code {code}"),
            None => "Formatter terminated by signal".to_string(),
        }
    };
    raw.trim().to_string()
}
