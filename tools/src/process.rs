//! External tool invocation.

use std::io;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;

/// A program plus the arguments placed before the file argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
    program: PathBuf,
    args: Vec<String>,
}

impl ToolCommand {
    #[must_use]
    pub fn new(program: impl Into<PathBuf>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    #[must_use]
    pub fn program(&self) -> &Path {
        &self.program
    }

    #[must_use]
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Short name for messages, e.g. `lazyscript_format`.
    #[must_use]
    pub fn display_name(&self) -> String {
        self.program.file_name().map_or_else(
            || self.program.display().to_string(),
            |name| name.to_string_lossy().into_owned(),
        )
    }
}

/// Everything a tool run wrote, regardless of how it exited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutput {
    /// Exit code; `None` when the process was terminated by a signal.
    pub status: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ToolOutput {
    #[must_use]
    pub fn success(&self) -> bool {
        self.status == Some(0)
    }

    /// stdout, a newline, then stderr.
    #[must_use]
    pub fn combined(&self) -> String {
        let mut out = String::with_capacity(self.stdout.len() + self.stderr.len() + 1);
        out.push_str(&self.stdout);
        out.push('\n');
        out.push_str(&self.stderr);
        out
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("failed to start {}: {source}", program.display())]
    Spawn { program: PathBuf, source: io::Error },
    #[error("{} did not finish within {}ms", program.display(), timeout.as_millis())]
    Timeout { program: PathBuf, timeout: Duration },
    #[error("failed to write scratch file: {0}")]
    Scratch(#[source] io::Error),
}

/// Run `command [args..] file` in `cwd` and capture its output.
///
/// A non-zero exit is not an error. The child is killed if the returned
/// future is dropped or the timeout elapses.
pub async fn run_tool(
    command: &ToolCommand,
    file: &Path,
    cwd: Option<&Path>,
    timeout: Duration,
) -> Result<ToolOutput, ToolError> {
    let mut cmd = Command::new(command.program());
    cmd.args(command.args())
        .arg(file)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    if let Some(cwd) = cwd {
        cmd.current_dir(cwd);
    }

    tracing::debug!(
        program = %command.program().display(),
        file = %file.display(),
        "Running tool"
    );

    let output = match tokio::time::timeout(timeout, cmd.output()).await {
        Ok(Ok(output)) => output,
        Ok(Err(source)) => {
            return Err(ToolError::Spawn {
                program: command.program().to_path_buf(),
                source,
            });
        }
        Err(_) => {
            return Err(ToolError::Timeout {
                program: command.program().to_path_buf(),
                timeout,
            });
        }
    };

    let output = ToolOutput {
        status: output.status.code(),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    };
    tracing::debug!(
        program = %command.program().display(),
        status = ?output.status,
        stdout_len = output.stdout.len(),
        stderr_len = output.stderr.len(),
        "Tool finished"
    );
    Ok(output)
}
