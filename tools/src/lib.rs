//! Compiler and formatter integration.
//!
//! Both tools take a file argument, so every run goes through a
//! [`ScratchFile`] holding the editor's current text. The compiler's output
//! is turned into diagnostics by [`Validator`]; the formatter's output
//! becomes a whole-document [`TextEdit`](lazyscript_diagnostics::TextEdit)
//! via [`Formatter`].

pub mod format;
pub mod process;
pub mod resolve;
pub mod scratch;
pub mod validate;

pub use format::{FormatError, Formatter};
pub use process::{ToolCommand, ToolError, ToolOutput, run_tool};
pub use resolve::resolve_tool;
pub use scratch::ScratchFile;
pub use validate::Validator;

use std::path::{Path, PathBuf};

use lazyscript_config::LazyscriptConfig;

/// The compiler and formatter, resolved once per workspace.
#[derive(Debug, Clone)]
pub struct Toolchain {
    pub validator: Validator,
    pub formatter: Formatter,
}

impl Toolchain {
    #[must_use]
    pub fn from_config(config: &LazyscriptConfig, workspace_folders: &[PathBuf]) -> Self {
        let compiler = ToolCommand::new(
            resolve_tool(&config.lazyscript_path, workspace_folders),
            config.lazyscript_args.clone(),
        );
        let formatter = ToolCommand::new(
            resolve_tool(&config.formatter_path, workspace_folders),
            config.formatter_args.clone(),
        );
        tracing::debug!(
            compiler = %compiler.program().display(),
            formatter = %formatter.program().display(),
            "Resolved toolchain"
        );
        Self {
            validator: Validator::new(compiler, config.tool_timeout()),
            formatter: Formatter::new(formatter, config.tool_timeout()),
        }
    }
}

/// Directory the tools run in: the document's own directory, when it exists.
pub(crate) fn document_dir(document: &Path) -> Option<&Path> {
    document
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty() && dir.is_dir())
}
