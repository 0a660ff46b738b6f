//! `fmt`: run the formatter and print, diff, or write the result.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context as _, Result};
use lazyscript_tools::FormatError;
use lazyscript_utils::{compute_diff_stats, format_unified_diff, replace_file_contents};

use crate::Context;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Mode {
    Stdout,
    Check,
    Write,
}

pub(crate) async fn run(ctx: &Context, files: &[PathBuf], mode: Mode) -> Result<ExitCode> {
    let formatter = &ctx.toolchain.formatter;
    let name = formatter.formatter().display_name();
    let mut failed = false;
    let mut unformatted = false;

    for file in files {
        let text = fs::read_to_string(file)
            .with_context(|| format!("failed to read {}", file.display()))?;

        let edits = match formatter.format(file, &text).await {
            Ok(edits) => edits,
            Err(FormatError::Failed { message, .. }) => {
                eprintln!("{name}: {}: {message}", file.display());
                failed = true;
                continue;
            }
            Err(err @ FormatError::Tool(_)) => {
                return Err(err).with_context(|| format!("failed to format {}", file.display()));
            }
        };
        let formatted = edits.iter().fold(text.clone(), |acc, edit| edit.apply(&acc));

        match mode {
            Mode::Stdout => print!("{formatted}"),
            Mode::Check => {
                let diff = format_unified_diff(&file.display().to_string(), &text, &formatted);
                if !diff.is_empty() {
                    print!("{diff}");
                    unformatted = true;
                }
            }
            Mode::Write => {
                if formatted != text {
                    replace_file_contents(file, formatted.as_bytes())
                        .with_context(|| format!("failed to write {}", file.display()))?;
                    let (added, removed) = compute_diff_stats(&text, &formatted);
                    eprintln!("formatted {} (+{added} -{removed})", file.display());
                }
            }
        }
    }

    if failed || unformatted {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}
