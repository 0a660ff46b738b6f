//! `check`: compile each file once and print its diagnostics.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context as _, Result};
use lazyscript_diagnostics::Diagnostic;

use crate::Context;

pub(crate) async fn run(ctx: &Context, files: &[PathBuf], json: bool) -> Result<ExitCode> {
    let mut all: Vec<Diagnostic> = Vec::new();

    for file in files {
        let text = fs::read_to_string(file)
            .with_context(|| format!("failed to read {}", file.display()))?;
        let diagnostics = ctx
            .toolchain
            .validator
            .validate(file, &text)
            .await
            .with_context(|| format!("failed to check {}", file.display()))?;
        all.extend(diagnostics);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&all)?);
    } else {
        for diagnostic in &all {
            println!("{diagnostic}");
        }
    }

    if !all.iter().any(|d| d.severity().is_error()) {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}
