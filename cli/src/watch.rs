//! `watch`: keep files open in a [`DiagnosticsService`] and feed it edits
//! detected by polling modification times.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::{Duration, SystemTime};

use anyhow::{Context as _, Result};
use lazyscript_diagnostics::DiagnosticCollection;
use lazyscript_engine::{DiagnosticsService, DocumentEvent, LANGUAGE_ID, Published};
use tokio::time::MissedTickBehavior;

use crate::Context;

/// Language id the host would assign to `path`.
fn language_id(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("ls") => LANGUAGE_ID,
        _ => "plaintext",
    }
}

fn modified(path: &Path) -> Option<SystemTime> {
    fs::metadata(path).and_then(|m| m.modified()).ok()
}

/// Last seen state of a watched file; `None` while it is missing.
struct Watched {
    modified: Option<SystemTime>,
}

pub(crate) async fn run(ctx: &Context, files: &[PathBuf], poll_ms: u64) -> Result<ExitCode> {
    let mut service = DiagnosticsService::new(ctx.toolchain.validator.clone(), ctx.config.debounce());
    let mut watched: HashMap<PathBuf, Watched> = HashMap::new();

    for file in files {
        let path = std::path::absolute(file)
            .with_context(|| format!("invalid path {}", file.display()))?;
        let text = fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        service.handle_event(DocumentEvent::Opened {
            path: path.clone(),
            language_id: language_id(&path).to_string(),
            text,
        });
        if !service.is_open(&path) {
            eprintln!("ignoring {} (not a LazyScript file)", path.display());
            continue;
        }
        watched.insert(path.clone(), Watched { modified: modified(&path) });
    }

    if watched.is_empty() {
        anyhow::bail!("nothing to watch");
    }

    let mut poll = tokio::time::interval(Duration::from_millis(poll_ms.max(1)));
    poll.set_missed_tick_behavior(MissedTickBehavior::Skip);

    // Lives across iterations; a new listener only sees later signals.
    let mut interrupt = std::pin::pin!(tokio::signal::ctrl_c());

    loop {
        tokio::select! {
            path = service.next_due() => {
                let published = tokio::select! {
                    published = service.publish(path) => published,
                    _ = &mut interrupt => break,
                };
                if let Some(published) = published {
                    print_published(&published);
                    print_status(service.collection());
                }
            }
            _ = poll.tick() => {
                for (path, state) in &mut watched {
                    if let Some(event) = poll_file(path, state) {
                        service.handle_event(event);
                    }
                }
            }
            _ = &mut interrupt => {
                tracing::debug!("Interrupted, stopping watch");
                break;
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Compare `path` against its last seen state and describe any change as an
/// editor event: edits become `Changed`, deletion `Closed`, reappearance
/// `Opened`.
fn poll_file(path: &Path, state: &mut Watched) -> Option<DocumentEvent> {
    let now = modified(path);
    if now == state.modified {
        return None;
    }
    let was_present = state.modified.is_some();
    state.modified = now;

    if now.is_none() {
        return Some(DocumentEvent::Closed {
            path: path.to_path_buf(),
        });
    }

    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!(path = %path.display(), "Failed to read changed file: {e}");
            return None;
        }
    };

    if was_present {
        Some(DocumentEvent::Changed {
            path: path.to_path_buf(),
            text,
        })
    } else {
        Some(DocumentEvent::Opened {
            path: path.to_path_buf(),
            language_id: LANGUAGE_ID.to_string(),
            text,
        })
    }
}

fn print_published(published: &Published) {
    let count = published.diagnostics.len();
    if count == 0 {
        println!("== {}: ok", published.path.display());
        return;
    }
    let noun = if count == 1 { "error" } else { "errors" };
    println!("== {}: {count} {noun}", published.path.display());
    for diagnostic in &published.diagnostics {
        println!("{diagnostic}");
    }
}

/// One-line summary of everything currently reported.
fn status_line(collection: &DiagnosticCollection) -> String {
    if collection.is_empty() {
        return "-- all clean".to_string();
    }
    let files = collection.files().len();
    let noun = if files == 1 { "file" } else { "files" };
    format!("-- {} in {files} {noun}", collection.status_string())
}

fn print_status(collection: &DiagnosticCollection) {
    println!("{}", status_line(collection));
}
