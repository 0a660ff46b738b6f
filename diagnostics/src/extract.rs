//! Compiler output → [`Diagnostic`]s for the active document.

use std::path::{Component, Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;

use crate::types::Diagnostic;

/// `<file>:<line>.<col>[-<endCol>]: <message>`, one per line.
///
/// The file part is the shortest prefix that completes a match, so Windows
/// drive letters and colons inside the message both survive. CRLF mode keeps
/// `\r` out of the captured message.
const DIAGNOSTIC_LINE: &str = r"(?mR)^(.*?):([0-9]+)\.([0-9]+)(?:-[0-9]+)?:[ \t]+(.*)$";

static DIAGNOSTIC_LINE_RE: OnceLock<Regex> = OnceLock::new();

fn diagnostic_line_re() -> &'static Regex {
    DIAGNOSTIC_LINE_RE
        .get_or_init(|| Regex::new(DIAGNOSTIC_LINE).expect("valid diagnostic line regex"))
}

/// Extract diagnostics for `active_document` from raw tool output.
///
/// Relative paths (in the output and `active_document` alike) resolve
/// against the process working directory.
#[must_use]
pub fn extract(output: &str, active_document: &Path) -> Vec<Diagnostic> {
    let cwd = std::env::current_dir().ok();
    extract_with_base(output, active_document, cwd.as_deref())
}

/// Like [`extract`], resolving relative paths against `base_dir`, which
/// should be the working directory the tool ran in.
#[must_use]
pub fn extract_relative_to(output: &str, active_document: &Path, base_dir: &Path) -> Vec<Diagnostic> {
    extract_with_base(output, active_document, Some(base_dir))
}

fn extract_with_base(output: &str, active_document: &Path, base: Option<&Path>) -> Vec<Diagnostic> {
    let active = resolve(active_document, base);
    let mut diagnostics = Vec::new();

    for caps in diagnostic_line_re().captures_iter(output) {
        let file = &caps[1];
        let line = one_based_to_zero(&caps[2]);
        let column = one_based_to_zero(&caps[3]);
        let message = &caps[4];

        // Unresolvable paths on either side keep the diagnostic.
        if let (Some(active), Some(reported)) = (active.as_deref(), resolve(Path::new(file), base))
            && reported.as_path() != active
        {
            tracing::trace!(file, line, "Skipping diagnostic for another file");
            continue;
        }

        diagnostics.push(Diagnostic::new(
            PathBuf::from(file),
            line,
            column,
            message.to_string(),
        ));
    }

    diagnostics
}

/// Digits are guaranteed by the regex; overflow saturates.
fn one_based_to_zero(digits: &str) -> u32 {
    digits.parse::<u32>().unwrap_or(u32::MAX).saturating_sub(1)
}

/// Absolute, lexically normalized form of `path`.
///
/// `None` when the path is empty, or relative with no base to anchor it.
fn resolve(path: &Path, base: Option<&Path>) -> Option<PathBuf> {
    if path.as_os_str().is_empty() {
        return None;
    }
    if path.is_absolute() {
        return Some(normalize_path(path));
    }
    base.map(|base| normalize_path(&base.join(path)))
}

fn normalize_path(path: &Path) -> PathBuf {
    let mut out: Vec<Component<'_>> = Vec::new();
    for c in path.components() {
        match c {
            Component::CurDir => {}
            Component::ParentDir => match out.last() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => out.push(c),
            },
            other => out.push(other),
        }
    }
    out.iter().collect()
}
