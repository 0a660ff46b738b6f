//! Unified diff formatting and stats for formatter previews.

use similar::{ChangeTag, TextDiff};

/// Lines of context around each hunk.
const CONTEXT_RADIUS: usize = 3;

/// Format a unified diff between the current and formatted text of `path`.
///
/// Returns an empty string when the texts are identical.
#[must_use]
pub fn format_unified_diff(path: &str, old_text: &str, new_text: &str) -> String {
    if old_text == new_text {
        return String::new();
    }

    let diff = TextDiff::from_lines(old_text, new_text);
    diff.unified_diff()
        .context_radius(CONTEXT_RADIUS)
        .header(&format!("a/{path}"), &format!("b/{path}"))
        .to_string()
}

/// Compute diff stats (additions, deletions) between two texts.
#[must_use]
pub fn compute_diff_stats(old_text: &str, new_text: &str) -> (u32, u32) {
    let diff = TextDiff::from_lines(old_text, new_text);

    let mut additions: u32 = 0;
    let mut deletions: u32 = 0;

    for change in diff.iter_all_changes() {
        match change.tag() {
            ChangeTag::Insert => additions += 1,
            ChangeTag::Delete => deletions += 1,
            ChangeTag::Equal => {}
        }
    }

    (additions, deletions)
}
