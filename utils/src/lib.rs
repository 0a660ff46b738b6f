//! Shared infrastructure utilities for the LazyScript tools.
//!
//! - **`atomic_write`**: crash-safe replacement of a source file's contents
//! - **`diff`**: unified diffs and change stats for formatter previews

pub mod atomic_write;
pub mod diff;

pub use atomic_write::replace_file_contents;
pub use diff::{compute_diff_stats, format_unified_diff};
