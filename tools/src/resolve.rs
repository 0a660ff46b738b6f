//! Locating the compiler and formatter executables.

use std::path::{MAIN_SEPARATOR, PathBuf};

/// Resolve a configured tool to something spawnable.
///
/// Values containing a path separator are used as is. Bare names are looked
/// up as `<folder>/src/<name>` in each workspace folder (a checkout that
/// builds the tools in-tree), then on `PATH`. An unknown bare name is
/// returned unchanged so that spawning reports the failure.
#[must_use]
pub fn resolve_tool(configured: &str, workspace_folders: &[PathBuf]) -> PathBuf {
    if configured.contains('/') || configured.contains(MAIN_SEPARATOR) {
        return PathBuf::from(configured);
    }

    for folder in workspace_folders {
        let candidate = folder.join("src").join(configured);
        if candidate.is_file() {
            tracing::debug!(tool = configured, path = %candidate.display(), "Using workspace-local tool");
            return candidate;
        }
    }

    match which::which(configured) {
        Ok(path) => path,
        Err(e) => {
            tracing::debug!(tool = configured, "Tool not found on PATH: {e}");
            PathBuf::from(configured)
        }
    }
}
