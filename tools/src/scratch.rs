//! Scoped scratch copies of editor buffers.

use std::io::{self, Write};
use std::path::Path;

use tempfile::NamedTempFile;

const PREFIX: &str = "lazyscript-";
const SUFFIX: &str = ".ls";

/// A temp file holding a document's current text, deleted on drop.
///
/// The tools read files rather than stdin, and the editor buffer may be
/// unsaved, so each run gets a fresh copy in the system temp directory.
#[derive(Debug)]
pub struct ScratchFile {
    file: NamedTempFile,
}

impl ScratchFile {
    pub fn create(text: &str) -> io::Result<Self> {
        let mut file = tempfile::Builder::new()
            .prefix(PREFIX)
            .suffix(SUFFIX)
            .tempfile()?;
        file.write_all(text.as_bytes())?;
        file.flush()?;
        Ok(Self { file })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        self.file.path()
    }
}
