//! Shared test utilities and fixtures
//!
//! Stand-in tools are `sh -c <script> sh`, so the file argument arrives as
//! `$1` and nothing needs to be made executable.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Output, Stdio};

use tempfile::TempDir;

/// Reports every line containing `bad` as an error at column 1.
pub const COMPILER: &str =
    r#"grep -n bad "$1" | while IFS=: read n rest; do echo "$1:$n.1: bad: $rest"; done"#;

/// Prints its input with trailing spaces stripped; rejects files containing `!`.
pub const FORMATTER: &str =
    r#"if grep -q '!' "$1"; then echo "unexpected '!'" >&2; exit 1; fi; sed 's/ *$//' "$1""#;

/// A workspace folder with a `.lazyscript.toml` pointing at the stand-in tools.
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        Self::with_tools(COMPILER, FORMATTER)
    }

    pub fn with_tools(compiler: &str, formatter: &str) -> Self {
        Self::with_config(&format!(
            "lazyscript_path = \"sh\"\n\
             lazyscript_args = [\"-c\", '''{compiler}''', \"sh\"]\n\
             formatter_path = \"sh\"\n\
             formatter_args = [\"-c\", '''{formatter}''', \"sh\"]\n\
             tool_timeout_secs = 10\n\
             \n\
             [diagnostics]\n\
             debounce_ms = 20\n"
        ))
    }

    pub fn with_config(config: &str) -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join(".lazyscript.toml"), config).expect("write config");
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn write(&self, name: &str, text: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        fs::write(&path, text).expect("write source");
        path
    }

    pub fn read(&self, name: &str) -> String {
        fs::read_to_string(self.dir.path().join(name)).expect("read source")
    }

    fn command(&self, args: &[&str]) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_lazyscript-tools"));
        cmd.current_dir(self.dir.path())
            .arg("-w")
            .arg(self.dir.path())
            .args(args)
            .env("RUST_LOG", "off");
        cmd
    }

    /// Run the CLI with this workspace as cwd and `-w` folder.
    pub fn run(&self, args: &[&str]) -> Output {
        self.command(args).output().expect("run lazyscript-tools")
    }

    /// Start the CLI with stdout piped, for long-running commands.
    pub fn spawn(&self, args: &[&str]) -> Child {
        self.command(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .expect("spawn lazyscript-tools")
    }
}

pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}
