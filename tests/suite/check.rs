//! `lazyscript-tools check` end to end.

use crate::common::{Workspace, stderr, stdout};

#[test]
fn reports_errors_and_fails() {
    let ws = Workspace::new();
    ws.write("main.ls", "main = 1\nbad thing\nok\nbad again\n");

    let output = ws.run(&["check", "main.ls"]);

    assert_eq!(output.status.code(), Some(1), "stderr: {}", stderr(&output));
    assert_eq!(
        stdout(&output),
        "main.ls:2:1: error: bad: bad thing\nmain.ls:4:1: error: bad: bad again\n"
    );
}

#[test]
fn clean_file_succeeds_quietly() {
    let ws = Workspace::new();
    ws.write("main.ls", "main = 1\n");

    let output = ws.run(&["check", "main.ls"]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).is_empty());
}

#[test]
fn json_output_lists_diagnostics() {
    let ws = Workspace::new();
    ws.write("a.ls", "bad\n");
    ws.write("b.ls", "fine\n");

    let output = ws.run(&["check", "--json", "a.ls", "b.ls"]);

    assert_eq!(output.status.code(), Some(1));
    let parsed: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    let items = parsed.as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["file_path"], "a.ls");
    assert_eq!(items[0]["line"], 0);
    assert_eq!(items[0]["column"], 0);
    assert_eq!(items[0]["message"], "bad: bad");
    assert_eq!(items[0]["severity"], "error");
}

#[test]
fn diagnostics_for_other_files_are_dropped() {
    let ws = Workspace::with_tools(
        r#"echo "prelude.ls:1.1: shadowed"; echo "$1:1.5: real""#,
        "cat \"$1\"",
    );
    ws.write("main.ls", "main\n");

    let output = ws.run(&["check", "main.ls"]);

    assert_eq!(stdout(&output), "main.ls:1:5: error: real\n");
}

#[test]
fn missing_compiler_is_an_error() {
    let ws = Workspace::with_config("lazyscript_path = \"/nonexistent/lazyscript\"\n");
    ws.write("main.ls", "main\n");

    let output = ws.run(&["check", "main.ls"]);

    assert_eq!(output.status.code(), Some(2));
    let err = stderr(&output);
    assert!(err.starts_with("error: failed to check main.ls"), "{err}");
    assert!(err.contains("/nonexistent/lazyscript"), "{err}");
}

#[test]
fn unreadable_input_is_an_error() {
    let ws = Workspace::new();

    let output = ws.run(&["check", "missing.ls"]);

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("failed to read missing.ls"));
}
