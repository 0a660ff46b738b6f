//! Config discovery through tool resolution, validation and the service.

use std::time::Duration;

use lazyscript_config::LazyscriptConfig;
use lazyscript_engine::{DiagnosticsService, DocumentEvent, LANGUAGE_ID};
use lazyscript_tools::{FormatError, Toolchain};

use crate::common::Workspace;

const WAIT: Duration = Duration::from_secs(10);

fn toolchain(ws: &Workspace) -> (LazyscriptConfig, Toolchain) {
    let config = LazyscriptConfig::discover(Some(ws.path())).unwrap();
    let toolchain = Toolchain::from_config(&config, &[ws.path().to_path_buf()]);
    (config, toolchain)
}

#[tokio::test]
async fn workspace_config_drives_validation() {
    let ws = Workspace::new();
    let (config, toolchain) = toolchain(&ws);
    assert_eq!(config.debounce(), Duration::from_millis(20));

    let document = ws.path().join("main.ls");
    let diags = toolchain
        .validator
        .validate(&document, "one\ntwo bad\n")
        .await
        .unwrap();

    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].file_path(), document);
    assert_eq!(diags[0].line(), 1);
}

#[tokio::test]
async fn workspace_config_drives_formatting() {
    let ws = Workspace::new();
    let (_, toolchain) = toolchain(&ws);
    let document = ws.path().join("main.ls");

    let edits = toolchain.formatter.format(&document, "a  \n").await.unwrap();
    assert_eq!(edits.len(), 1);
    assert_eq!(edits[0].new_text, "a\n");
    assert_eq!(edits[0].apply("a  \n"), "a\n");

    let err = toolchain.formatter.format(&document, "a!\n").await.unwrap_err();
    assert!(matches!(err, FormatError::Failed { status: Some(1), .. }));
    assert_eq!(err.to_string(), "unexpected '!'");
}

#[test]
fn in_tree_tool_is_preferred() {
    let ws = Workspace::with_config("lazyscript_path = \"lazyscript\"\n");
    std::fs::create_dir(ws.path().join("src")).unwrap();
    let local = ws.path().join("src").join("lazyscript");
    std::fs::write(&local, "").unwrap();

    let (_, toolchain) = toolchain(&ws);
    assert_eq!(toolchain.validator.compiler().program(), local);
}

#[tokio::test]
async fn service_publishes_latest_edit() {
    let ws = Workspace::new();
    let (config, toolchain) = toolchain(&ws);
    let mut service = DiagnosticsService::new(toolchain.validator, config.debounce());
    let path = ws.path().join("main.ls");

    service.handle_event(DocumentEvent::Opened {
        path: path.clone(),
        language_id: LANGUAGE_ID.to_string(),
        text: "bad\n".to_string(),
    });
    service.handle_event(DocumentEvent::Changed {
        path: path.clone(),
        text: "fine\nstill bad\nbad too\n".to_string(),
    });

    let published = tokio::time::timeout(WAIT, service.next_publish())
        .await
        .unwrap();
    assert_eq!(published.path, path);
    let lines: Vec<u32> = published.diagnostics.iter().map(|d| d.line()).collect();
    assert_eq!(lines, vec![1, 2]);
    assert_eq!(service.collection().status_string(), "E:2");

    service.handle_event(DocumentEvent::Closed { path: path.clone() });
    assert!(service.collection().is_empty());
}
