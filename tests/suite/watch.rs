//! `lazyscript-tools watch` end to end.

use std::fs;
use std::io::{BufRead, BufReader};
use std::process::{Child, Command};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use crate::common::Workspace;

const WAIT: Duration = Duration::from_secs(10);

/// Lines of a child's stdout, read on a background thread.
struct Lines {
    rx: mpsc::Receiver<String>,
}

impl Lines {
    fn new(child: &mut Child) -> Self {
        let stdout = child.stdout.take().expect("piped stdout");
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            for line in BufReader::new(stdout).lines() {
                let Ok(line) = line else { break };
                if tx.send(line).is_err() {
                    break;
                }
            }
        });
        Self { rx }
    }

    fn next_line(&self) -> String {
        self.rx.recv_timeout(WAIT).expect("watch output")
    }

    /// Skip ahead to the next published block header.
    fn next_header(&self) -> String {
        loop {
            let line = self.next_line();
            if line.starts_with("== ") {
                return line;
            }
        }
    }
}

fn interrupt(child: &Child) {
    let status = Command::new("kill")
        .args(["-INT", &child.id().to_string()])
        .status()
        .expect("run kill");
    assert!(status.success());
}

fn wait_for_exit(child: &mut Child) -> std::process::ExitStatus {
    let deadline = Instant::now() + WAIT;
    loop {
        if let Some(status) = child.try_wait().expect("try_wait") {
            return status;
        }
        if Instant::now() > deadline {
            let _ = child.kill();
            panic!("watch did not exit after SIGINT");
        }
        thread::sleep(Duration::from_millis(20));
    }
}

#[test]
fn republishes_on_change_and_stops_on_interrupt() {
    let ws = Workspace::new();
    let path = ws.write("main.ls", "main = 1\nbad one\n");
    let shown = fs::canonicalize(&path).unwrap().display().to_string();

    let mut child = ws.spawn(&["watch", "--poll-ms", "20", "main.ls"]);
    let lines = Lines::new(&mut child);

    assert_eq!(lines.next_header(), format!("== {shown}: 1 error"));
    assert_eq!(lines.next_line(), format!("{shown}:2:1: error: bad: bad one"));
    assert_eq!(lines.next_line(), "-- E:1 in 1 file");

    fs::write(&path, "main = 1\n").unwrap();
    assert_eq!(lines.next_header(), format!("== {shown}: ok"));
    assert_eq!(lines.next_line(), "-- all clean");

    // Deletion closes the document; recreating it opens it again.
    fs::remove_file(&path).unwrap();
    thread::sleep(Duration::from_millis(200));
    fs::write(&path, "bad\nbad\n").unwrap();
    assert_eq!(lines.next_header(), format!("== {shown}: 2 errors"));
    assert_eq!(lines.next_line(), format!("{shown}:1:1: error: bad: bad"));
    assert_eq!(lines.next_line(), format!("{shown}:2:1: error: bad: bad"));
    assert_eq!(lines.next_line(), "-- E:2 in 1 file");

    interrupt(&child);
    let status = wait_for_exit(&mut child);
    assert!(status.success(), "exit status: {status:?}");
}

#[test]
fn interrupt_during_slow_compile_exits_promptly() {
    let ws = Workspace::with_tools(r#"touch started; exec sleep 30"#, "cat \"$1\"");
    ws.write("main.ls", "main = 1\n");
    let marker = ws.path().join("started");

    let mut child = ws.spawn(&["watch", "--poll-ms", "20", "main.ls"]);
    let deadline = Instant::now() + WAIT;
    while !marker.exists() {
        assert!(Instant::now() < deadline, "compiler never started");
        thread::sleep(Duration::from_millis(20));
    }

    let started = Instant::now();
    interrupt(&child);
    let status = wait_for_exit(&mut child);
    assert!(status.success(), "exit status: {status:?}");
    assert!(started.elapsed() < Duration::from_secs(5));
}
