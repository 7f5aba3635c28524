//! End-to-end: the binary driven by a host speaking line-delimited JSON.

use std::io::{BufRead, BufReader, Write};
use std::process::Stdio;

use serde_json::{json, Value};
use tempfile::TempDir;

use crate::integration::test_utils::isolated_command;

fn read_event(reader: &mut impl BufRead) -> Value {
    let mut line = String::new();
    reader.read_line(&mut line).unwrap();
    serde_json::from_str(line.trim()).unwrap_or_else(|e| panic!("bad event line {:?}: {}", line, e))
}

#[test]
fn ask_is_answered_over_json_lines() {
    let dir = TempDir::new().unwrap();
    let mut child = isolated_command(&dir)
        .args(["--quiet", "--host", "json-lines", "ask", "Location?"])
        .args(["--kind", "resource", "--resource-type", "location"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();

    let mut stdin = child.stdin.take().unwrap();
    let mut stdout = BufReader::new(child.stdout.take().unwrap());

    let prompt = read_event(&mut stdout);
    assert_eq!(prompt["event"], "prompt");
    assert_eq!(prompt["message"], "Location?");
    assert_eq!(prompt["resourceType"], "location");
    let id = prompt["id"].as_str().unwrap().to_string();

    writeln!(stdin, "{}", json!({ "op": "pending" })).unwrap();
    let pending = read_event(&mut stdout);
    assert_eq!(pending["event"], "pending");
    assert_eq!(pending["prompts"][0]["id"], id.as_str());

    writeln!(stdin, "{}", json!({ "op": "submit", "id": id, "answer": "Sydney" })).unwrap();
    // The ack and the command output are written by different threads.
    let mut events = vec![read_event(&mut stdout), read_event(&mut stdout)];
    events.sort_by_key(|event| event["event"].as_str().unwrap_or_default().to_string());
    assert_eq!(
        events,
        vec![
            json!({ "event": "output", "text": "Sydney" }),
            json!({ "event": "result", "op": "submit", "id": id, "success": true }),
        ]
    );

    drop(stdin);
    assert!(child.wait().unwrap().success());
}

#[test]
fn cancelled_prompt_fails_the_command() {
    let dir = TempDir::new().unwrap();
    let mut child = isolated_command(&dir)
        .args(["--quiet", "--host", "json-lines", "ask", "Name?"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();

    let mut stdin = child.stdin.take().unwrap();
    let mut stdout = BufReader::new(child.stdout.take().unwrap());

    let prompt = read_event(&mut stdout);
    let id = prompt["id"].as_str().unwrap().to_string();
    writeln!(stdin, "{}", json!({ "op": "cancel", "id": id })).unwrap();
    drop(stdin);

    let output = child.wait_with_output().unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("cancelled"), "stderr was: {}", stderr);
}

#[test]
fn config_command_prints_effective_settings() {
    let dir = TempDir::new().unwrap();
    let output = isolated_command(&dir)
        .args(["--quiet", "--timeout-secs", "45", "config"])
        .stdin(Stdio::null())
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("timeout_secs = 45"), "stdout was: {}", stdout);
}

#[test]
fn closing_host_input_releases_pending_prompt() {
    let dir = TempDir::new().unwrap();
    let mut child = isolated_command(&dir)
        .args(["--quiet", "--host", "json-lines", "ask", "Name?"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();

    let stdin = child.stdin.take().unwrap();
    let mut stdout = BufReader::new(child.stdout.take().unwrap());
    assert_eq!(read_event(&mut stdout)["event"], "prompt");
    drop(stdin);

    let output = child.wait_with_output().unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("host input closed"), "stderr was: {}", stderr);
}
