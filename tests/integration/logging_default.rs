//! Integration tests for default log-to-file behavior.
//!
//! Running the binary without --quiet writes logs under the platform state
//! directory and keeps stdout free for command output.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tempfile::TempDir;

use crate::integration::test_utils::isolated_command;

/// $XDG_STATE_HOME/prompt-bridge/prompt-bridge.log
fn expected_log_path(dir: &Path) -> PathBuf {
    dir.join("state").join("prompt-bridge").join("prompt-bridge.log")
}

#[test]
fn test_default_logging_writes_to_file() {
    let temp_dir = TempDir::new().unwrap();
    let output = isolated_command(&temp_dir)
        .arg("config")
        .stdin(Stdio::null())
        .output()
        .unwrap();

    assert!(
        output.status.success(),
        "config should succeed: stderr={:?}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        !stdout.contains("prompt-bridge starting"),
        "logs must not leak into stdout: {}",
        stdout
    );

    let log_path = expected_log_path(temp_dir.path());
    assert!(log_path.exists(), "log file should exist at {}", log_path.display());
    let content = fs::read_to_string(&log_path).unwrap();
    assert!(
        content.contains("prompt-bridge starting"),
        "log file should contain a startup message; got: {}",
        content.lines().next().unwrap_or("")
    );
}

#[test]
fn test_verbose_logging_mirrors_to_stderr_and_file() {
    let temp_dir = TempDir::new().unwrap();
    let output = isolated_command(&temp_dir)
        .args(["--verbose", "config"])
        .stdin(Stdio::null())
        .output()
        .unwrap();

    assert!(
        output.status.success(),
        "--verbose config should succeed: stderr={:?}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!stderr.trim().is_empty(), "verbose mode should emit logs to stderr");
    assert!(expected_log_path(temp_dir.path()).exists());
}

#[test]
fn test_quiet_writes_no_log_file() {
    let temp_dir = TempDir::new().unwrap();
    let output = isolated_command(&temp_dir)
        .args(["--quiet", "config"])
        .stdin(Stdio::null())
        .output()
        .unwrap();

    assert!(output.status.success());
    assert!(!expected_log_path(temp_dir.path()).exists());
}
