//! Shared integration-test helpers for invoking the `phaselight` binary.

#![allow(dead_code)]

use std::path::PathBuf;
use std::process::{Command, Output};

/// Runs the `phaselight` binary with `args` and waits for it to exit.
///
/// `PHASELIGHT_*` variables from the outer environment are removed so the
/// result depends only on the arguments.
pub fn run_phaselight(args: &[&str]) -> Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_phaselight"));
    for (key, _) in std::env::vars() {
        if key.starts_with("PHASELIGHT_") {
            cmd.env_remove(key);
        }
    }
    cmd.args(args).output().expect("failed to spawn phaselight")
}

/// Absolute path to a file under `tests/fixtures`.
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

/// Stdout as a lossy UTF-8 string.
pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

/// Stderr as a lossy UTF-8 string.
pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}
