#![allow(dead_code)]

use std::path::Path;
use std::process::{Command, Output};

/// Run the CLI against an isolated data directory.
///
/// The endpoint and token variables are cleared so the host environment
/// cannot leak into a test.
pub fn run_cli(args: &[&str], data_dir: &Path) -> Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_fieldsync"));
    cmd.args(args);
    cmd.env("FIELDSYNC_DATA_DIR", data_dir);
    cmd.env_remove("FIELDSYNC_ENDPOINT");
    cmd.env_remove("FIELDSYNC_TOKEN");
    cmd.env_remove("RUST_LOG");
    cmd.output().expect("Failed to execute CLI")
}

/// Run the CLI and expect success, returning stdout.
pub fn run_cli_success(args: &[&str], data_dir: &Path) -> String {
    let output = run_cli(args, data_dir);
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        panic!("CLI command failed: {:?}\nstderr: {}", args, stderr);
    }
    String::from_utf8_lossy(&output.stdout).to_string()
}

/// Create a report and return its id.
pub fn create_report(title: &str, data_dir: &Path) -> String {
    let stdout = run_cli_success(&["record", "create-report", title], data_dir);
    first_line(&stdout)
}

pub fn first_line(stdout: &str) -> String {
    stdout
        .lines()
        .next()
        .expect("no output")
        .trim()
        .to_string()
}

/// Parse JSON-lines output.
pub fn json_lines(stdout: &str) -> Vec<serde_json::Value> {
    stdout
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| serde_json::from_str(line).expect("invalid JSON line"))
        .collect()
}
