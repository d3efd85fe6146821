#![allow(dead_code)]

use std::path::Path;
use std::process::{Command, Output};

/// Run the CLI with an isolated HOME and the given backend URL.
pub fn run_cli_with_env(args: &[&str], home: &Path, api_url: &str) -> Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_sylvan"));
    cmd.args(args);
    cmd.env("HOME", home);
    cmd.env("XDG_DATA_HOME", home.join("data"));
    cmd.env("SYLVAN_API_URL", api_url);
    cmd.env("NO_COLOR", "1");
    cmd.env_remove("RUST_LOG");
    cmd.output().expect("Failed to execute CLI")
}

/// Run the CLI with an isolated HOME and expect success.
pub fn run_cli_with_env_success(args: &[&str], home: &Path, api_url: &str) -> String {
    let output = run_cli_with_env(args, home, api_url);
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        panic!("CLI command failed: {:?}\nstderr: {}", args, stderr);
    }
    String::from_utf8_lossy(&output.stdout).to_string()
}

/// Path of the session file inside an isolated HOME.
pub fn session_file(home: &Path) -> std::path::PathBuf {
    home.join("data").join("sylvan").join("session.json")
}

pub fn cart_file(home: &Path) -> std::path::PathBuf {
    home.join("data").join("sylvan").join("cart.json")
}
