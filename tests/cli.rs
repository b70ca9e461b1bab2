//! End-to-end checks on the `xyber` binary

use std::process::{Command, Output};
use tempfile::tempdir;

fn xyber(args: &[&str], envs: &[(&str, &str)]) -> Output {
    let dir = tempdir().unwrap();
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_xyber"));
    cmd.args(args)
        .current_dir(dir.path())
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1");
    for (key, value) in envs {
        cmd.env(key, value);
    }
    cmd.output().unwrap()
}

#[test]
fn test_decode_failure_is_reported() {
    // 3 bytes, too short for either layout
    let out = xyber(&["decode", "AAAA"], &[]);
    assert!(!out.status.success());

    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("Command failed"), "stderr: {}", stderr);
    assert!(
        stderr.contains("need at least 105 bytes, got 3"),
        "stderr: {}",
        stderr
    );
}

#[test]
fn test_config_error_is_reported() {
    let out = xyber(&["config"], &[("XYBER__RPC__COMMITMENT", "eventually")]);
    assert!(!out.status.success());

    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(
        stderr.contains("Failed to load configuration"),
        "stderr: {}",
        stderr
    );
    assert!(stderr.contains("eventually"), "stderr: {}", stderr);
}

#[test]
fn test_config_prints_settings() {
    let out = xyber(&["config"], &[]);
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("program_id: HL1jyNFAJa8EhuuqpZJfLLTsXsfk1yCGMX8XpGssrxQQ"));
}
