use std::path::Path;
use std::process::{Command, Output};

use reach_models::test_utils::write_word_index_tokenizer;
use serde_json::Value;

fn base_cmd(cwd: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_reach"));
    cmd.current_dir(cwd);
    cmd.env("NO_COLOR", "1");
    for key in [
        "HOST",
        "PORT",
        "REACH_MODEL_PATH",
        "REACH_TOKENIZER_PATH",
        "REACH_SCALER_PATH",
        "REACH_LOG_LEVEL",
        "RUST_LOG",
    ] {
        cmd.env_remove(key);
    }
    cmd
}

fn run(cmd: &mut Command) -> Output {
    cmd.output().expect("failed to run reach command")
}

fn stdout_json(output: &Output) -> Value {
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("stdout is not JSON")
}

#[test]
fn config_generate_emits_toml_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let output = run(base_cmd(dir.path()).args(["config", "--generate"]));

    assert!(output.status.success());
    let text = String::from_utf8_lossy(&output.stdout);
    assert!(text.contains("[server]"), "{text}");
    assert!(text.contains("port = 8000"), "{text}");
}

#[test]
fn config_show_as_json() {
    let dir = tempfile::tempdir().unwrap();
    let output = run(base_cmd(dir.path()).args(["--format", "json", "config", "--show"]));

    let config = stdout_json(&output);
    assert_eq!(config["server"]["port"], 8000);
    assert_eq!(config["logging"]["level"], "info");
}

#[test]
fn config_file_is_honoured() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("reach.toml"), "[server]\nport = 9100\n").unwrap();

    let output = run(base_cmd(dir.path()).args(["--format", "json", "config"]));
    assert_eq!(stdout_json(&output)["server"]["port"], 9100);
}

#[test]
fn inspect_encodes_without_model() {
    let dir = tempfile::tempdir().unwrap();
    write_word_index_tokenizer(&dir.path().join("tokenizer.json"), &["summer", "sale"]).unwrap();

    let output = run(base_cmd(dir.path()).args([
        "--format",
        "json",
        "inspect",
        "--caption",
        "Summer sale",
        "--platform",
        "Instagram",
        "--date",
        "2024-07-13",
        "--time",
        "09:15",
        "--artifacts",
        ".",
    ]));

    let features = stdout_json(&output);
    let tokens = features["token_sequence"].as_array().unwrap();
    assert_eq!(tokens.len(), 80);
    assert_eq!(tokens[0], 2);
    assert_eq!(tokens[1], 3);
    assert_eq!(tokens[2], 0);

    let numeric = features["numeric_vector"].as_array().unwrap();
    assert_eq!(numeric[0], 1.0); // Instagram
    assert_eq!(numeric[1], 9.0); // hour
    assert_eq!(numeric[2], 5.0); // Saturday
    assert_eq!(numeric[3], 1.0); // weekend
}

#[test]
fn predict_without_artifacts_fails() {
    let dir = tempfile::tempdir().unwrap();
    let output = run(base_cmd(dir.path()).args([
        "predict",
        "--caption",
        "hello",
        "--platform",
        "TikTok",
        "--artifacts",
        ".",
    ]));

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error"), "{stderr}");
}

#[test]
fn predict_rejects_negative_followers() {
    let dir = tempfile::tempdir().unwrap();
    let output = run(base_cmd(dir.path()).args([
        "predict",
        "--platform",
        "TikTok",
        "--followers=-5",
    ]));

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("followers"), "{stderr}");
}
