// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Process-level contract: stdin request, stdout response, exit status
//!
//! The model path points nowhere, so these tests run without model files;
//! only requests that reach the encoder see the load failure.

use std::io::Write;
use std::process::{Command, Output, Stdio};

const BIN: &str = env!("CARGO_BIN_EXE_overpass-ai");

fn run_with_args(args: &[&str], stdin: &str) -> Output {
    let mut child = Command::new(BIN)
        .args(args)
        .env("OVERPASS_MODEL_PATH", "/nonexistent/overpass/model.onnx")
        .env("OVERPASS_TOKENIZER_PATH", "/nonexistent/overpass/tokenizer.json")
        .env("RUST_LOG", "off")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn overpass-ai");

    // The process may exit before reading stdin (bad flags), so a broken pipe is fine
    let _ = child.stdin.take().unwrap().write_all(stdin.as_bytes());

    child.wait_with_output().expect("Failed to wait for overpass-ai")
}

fn run(stdin: &str) -> Output {
    run_with_args(&[], stdin)
}

fn stdout_json(output: &Output) -> serde_json::Value {
    let stdout = String::from_utf8(output.stdout.clone()).unwrap();
    assert_eq!(stdout.lines().count(), 1, "stdout: {:?}", stdout);
    serde_json::from_str(&stdout).expect("stdout should be one JSON document")
}

#[test]
fn test_unknown_command_exits_zero() {
    let output = run(r#"{"command":"frobnicate"}"#);

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(
        stdout_json(&output),
        serde_json::json!({"error": "Unknown command: frobnicate"})
    );
}

#[test]
fn test_numeric_command_exits_zero() {
    let output = run(r#"{"command":5,"text":"x"}"#);

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(output.stdout, b"{\"error\":\"Unknown command: 5\"}\n");
}

#[test]
fn test_empty_text_exits_one() {
    for input in ["{}", r#"{"text":""}"#, r#"{"command":"vectorize","text":""}"#] {
        let output = run(input);

        assert_eq!(output.status.code(), Some(1), "input: {}", input);
        assert_eq!(
            output.stdout,
            b"{\"error\":\"Text cannot be empty\"}\n",
            "input: {}",
            input
        );
    }
}

#[test]
fn test_malformed_input_exits_one() {
    let output = run("not json");

    assert_eq!(output.status.code(), Some(1));
    assert!(stdout_json(&output)["error"].is_string());
}

#[test]
fn test_empty_stdin_exits_one() {
    let output = run("");

    assert_eq!(output.status.code(), Some(1));
    assert!(stdout_json(&output)["error"].is_string());
}

#[test]
fn test_model_load_failure_exits_one() {
    let output = run(r#"{"command":"vectorize","text":"disk full on /var"}"#);

    assert_eq!(output.status.code(), Some(1));
    let message = stdout_json(&output)["error"]
        .as_str()
        .unwrap()
        .to_string();
    assert!(
        message.contains("/nonexistent/overpass/model.onnx"),
        "message: {}",
        message
    );
}

#[test]
fn test_bad_flag_still_answers_json() {
    let output = run_with_args(&["--dimension", "lots"], r#"{"text":"x"}"#);

    assert_eq!(output.status.code(), Some(1));
    assert!(stdout_json(&output)["error"].is_string());
}

#[test]
fn test_logs_stay_off_stdout() {
    let mut child = Command::new(BIN)
        .env("OVERPASS_MODEL_PATH", "/nonexistent/overpass/model.onnx")
        .env("RUST_LOG", "debug")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    child
        .stdin
        .take()
        .unwrap()
        .write_all(br#"{"command":"frobnicate"}"#)
        .unwrap();
    let output = child.wait_with_output().unwrap();

    assert_eq!(output.stdout, b"{\"error\":\"Unknown command: frobnicate\"}\n");
    assert!(!output.stderr.is_empty(), "debug logs should go to stderr");
}

#[test]
#[ignore] // Only run if model files are downloaded to ./models
fn test_vectorize_with_default_model() {
    let mut child = Command::new(BIN)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .unwrap();
    child
        .stdin
        .take()
        .unwrap()
        .write_all(br#"{"command":"vectorize","text":"Connection refused"}"#)
        .unwrap();
    let output = child.wait_with_output().unwrap();

    assert_eq!(output.status.code(), Some(0));
    let vector = stdout_json(&output);
    let vector = vector.as_array().unwrap();
    assert_eq!(vector.len(), 384);
    assert!(vector.iter().all(|v| v.as_f64().unwrap().is_finite()));
}
