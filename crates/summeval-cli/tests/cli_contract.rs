#![allow(deprecated)]
use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use tempfile::tempdir;

const SUMMEVAL_ENVS: &[&str] = &[
    "SUMMEVAL_CONFIG",
    "SUMMEVAL_INPUT",
    "SUMMEVAL_ACTUAL_OUTPUT",
    "SUMMEVAL_FORMAT",
    "SUMMEVAL_JUDGE",
    "SUMMEVAL_JUDGE_MODEL",
    "SUMMEVAL_JUDGE_SAMPLES",
    "SUMMEVAL_JUDGE_TEMPERATURE",
    "SUMMEVAL_JUDGE_MAX_TOKENS",
    "SUMMEVAL_JUDGE_MAX_RETRIES",
    "SUMMEVAL_JUDGE_TIMEOUT_SECS",
    "SUMMEVAL_JUDGE_BASE_URL",
];

/// Binary with a clean environment: no inherited SUMMEVAL_* settings, no outbound network.
fn summeval() -> Command {
    let mut cmd = Command::cargo_bin("summeval").unwrap();
    for key in SUMMEVAL_ENVS {
        cmd.env_remove(key);
    }
    cmd.env("SUMMEVAL_NETWORK_POLICY", "deny");
    cmd
}

#[test]
fn fake_judge_scores_placeholders() {
    summeval()
        .args(["--judge", "fake"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "=== LinguaSummarize AI - Summary Evaluation ===\n\nEvaluating Coherence...\n",
        ))
        .stdout(predicate::str::contains("Coherence Score: 0.7\nReasoning: "))
        .stdout(predicate::str::contains("\n\nEvaluating Accuracy...\n"))
        .stdout(predicate::str::contains("Accuracy Score: 0.7\nReasoning: "));
}

#[test]
fn sky_example_prints_two_blocks() {
    let assert = summeval()
        .args([
            "--judge",
            "fake",
            "--input",
            "The sky is blue.",
            "--actual-output",
            "The sky has a blue color.",
        ])
        .assert()
        .success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    assert_eq!(stdout.matches(" Score: ").count(), 2);
    assert_eq!(stdout.matches("Reasoning: ").count(), 2);
    let coherence = stdout.find("Evaluating Coherence...").unwrap();
    let accuracy = stdout.find("Evaluating Accuracy...").unwrap();
    assert!(coherence < accuracy);
}

#[test]
fn empty_test_case_fails_before_any_score() {
    summeval()
        .args(["--judge", "fake", "--input", "", "--actual-output", ""])
        .assert()
        .code(2)
        .stdout(predicate::str::contains("Evaluating Coherence..."))
        .stdout(predicate::str::contains("Score:").not())
        .stdout(predicate::str::contains("Evaluating Accuracy...").not())
        .stderr(predicate::str::contains("fatal:"))
        .stderr(predicate::str::contains("missing or empty"));
}

#[test]
fn missing_openai_key_is_fatal() {
    summeval()
        .env_remove("OPENAI_API_KEY")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("OPENAI_API_KEY"));
}

#[test]
fn live_judge_respects_network_deny() {
    summeval()
        .args(["--judge-api-key", "sk-test"])
        .args(["--judge-max-retries", "0"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("outbound network blocked by policy"));
}

#[test]
fn json_format_emits_single_document() {
    let assert = summeval()
        .args(["--judge", "fake", "--format", "json"])
        .args(["--input", "The sky is blue."])
        .args(["--actual-output", "The sky has a blue color."])
        .assert()
        .success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let v: Value = serde_json::from_str(&stdout).expect("stdout must be JSON");
    assert_eq!(v["banner"], "=== LinguaSummarize AI - Summary Evaluation ===");
    assert_eq!(v["test_case"]["input"], "The sky is blue.");
    let ms = v["measurements"].as_array().unwrap();
    assert_eq!(ms.len(), 2);
    assert_eq!(ms[0]["metric"], "Coherence");
    assert_eq!(ms[1]["metric"], "Accuracy");
    assert_eq!(ms[0]["score"].as_f64(), Some(0.7));
    assert_eq!(ms[0]["success"], true);
}

#[test]
fn suite_file_defines_metrics_and_test_case() {
    let dir = tempdir().unwrap();
    let suite = dir.path().join("suite.yaml");
    fs::write(
        &suite,
        r#"version: 1
test_case:
  input: "Meeting moved to Friday."
  actual_output: "The meeting is now on Friday."
metrics:
  - name: Conciseness
    criteria: "Is the summary free of filler?"
    evaluation_params: [actual_output]
    threshold: 0.8
"#,
    )
    .unwrap();

    summeval()
        .args(["--judge", "fake", "--format", "json"])
        .arg("--config")
        .arg(&suite)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"metric\": \"Conciseness\""))
        .stdout(predicate::str::contains("\"success\": false"))
        .stdout(predicate::str::contains("Meeting moved to Friday."));
}

#[test]
fn bad_suite_file_is_fatal() {
    let dir = tempdir().unwrap();
    let suite = dir.path().join("suite.yaml");
    fs::write(&suite, "version: 7\n").unwrap();

    summeval()
        .args(["--judge", "fake"])
        .arg("--config")
        .arg(&suite)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("fatal:"));
}

#[test]
fn texts_can_come_from_files() {
    let dir = tempdir().unwrap();
    let transcript = dir.path().join("transcript.txt");
    let summary = dir.path().join("summary.txt");
    fs::write(&transcript, "The sky is blue.\n").unwrap();
    fs::write(&summary, "The sky has a blue color.\n").unwrap();

    summeval()
        .args(["--judge", "fake", "--format", "json"])
        .arg("--input-file")
        .arg(&transcript)
        .arg("--actual-output-file")
        .arg(&summary)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"input\": \"The sky is blue.\""))
        .stdout(predicate::str::contains(
            "\"actual_output\": \"The sky has a blue color.\"",
        ));
}

#[test]
fn verbose_lists_evaluation_steps() {
    summeval()
        .args(["--judge", "fake", "--verbose"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Evaluation Steps:\n  1. "));
}

#[test]
fn out_of_range_sample_count_is_a_usage_error() {
    summeval()
        .args(["--judge", "fake", "--judge-samples", "4294967295"])
        .assert()
        .code(2)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("--judge-samples"));
}
