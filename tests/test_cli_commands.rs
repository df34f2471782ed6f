mod common;

use phaselight::error::ExitCode;

#[test]
fn version_prints_name() {
    let output = common::run_phaselight(&["version"]);
    assert!(output.status.success());
    assert!(common::stdout(&output).starts_with("phaselight "));
}

#[test]
fn version_json() {
    let output = common::run_phaselight(&["version", "--format", "json"]);
    assert!(output.status.success());
    let parsed: serde_json::Value = serde_json::from_str(&common::stdout(&output)).unwrap();
    assert_eq!(parsed["name"], "phaselight");
}

#[test]
fn config_prints_defaults_as_yaml() {
    let output = common::run_phaselight(&["config"]);
    assert!(
        output.status.success(),
        "config should succeed: {}",
        common::stderr(&output)
    );
    let stdout = common::stdout(&output);
    assert!(stdout.contains("min_dwell: 4s"));
    assert!(stdout.contains("max_dwell: 6s"));
    assert!(stdout.contains("poll_interval: 1ms"));
}

#[test]
fn config_flags_override_file() {
    let file = common::fixture_path("fast_cycle.yaml");
    let output = common::run_phaselight(&[
        "config",
        "--config",
        file.to_str().unwrap(),
        "--max-dwell",
        "30ms",
        "--format",
        "json",
    ]);
    assert!(output.status.success(), "{}", common::stderr(&output));

    let parsed: serde_json::Value = serde_json::from_str(&common::stdout(&output)).unwrap();
    assert_eq!(parsed["min_dwell"], "10ms");
    assert_eq!(parsed["max_dwell"], "30ms");
    assert_eq!(parsed["seed"], 42);
}

#[test]
fn invalid_config_exits_with_config_error() {
    let file = common::fixture_path("inverted_dwell.yaml");
    let output = common::run_phaselight(&["config", "--config", file.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(ExitCode::CONFIG_ERROR));
    assert!(common::stderr(&output).contains("max_dwell"));
}

#[test]
fn sub_millisecond_dwell_is_rejected_before_running() {
    let output = common::run_phaselight(&[
        "run",
        "--min-dwell",
        "1200us",
        "--max-dwell",
        "1800us",
        "--poll-interval",
        "100us",
        "--greens",
        "1",
    ]);
    assert_eq!(output.status.code(), Some(ExitCode::CONFIG_ERROR));
    let stderr = common::stderr(&output);
    assert!(stderr.contains("min_dwell"), "{stderr}");
    assert!(stderr.contains("1200us"), "{stderr}");
}

#[test]
fn missing_config_file_exits_with_config_error() {
    let output = common::run_phaselight(&[
        "run",
        "--config",
        "/tmp/nonexistent_phaselight_config.yaml",
    ]);
    assert_eq!(output.status.code(), Some(ExitCode::CONFIG_ERROR));
}

#[test]
fn run_reports_requested_number_of_greens() {
    let file = common::fixture_path("fast_cycle.yaml");
    let output = common::run_phaselight(&[
        "--quiet",
        "run",
        "--config",
        file.to_str().unwrap(),
        "--waiters",
        "3",
        "--greens",
        "4",
        "--format",
        "json",
    ]);
    assert!(output.status.success(), "{}", common::stderr(&output));

    let stdout = common::stdout(&output);
    let lines: Vec<serde_json::Value> = stdout
        .lines()
        .map(|l| serde_json::from_str(l).expect("each line should be JSON"))
        .collect();
    assert_eq!(lines.len(), 4);
    for line in &lines {
        assert!(line["waiter"].as_u64().unwrap() < 3);
        assert!(line["elapsed_ms"].as_u64().is_some());
    }
}

#[test]
fn completions_generate_script() {
    let output = common::run_phaselight(&["completions", "bash"]);
    assert!(output.status.success());
    let stdout = common::stdout(&output);
    assert!(stdout.contains("phaselight"));
    assert!(stdout.contains("--initial-phase"));
}
