// Integration tests for `awbcheck run` / `awbcheck validate`.
// Run with: cargo test -p awbcheck-cli --test recon_cli_tests -- --nocapture
//
// Each test writes its config and CSVs into a fresh temp dir and runs the
// compiled binary against it.

use std::path::Path;
use std::process::{Command, Output};

fn awbcheck() -> Command {
    Command::new(env!("CARGO_BIN_EXE_awbcheck"))
}

const CONFIG: &str = r#"
name = "CLI test"

[sources.jaster]
file = "jaster.csv"

[sources.cis]
file = "cis.csv"

[sources.unifikasi]
file = "unifikasi.csv"
"#;

fn write_fixture(dir: &Path, jaster: &str, cis: &str, unifikasi: &str) {
    std::fs::write(dir.join("run.recon.toml"), CONFIG).unwrap();
    std::fs::write(dir.join("jaster.csv"), jaster).unwrap();
    std::fs::write(dir.join("cis.csv"), cis).unwrap();
    std::fs::write(dir.join("unifikasi.csv"), unifikasi).unwrap();
}

fn run(dir: &Path, extra: &[&str]) -> Output {
    let config = dir.join("run.recon.toml");
    awbcheck()
        .arg("run")
        .arg(&config)
        .args(extra)
        .output()
        .expect("awbcheck run")
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn clean_run_exits_zero() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(
        dir.path(),
        "AWB,CHW\nA1,12\nA2,3.5\n",
        "No AWB,Chw Weight\nA1,12.004\nA2,3.5\n",
        "SMU,Kg\nA1,12\nA2,3.5\n",
    );

    let output = run(dir.path(), &[]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stderr(&output).contains("2 AWBs, 2 perfect (100.0%)"));
}

#[test]
fn discrepancies_exit_one() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(
        dir.path(),
        "AWB,CHW\nA1,12\nA2,3.5\n",
        "No AWB,Chw Weight\nA1,12\n",
        "SMU,Kg\nA1,15\n",
    );

    let output = run(dir.path(), &[]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("2 AWB(s) with discrepancies"));
}

#[test]
fn json_stdout_is_single_document() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(
        dir.path(),
        "AWB,CHW\nA1,10\nA1,20\n",
        "No AWB,Chw Weight\nA1,10\n",
        "SMU,Kg\nA1,10\nB9,1\n",
    );

    let output = run(dir.path(), &["--json"]);
    assert_eq!(output.status.code(), Some(1));

    let stdout = String::from_utf8_lossy(&output.stdout);
    let val: serde_json::Value = serde_json::from_str(stdout.trim())
        .unwrap_or_else(|e| panic!("stdout must be valid JSON: {e}\n{stdout}"));

    assert_eq!(val["stats"]["total_unique_awbs"], 2);
    assert_eq!(val["stats"]["perfect_matches"], 1);
    assert_eq!(val["stats"]["in_unifikasi_only"], 1);

    let a1 = &val["rows"][0];
    assert_eq!(a1["key"], "A1");
    assert_eq!(a1["weight_by_source"]["jaster"], 10.0);
    assert_eq!(a1["has_duplicates"], true);
    assert_eq!(a1["discrepancies"], serde_json::json!(["Duplicate in JASTER"]));
}

#[test]
fn writes_output_and_report_files() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(
        dir.path(),
        "AWB,CHW\nA1,1\n",
        "No AWB,Chw Weight\nA1,1\n",
        "SMU,Kg\nA1,1\n",
    );
    let out_json = dir.path().join("out.json");
    let report = dir.path().join("report");

    let output = run(
        dir.path(),
        &[
            "--output",
            out_json.to_str().unwrap(),
            "--report-dir",
            report.to_str().unwrap(),
        ],
    );
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(out_json.is_file());
    for name in ["summary.csv", "detailed.csv", "issues.csv"] {
        assert!(report.join(name).is_file(), "{name} missing");
    }
}

#[test]
fn filter_lists_matching_rows() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(
        dir.path(),
        "AWB,CHW\nA1,1\nA2,2\n",
        "No AWB,Chw Weight\nA1,1\nA2,9\n",
        "SMU,Kg\nA1,1\nA2,2\n",
    );

    let output = run(dir.path(), &["--filter", "mismatches"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 2, "stdout: {stdout}");
    assert!(lines[1].starts_with("A2 "));
    assert!(lines[1].ends_with("Weight mismatch"));
    assert!(stderr(&output).contains("showing 1 of 1 matching rows"));
}

#[test]
fn missing_key_column_is_runtime_error() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(
        dir.path(),
        "AWB,CHW\nA1,1\n",
        "Nomor,Berat\nA1,1\n",
        "SMU,Kg\nA1,1\n",
    );

    let output = run(dir.path(), &[]);
    assert_eq!(output.status.code(), Some(4));
    let err = stderr(&output);
    assert!(err.contains("source CIS: missing key column"), "stderr: {err}");
    assert!(err.contains("sources.cis key_columns"), "stderr: {err}");
}

#[test]
fn validate_rejects_bad_tolerance() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("bad.recon.toml");
    std::fs::write(&config, format!("{CONFIG}\n[tolerance]\nweight = -1.0\n")).unwrap();

    let output = awbcheck().arg("validate").arg(&config).output().unwrap();
    assert_eq!(output.status.code(), Some(3));
    assert!(stderr(&output).contains("tolerance.weight"));
}

#[test]
fn validate_accepts_good_config() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(dir.path(), "", "", "");

    let output = awbcheck()
        .arg("validate")
        .arg(dir.path().join("run.recon.toml"))
        .output()
        .unwrap();
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stderr(&output).contains("CLI test: valid"));
}

#[test]
fn unknown_filter_is_usage_error() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(dir.path(), "AWB,CHW\n", "No AWB,Weight\n", "SMU,Kg\n");
    let output = run(dir.path(), &["--filter", "bogus"]);
    assert_eq!(output.status.code(), Some(2));
}

fn listed_keys(output: &Output) -> Vec<String> {
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .skip(1)
        .filter_map(|l| l.split_whitespace().next().map(String::from))
        .collect()
}

#[test]
fn listing_sorts_by_key_then_by_requested_column() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(
        dir.path(),
        "AWB,CHW\nC3,5\nA1,2\nB2,9\n",
        "No AWB,Chw Weight\nC3,5\nA1,2\nB2,9\n",
        "SMU,Kg\nC3,5\nA1,2\nB2,9\n",
    );

    let output = run(dir.path(), &["--filter", "all"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(listed_keys(&output), vec!["A1", "B2", "C3"]);

    let output = run(dir.path(), &["--filter", "all", "--sort", "jaster:desc"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(listed_keys(&output), vec!["B2", "C3", "A1"]);

    let output = run(dir.path(), &["--filter", "perfect", "--sort", "cis"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(listed_keys(&output), vec!["A1", "C3", "B2"]);
}

#[test]
fn unknown_sort_is_usage_error() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(dir.path(), "AWB,CHW\n", "No AWB,Weight\n", "SMU,Kg\n");
    let output = run(dir.path(), &["--filter", "all", "--sort", "origin"]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn json_with_listing_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(dir.path(), "AWB,CHW\nA1,1\n", "No AWB,Weight\nA1,1\n", "SMU,Kg\nA1,1\n");

    let output = run(dir.path(), &["--json", "--filter", "mismatches"]);
    assert_eq!(output.status.code(), Some(2));
    assert!(output.stdout.is_empty());
    assert!(stderr(&output).contains("cannot be combined with --json"));
}
