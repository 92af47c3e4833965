//! Integration tests for the `tcsw` binary

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

#[test]
fn test_path_reports_the_whole_path() {
    let mut cmd = cargo_bin_cmd!("tcsw");
    cmd.arg("path")
        .assert()
        .success()
        .stdout(predicate::str::contains("Status: optimal"))
        .stdout(predicate::str::contains("Objective: 3"))
        .stdout(predicate::str::contains("1 -> 2, 2 -> 3, 3 -> 4"));
}

#[test]
fn test_infeasible_path_reports_no_solution() {
    let mut cmd = cargo_bin_cmd!("tcsw");
    cmd.args(["path", "--infeasible"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No solution"));
}

#[test]
fn test_random_json_output() {
    let mut cmd = cargo_bin_cmd!("tcsw");
    let output = cmd
        .args([
            "random",
            "--nodes",
            "6",
            "--edge-prob",
            "0.5",
            "--times",
            "3",
            "--active-prob",
            "0.9",
            "--seed",
            "5",
            "--json",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["seed"], 5);
    assert_eq!(json["instance"]["nodes"], 6);
    assert_eq!(json["solution"]["status"], "optimal");
    assert_eq!(json["solution"]["certified_optimal"], true);
    assert_eq!(json["generator"]["time_count"], 3);
}

#[test]
fn test_unknown_backend_fails() {
    let mut cmd = cargo_bin_cmd!("tcsw");
    cmd.args(["random", "--backend", "gurobi", "--seed", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown backend"));
}
