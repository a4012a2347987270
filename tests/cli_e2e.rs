//! End-to-end CLI tests for the cookiescan binary.
//!
//! These cover the paths that never reach a browser: argument handling and
//! URL validation. Scans themselves need a Chrome install and are exercised
//! manually.

use assert_cmd::Command;
use predicates::prelude::*;

/// Test that --help displays usage information and exits with code 0.
#[test]
fn test_binary_help_displays_usage() {
    let mut cmd = Command::cargo_bin("cookiescan").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Generate a cookie policy"));
}

/// Test that --version displays version and exits with code 0.
#[test]
fn test_binary_version_displays_version() {
    let mut cmd = Command::cargo_bin("cookiescan").unwrap();
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("cookiescan"));
}

/// Test that a missing URL argument causes non-zero exit.
#[test]
fn test_binary_missing_url_returns_error() {
    let mut cmd = Command::cargo_bin("cookiescan").unwrap();
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

/// Test that a URL without an http scheme is rejected before any scan.
#[test]
fn test_binary_rejects_url_without_http_scheme() {
    let mut cmd = Command::cargo_bin("cookiescan").unwrap();
    cmd.arg("example.com")
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "starting with http:// or https://",
        ));
}

/// Test that an http-prefixed but unparseable URL is rejected.
#[test]
fn test_binary_rejects_malformed_http_url() {
    let mut cmd = Command::cargo_bin("cookiescan").unwrap();
    cmd.arg("http://")
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid URL"));
}

/// Test that a missing sidecar binary surfaces as a scan setup failure.
#[test]
fn test_binary_missing_scanner_sidecar_reports_failure() {
    let mut cmd = Command::cargo_bin("cookiescan").unwrap();
    cmd.arg("https://example.com")
        .arg("--scanner-bin")
        .arg("/nonexistent/scan-one")
        .assert()
        .failure()
        .stderr(predicate::str::contains("scanner"));
}

/// Test that invalid flags cause non-zero exit.
#[test]
fn test_binary_invalid_flag_returns_error() {
    let mut cmd = Command::cargo_bin("cookiescan").unwrap();
    cmd.arg("https://example.com")
        .arg("--invalid-flag")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

/// Test that the sidecar binary itself answers --help without a browser.
#[test]
fn test_scanner_sidecar_help_displays_usage() {
    let mut cmd = Command::cargo_bin("scan-one").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Scan one URL"));
}
