//! Integration tests for basic CLI behavior.
//!
//! Tests that the binary exists, accepts standard flags, each subcommand
//! responds to `--help`, and bad input fails before any network work.

#![allow(deprecated)] // cargo_bin deprecation — replacement not yet stable

use assert_cmd::Command;
use predicates::prelude::*;

/// Helper: get a Command for the `vidroute` binary.
fn vidroute() -> Command {
    Command::cargo_bin("vidroute").expect("binary 'vidroute' should be built")
}

// ─── Top-level flags ─────────────────────────────────────────────────────────

#[test]
fn help_flag_shows_usage() {
    vidroute()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage: vidroute"))
        .stdout(predicate::str::contains("routes"))
        .stdout(predicate::str::contains("streams"))
        .stdout(predicate::str::contains("link"));
}

#[test]
fn version_flag_shows_semver() {
    vidroute()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"^vidroute \d+\.\d+\.\d+\n$").unwrap());
}

#[test]
fn no_args_shows_error_and_usage() {
    vidroute()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage: vidroute"));
}

#[test]
fn invalid_subcommand_fails() {
    vidroute()
        .arg("not-a-real-command")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unrecognized subcommand"));
}

// ─── Subcommand help ─────────────────────────────────────────────────────────

#[test]
fn routes_help() {
    vidroute()
        .args(["routes", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("download variants"))
        .stdout(predicate::str::contains("<URL>"))
        .stdout(predicate::str::contains("--timeout"))
        .stdout(predicate::str::contains("--json"))
        .stdout(predicate::str::contains("--trace"));
}

#[test]
fn streams_help() {
    vidroute()
        .args(["streams", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("playable streams"))
        .stdout(predicate::str::contains("<URL>"))
        .stdout(predicate::str::contains("--gap"))
        .stdout(predicate::str::contains("--skip-resolution"));
}

#[test]
fn link_help() {
    vidroute()
        .args(["link", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("direct download link"))
        .stdout(predicate::str::contains("<URL>"))
        .stdout(predicate::str::contains("--index"))
        .stdout(predicate::str::contains("--via-streams"));
}

// ─── Subcommand argument validation ──────────────────────────────────────────

#[test]
fn routes_missing_url_fails() {
    vidroute()
        .arg("routes")
        .assert()
        .failure()
        .stderr(predicate::str::contains("<URL>"));
}

#[test]
fn streams_missing_url_fails() {
    vidroute()
        .arg("streams")
        .assert()
        .failure()
        .stderr(predicate::str::contains("<URL>"));
}

#[test]
fn link_missing_index_fails() {
    vidroute()
        .args(["link", "https://sbembed.com/e/abc"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--index"));
}

#[test]
fn routes_non_numeric_timeout_fails() {
    vidroute()
        .args(["routes", "--timeout", "soon", "https://sbembed.com/e/abc"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

// ─── Offline input rejection (no network involved) ───────────────────────────

#[test]
fn malformed_url_is_rejected_before_any_fetch() {
    vidroute()
        .args(["routes", "not a url"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("InvalidInput"));
}

#[test]
fn unclaimed_host_is_rejected_before_any_fetch() {
    vidroute()
        .args(["routes", "https://example.com/e/abc"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not handle host"));
}

#[test]
fn zero_timeout_is_rejected_by_config_validation() {
    vidroute()
        .args(["routes", "--timeout", "0", "https://sbembed.com/e/abc"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("timeout must be greater than zero"));
}

#[test]
fn rejection_trace_prints_on_request() {
    vidroute()
        .args(["routes", "--trace", "not a url"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("── trace"))
        .stderr(predicate::str::contains("- rejected before start"));
}
