//! CLI integration tests using assert_cmd.
//!
//! These tests never need a database: they exercise help output and
//! argument validation only.

use assert_cmd::Command;
use predicates::prelude::*;

#[allow(deprecated)]
fn dialqueue() -> Command {
    Command::cargo_bin("dialqueue").unwrap()
}

#[test]
fn help_shows_serve_subcommand() {
    dialqueue()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("serve").and(predicate::str::contains("--database-url")));
}

#[test]
fn help_serve_shows_port() {
    dialqueue()
        .args(["serve", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--port"));
}

#[test]
fn unknown_subcommand_fails() {
    dialqueue()
        .arg("nonexistent")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unrecognized subcommand"));
}

#[test]
fn serve_without_database_url_fails() {
    dialqueue()
        .env_remove("DATABASE_URL")
        .arg("serve")
        .assert()
        .failure()
        .stderr(predicate::str::contains("DATABASE_URL is required"));
}
