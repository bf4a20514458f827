//! Smoke tests to verify command wiring

use assert_cmd::Command;
use predicates::prelude::*;

fn agora() -> Command {
    let mut cmd = Command::cargo_bin("agora").unwrap();
    // Keep developer .env files and shell settings out of the run.
    cmd.env_remove("DATABASE_URL")
        .env_remove("JWT_SECRET_KEY")
        .env_remove("DB_USER")
        .env_remove("DB_PASSWORD")
        .env_remove("DB_NAME")
        .env("HOME", std::env::temp_dir())
        .current_dir(std::env::temp_dir());
    cmd
}

#[test]
fn test_top_level_help_lists_subcommands() {
    agora()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("serve"))
        .stdout(predicate::str::contains("migrate"));
}

#[test]
fn test_serve_help() {
    agora()
        .arg("serve")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--jwt-secret"))
        .stdout(predicate::str::contains("--token-ttl-minutes"))
        .stdout(predicate::str::contains("--cors-permissive"));
}

#[test]
fn test_migrate_help() {
    agora()
        .arg("migrate")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--database-url"));
}

#[test]
fn test_serve_requires_jwt_secret() {
    agora()
        .arg("serve")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--jwt-secret"));
}

#[test]
fn test_version() {
    agora()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_unknown_subcommand_fails() {
    agora().arg("frobnicate").assert().failure();
}
