// SPDX-License-Identifier: MIT OR Apache-2.0

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn help_lists_flags() {
    Command::cargo_bin("mcp-github")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--token"))
        .stdout(predicate::str::contains("--docker-image"));
}

#[cfg(unix)]
#[test]
fn missing_docker_exits_one() {
    Command::cargo_bin("mcp-github")
        .unwrap()
        .env("PATH", "")
        .env("GITHUB_PERSONAL_ACCESS_TOKEN", "ghp_test")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Docker is not available"));
}
