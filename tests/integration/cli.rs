//! Tests for the `gleaner` binary.

use assert_cmd::Command;
use gleaner::test_utils::{BuildFixture, TestEnvironment};
use predicates::prelude::*;

fn gleaner(env: &TestEnvironment) -> Command {
    let build = env.write_build(&BuildFixture::single_module()).unwrap();
    let mut cmd = Command::cargo_bin("gleaner").unwrap();
    cmd.env_remove("RUST_LOG")
        .env_remove("GLEANER_OUTPUT_FILE")
        .arg("--build")
        .arg(build)
        .arg("--repo")
        .arg(&env.repository_dir);
    cmd
}

#[test]
fn test_complete_run_prints_build_requires() {
    let env = TestEnvironment::new().unwrap();
    env.install_all(BuildFixture::single_module_artifacts()).unwrap();

    gleaner(&env)
        .arg("--fail-on-missing")
        .assert()
        .success()
        .stdout(predicate::str::contains("BEGIN MAVEN BUILD DEPENDENCIES"))
        .stdout(predicate::str::contains("BuildRequires:  mvn(com.google.guava:guava)"))
        .stdout(predicate::str::contains("END MAVEN BUILD DEPENDENCIES"))
        .stdout(predicate::str::contains("BUILD DEPS READY"));
}

#[test]
fn test_missing_dependencies_exit_status() {
    let env = TestEnvironment::new().unwrap();

    gleaner(&env)
        .assert()
        .success()
        .stdout(predicate::str::contains("Missing model dependencies"));

    gleaner(&env).arg("--fail-on-missing").assert().code(2);
}

#[test]
fn test_output_flag_writes_file() {
    let env = TestEnvironment::new().unwrap();
    env.install_all(BuildFixture::single_module_artifacts()).unwrap();
    let output = env.path("brs.txt");

    gleaner(&env).arg("--quiet").arg("--output").arg(&output).assert().success();

    let contents = std::fs::read_to_string(&output).unwrap();
    assert_eq!(contents.lines().count(), 5);
    assert!(contents.contains("mvn(org.apache.maven.plugins:maven-jar-plugin)"));
}

#[test]
fn test_quiet_suppresses_info() {
    let env = TestEnvironment::new().unwrap();
    env.install_all(BuildFixture::single_module_artifacts()).unwrap();

    gleaner(&env)
        .arg("--quiet")
        .assert()
        .success()
        .stdout(predicate::str::contains("BuildRequires").not());
}

#[test]
fn test_missing_build_file_is_an_error() {
    let env = TestEnvironment::new().unwrap();
    Command::cargo_bin("gleaner")
        .unwrap()
        .arg("--build")
        .arg(env.path("nope.toml"))
        .arg("--repo")
        .arg(&env.repository_dir)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("error"));
}

#[test]
fn test_invalid_filter_is_an_error() {
    let env = TestEnvironment::new().unwrap();
    gleaner(&env).arg("-D").arg("gleaner.filter.bad=(unclosed").assert().code(1);
}
